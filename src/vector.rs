//! Growable arrays backed by [`AlignedBlock`]s.
//!
//! [`RawVector`] is the type-erased core: it stores raw bytes and a stride
//! fixed at creation. [`Vector<T>`] binds the stride to a type at compile time
//! so callers cannot hand it a blob of the wrong shape.
//!
//! Neither type touches an [`Arena`](crate::Arena): the buffer has its own
//! lifetime and is freed when the vector is dropped.

use std::{fmt, marker::PhantomData, mem, ptr::NonNull, slice};

use crate::{
  align::MAX_ALIGN,
  block::AlignedBlock,
  error::{AllocError, VectorError},
};

/// Capacity-doubling array of fixed-size byte blobs.
pub struct RawVector {
  element_size: usize,
  capacity: usize,
  len: usize,
  items: Option<AlignedBlock>,
}

impl RawVector {
  /// Creates an empty vector of `element_size`-byte elements.
  ///
  /// Logical capacity starts at one slot; the buffer is only allocated by the
  /// first append.
  pub fn new(element_size: usize) -> Self {
    Self {
      element_size,
      capacity: 1,
      len: 0,
      items: None,
    }
  }

  /// Copies `element` into the next slot, doubling the capacity when full.
  ///
  /// `element` must be exactly [`element_size`](RawVector::element_size)
  /// bytes long.
  pub fn append(
    &mut self,
    element: &[u8],
  ) -> Result<(), VectorError> {
    self.check_size(element)?;

    let slot = self.push_slot()?;
    unsafe { slot.copy_from_nonoverlapping(element.as_ptr(), self.element_size) };

    Ok(())
  }

  /// Removes the last element and returns its bytes.
  ///
  /// The slot is not cleared; the returned bytes stay valid until the next
  /// mutation.
  pub fn pop(&mut self) -> Option<&[u8]> {
    let slot = self.pop_slot()?;
    Some(unsafe { slice::from_raw_parts(slot, self.element_size) })
  }

  pub fn at(
    &self,
    index: usize,
  ) -> Option<&[u8]> {
    let slot = self.slot(index)?;
    Some(unsafe { slice::from_raw_parts(slot, self.element_size) })
  }

  /// Overwrites the element at `index`. Out of range indices are ignored.
  pub fn replace_at(
    &mut self,
    index: usize,
    element: &[u8],
  ) -> Result<(), VectorError> {
    self.check_size(element)?;

    if let Some(slot) = self.slot(index) {
      unsafe { slot.copy_from_nonoverlapping(element.as_ptr(), self.element_size) };
    }

    Ok(())
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Number of slots the vector can hold before growing.
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn element_size(&self) -> usize {
    self.element_size
  }

  fn check_size(
    &self,
    element: &[u8],
  ) -> Result<(), VectorError> {
    if element.len() != self.element_size {
      return Err(VectorError::ElementSize {
        expected: self.element_size,
        found: element.len(),
      });
    }
    Ok(())
  }

  /// Makes room for one more element and returns the buffer base.
  fn reserve_slot(&mut self) -> Result<*mut u8, VectorError> {
    let Some(items) = self.items.as_mut() else {
      let items = AlignedBlock::new(self.element_size)?;
      let base = items.as_ptr();

      self.items = Some(items);
      self.capacity = 1;

      return Ok(base);
    };

    if self.len >= self.capacity {
      let overflow = AllocError::SizeOverflow { requested: usize::MAX };
      let capacity = self.capacity.checked_mul(2).ok_or(overflow)?;
      let bytes = capacity.checked_mul(self.element_size).ok_or(overflow)?;

      items.resize(bytes)?;
      self.capacity = capacity;

      tracing::trace!(capacity, bytes, "vector grew");
    }

    Ok(items.as_ptr())
  }

  /// Reserves and claims the next slot, returning a pointer to it.
  fn push_slot(&mut self) -> Result<*mut u8, VectorError> {
    let base = self.reserve_slot()?;
    let slot = unsafe { base.add(self.len * self.element_size) };

    self.len += 1;

    Ok(slot)
  }

  fn pop_slot(&mut self) -> Option<*mut u8> {
    if self.len == 0 {
      return None;
    }

    self.len -= 1;
    self.slot_unchecked(self.len)
  }

  fn slot(
    &self,
    index: usize,
  ) -> Option<*mut u8> {
    if index >= self.len {
      return None;
    }
    self.slot_unchecked(index)
  }

  fn slot_unchecked(
    &self,
    index: usize,
  ) -> Option<*mut u8> {
    let items = self.items.as_ref()?;
    Some(unsafe { items.as_ptr().add(index * self.element_size) })
  }
}

impl fmt::Debug for RawVector {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("RawVector")
      .field("element_size", &self.element_size)
      .field("capacity", &self.capacity)
      .field("len", &self.len)
      .finish()
  }
}

/// Typed view over a [`RawVector`] whose stride is `size_of::<T>()`.
pub struct Vector<T: Copy> {
  raw: RawVector,
  _marker: PhantomData<T>,
}

impl<T: Copy> Vector<T> {
  pub fn new() -> Self {
    const {
      assert!(mem::align_of::<T>() <= MAX_ALIGN, "element alignment exceeds MAX_ALIGN");
    }

    Self {
      raw: RawVector::new(mem::size_of::<T>()),
      _marker: PhantomData,
    }
  }

  pub fn append(
    &mut self,
    value: T,
  ) -> Result<(), VectorError> {
    let slot = self.raw.push_slot()?;
    unsafe { slot.cast::<T>().write(value) };
    Ok(())
  }

  pub fn extend_from_slice(
    &mut self,
    values: &[T],
  ) -> Result<(), VectorError> {
    values.iter().try_for_each(|&value| self.append(value))
  }

  /// Removes and returns the last element.
  pub fn pop(&mut self) -> Option<T> {
    let slot = self.raw.pop_slot()?;
    Some(unsafe { slot.cast::<T>().read() })
  }

  pub fn at(
    &self,
    index: usize,
  ) -> Option<T> {
    let slot = self.raw.slot(index)?;
    Some(unsafe { slot.cast::<T>().read() })
  }

  /// Overwrites the element at `index`. Out of range indices are ignored.
  pub fn replace_at(
    &mut self,
    index: usize,
    value: T,
  ) {
    if let Some(slot) = self.raw.slot(index) {
      unsafe { slot.cast::<T>().write(value) };
    }
  }

  pub fn len(&self) -> usize {
    self.raw.len()
  }

  pub fn is_empty(&self) -> bool {
    self.raw.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.raw.capacity()
  }

  pub fn as_slice(&self) -> &[T] {
    let base = self
      .raw
      .slot_unchecked(0)
      .map_or(NonNull::<T>::dangling().as_ptr(), |slot| slot.cast::<T>());

    unsafe { slice::from_raw_parts(base, self.raw.len()) }
  }

  pub fn iter(&self) -> slice::Iter<'_, T> {
    self.as_slice().iter()
  }
}

impl<T: Copy> Default for Vector<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Vector<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<'a, T: Copy> IntoIterator for &'a Vector<T> {
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
