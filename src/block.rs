use std::{ptr::NonNull, slice};

use crate::{error::AllocError, heap};

/// Owning handle over one [`heap`] block.
///
/// Keeps the aligned payload pointer together with its length so callers
/// never touch the hidden header. The block is released on drop.
pub struct AlignedBlock {
  ptr: NonNull<u8>,
  len: usize,
}

impl AlignedBlock {
  /// Allocates `len` zeroed bytes aligned to [`MAX_ALIGN`](crate::align::MAX_ALIGN).
  pub fn new(len: usize) -> Result<Self, AllocError> {
    let ptr = unsafe { heap::allocate(len)? };
    Ok(Self { ptr, len })
  }

  /// Moves the contents into a block of `new_len` bytes.
  ///
  /// On error the block keeps its previous contents and length.
  pub fn resize(
    &mut self,
    new_len: usize,
  ) -> Result<(), AllocError> {
    if new_len == heap::RELEASE {
      return Err(AllocError::SizeOverflow { requested: new_len });
    }

    let moved = unsafe { heap::reallocate(Some(self.ptr), self.len, new_len)? };

    if let Some(ptr) = moved {
      self.ptr = ptr;
      self.len = new_len;
    }

    Ok(())
  }

  pub fn as_ptr(&self) -> *mut u8 {
    self.ptr.as_ptr()
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn as_slice(&self) -> &[u8] {
    unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
  }

  pub fn as_mut_slice(&mut self) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
  }

  /// Overwrites the whole block with zeroes.
  pub fn zero(&mut self) {
    self.as_mut_slice().fill(0);
  }
}

impl Drop for AlignedBlock {
  fn drop(&mut self) {
    unsafe { heap::free(Some(self.ptr)) };
  }
}

impl std::fmt::Debug for AlignedBlock {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    f.debug_struct("AlignedBlock")
      .field("ptr", &self.ptr)
      .field("len", &self.len)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::align::MAX_ALIGN;

  #[test]
  fn new_block_is_zeroed_and_aligned() {
    let block = AlignedBlock::new(64).unwrap();

    assert_eq!(block.len(), 64);
    assert_eq!(block.as_ptr() as usize % MAX_ALIGN, 0);
    assert!(block.as_slice().iter().all(|&b| b == 0));
  }

  #[test]
  fn resize_preserves_prefix() {
    let mut block = AlignedBlock::new(3).unwrap();
    block.as_mut_slice().copy_from_slice(b"abc");

    block.resize(6).unwrap();
    assert_eq!(block.as_slice(), b"abc\0\0\0");

    block.resize(2).unwrap();
    assert_eq!(block.as_slice(), b"ab");
  }

  #[test]
  fn failed_resize_leaves_block_intact() {
    let mut block = AlignedBlock::new(4).unwrap();
    block.as_mut_slice().copy_from_slice(b"keep");

    assert!(block.resize(usize::MAX - 1).is_err());
    assert!(block.resize(heap::RELEASE).is_err());

    assert_eq!(block.len(), 4);
    assert_eq!(block.as_slice(), b"keep");
  }

  #[test]
  fn zero_clears_contents() {
    let mut block = AlignedBlock::new(8).unwrap();
    block.as_mut_slice().fill(0xFF);
    block.zero();
    assert!(block.as_slice().iter().all(|&b| b == 0));
  }

  #[test]
  fn empty_block() {
    let block = AlignedBlock::new(0).unwrap();
    assert!(block.is_empty());
    assert!(block.as_slice().is_empty());
  }
}
