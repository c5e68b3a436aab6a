//! Maximum-alignment heap allocation on top of `malloc(3)`.
//!
//! Every block is over-allocated so that the payload can be moved forward to
//! the next [`MAX_ALIGN`] boundary, and the address originally returned by
//! `malloc` is kept in a header word sitting right before the payload:
//!
//! ```text
//!        header (one pointer wide)
//!           v
//!   [ pad  |origin][ size bytes, zeroed ............ ][ slack ]
//!   ^                ^
//!   malloc           returned pointer (address % MAX_ALIGN == 0)
//! ```
//!
//! [`free`] reads the header back and hands `origin` to `free(3)`.

use std::{cmp, mem, ptr::NonNull};

use libc::c_void;

use crate::{align::MAX_ALIGN, error::AllocError};

/// Size of the hidden header that stores the origin pointer.
pub const HEADER_SIZE: usize = mem::size_of::<*mut u8>();

/// Sentinel size for [`reallocate`] meaning "release the block".
pub const RELEASE: usize = usize::MAX;

/// Allocates `size` zeroed bytes aligned to [`MAX_ALIGN`].
///
/// # Safety
///
/// The returned pointer must be released with [`free`] (or passed to
/// [`reallocate`]) exactly once, and never with `libc::free` directly.
pub unsafe fn allocate(size: usize) -> Result<NonNull<u8>, AllocError> {
  let total = size
    .checked_add(MAX_ALIGN - 1)
    .and_then(|total| total.checked_add(HEADER_SIZE))
    .ok_or(AllocError::SizeOverflow { requested: size })?;

  let origin = unsafe { libc::malloc(total) } as *mut u8;

  let Some(origin) = NonNull::new(origin) else {
    tracing::warn!(requested = total, "malloc returned null");
    return Err(AllocError::OutOfMemory { requested: total });
  };

  unsafe {
    let current = origin.as_ptr() as usize + HEADER_SIZE;
    let aligned = crate::align!(current);
    let payload = origin.add(aligned - origin.as_ptr() as usize);

    let head = payload.sub(HEADER_SIZE).cast::<*mut u8>();
    head.write(origin.as_ptr());

    payload.write_bytes(0, size);

    Ok(payload)
  }
}

/// Releases a block returned by [`allocate`] or [`reallocate`].
///
/// `None` is a no-op.
///
/// # Safety
///
/// `ptr` must come from this module and must not have been freed already.
pub unsafe fn free(ptr: Option<NonNull<u8>>) {
  let Some(ptr) = ptr else {
    return;
  };

  unsafe {
    let origin = ptr.sub(HEADER_SIZE).cast::<*mut u8>().read();
    libc::free(origin as *mut c_void);
  }
}

/// Moves a block into a freshly allocated one of `new_size` bytes.
///
/// - `ptr == None` behaves as [`allocate`].
/// - `new_size == RELEASE` frees the block and returns `Ok(None)`.
/// - Otherwise `min(old_size, new_size)` bytes are copied into the new block
///   and the old one is freed. Bytes past `old_size` are zero.
///
/// On error the old block is left untouched and still belongs to the caller.
///
/// # Safety
///
/// `ptr` must come from this module, be live, and span at least `old_size`
/// bytes.
pub unsafe fn reallocate(
  ptr: Option<NonNull<u8>>,
  old_size: usize,
  new_size: usize,
) -> Result<Option<NonNull<u8>>, AllocError> {
  let Some(old) = ptr else {
    return unsafe { allocate(new_size) }.map(Some);
  };

  if new_size == RELEASE {
    unsafe { free(Some(old)) };
    return Ok(None);
  }

  unsafe {
    let new = allocate(new_size)?;
    new.copy_from_nonoverlapping(old, cmp::min(old_size, new_size));
    free(Some(old));
    Ok(Some(new))
  }
}
