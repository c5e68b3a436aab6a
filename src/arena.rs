//! Chained bump arena.
//!
//! ```text
//!   Arena
//!   ┌──────────────────────────┐   ┌──────────────────────────┐
//!   │ region 0 (head)          │   │ region 1                 │
//!   │ ┌────┬────┬────────────┐ │   │ ┌──────────┬───────────┐ │
//!   │ │ A1 │ A2 │   free     │ │ → │ │    A3    │   free    │ │ → ...
//!   │ └────┴────┴────────────┘ │   │ └──────────┴───────────┘ │
//!   └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! Allocations bump a per-region cursor. A request is served by the first
//! region, head to tail, that still has room for it; when none does, a new
//! region of `max(tail capacity, size)` bytes is appended. Regions are never
//! reordered and only [`Arena::reset`] or dropping the arena releases them.

use std::{alloc::Layout, cell::RefCell, cmp, fmt, slice};

use crate::{block::AlignedBlock, config::ArenaConfig, error::AllocError};

struct Region {
  block: AlignedBlock,
  used: usize,
}

impl Region {
  fn new(capacity: usize) -> Result<Self, AllocError> {
    Ok(Self {
      block: AlignedBlock::new(capacity)?,
      used: 0,
    })
  }

  fn capacity(&self) -> usize {
    self.block.len()
  }

  fn bump(
    &mut self,
    size: usize,
  ) -> Option<*mut u8> {
    if size > self.capacity() - self.used {
      return None;
    }

    let ptr = unsafe { self.block.as_ptr().add(self.used) };
    self.used += size;

    Some(ptr)
  }
}

/// A forward-only memory pool made of a chain of zeroed regions.
///
/// Handed-out byte ranges borrow the arena, so they cannot outlive it and
/// cannot survive a [`reset`](Arena::reset).
pub struct Arena {
  regions: RefCell<Vec<Region>>,
}

impl Arena {
  /// Creates an arena whose head region holds `capacity` bytes.
  ///
  /// Arena creation is treated as infallible: if the region cannot be
  /// allocated the process aborts. Use [`Arena::try_new`] to handle the
  /// failure instead.
  pub fn new(capacity: usize) -> Self {
    Self::try_new(capacity).unwrap_or_else(|err| fatal(err, capacity))
  }

  pub fn try_new(capacity: usize) -> Result<Self, AllocError> {
    let head = Region::new(capacity)?;

    tracing::debug!(capacity, "arena initialized");

    Ok(Self {
      regions: RefCell::new(vec![head]),
    })
  }

  pub fn with_config(config: &ArenaConfig) -> Self {
    Self::new(config.region_capacity)
  }

  /// Bump-allocates `size` zeroed bytes, chaining a new region if needed.
  ///
  /// Aborts the process if a new region cannot be allocated.
  #[allow(clippy::mut_from_ref)]
  pub fn alloc(
    &self,
    size: usize,
  ) -> &mut [u8] {
    self.try_alloc(size).unwrap_or_else(|err| fatal(err, size))
  }

  /// Fallible form of [`Arena::alloc`].
  #[allow(clippy::mut_from_ref)]
  pub fn try_alloc(
    &self,
    size: usize,
  ) -> Result<&mut [u8], AllocError> {
    let mut regions = self.regions.borrow_mut();

    let ptr = match regions.iter_mut().find_map(|region| region.bump(size)) {
      Some(ptr) => ptr,
      None => {
        let tail = regions.last().map_or(0, Region::capacity);
        let mut region = Region::new(cmp::max(tail, size))?;

        region.used = size;
        let ptr = region.block.as_ptr();

        tracing::debug!(
          node = regions.len(),
          capacity = region.capacity(),
          requested = size,
          "arena chained a new region"
        );

        regions.push(region);
        ptr
      }
    };

    tracing::trace!(size, ?ptr, "arena allocation");

    // Every range is handed out once and region buffers never move, so the
    // slice stays valid and unaliased for as long as `self` is borrowed.
    Ok(unsafe { slice::from_raw_parts_mut(ptr, size) })
  }

  /// Restores the arena to its just-created state.
  ///
  /// The head region is zeroed and rewound; every chained region is freed.
  pub fn reset(&mut self) {
    let regions = self.regions.get_mut();
    let released = regions.len() - 1;

    regions.truncate(1);

    if let Some(head) = regions.first_mut() {
      head.used = 0;
      head.block.zero();
    }

    tracing::debug!(released, "arena reset");
  }

  /// Number of regions in the chain, head included.
  pub fn node_count(&self) -> usize {
    self.regions.borrow().len()
  }

  /// Bytes handed out across the whole chain.
  pub fn used(&self) -> usize {
    self.regions.borrow().iter().map(|region| region.used).sum()
  }

  /// Bytes reserved across the whole chain.
  pub fn capacity(&self) -> usize {
    self.regions.borrow().iter().map(Region::capacity).sum()
  }

  /// Capacity the arena was created with.
  pub fn head_capacity(&self) -> usize {
    self.regions.borrow().first().map_or(0, Region::capacity)
  }
}

impl Default for Arena {
  fn default() -> Self {
    Self::with_config(&ArenaConfig::default())
  }
}

impl fmt::Debug for Arena {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Arena")
      .field("nodes", &self.node_count())
      .field("used", &self.used())
      .field("capacity", &self.capacity())
      .finish()
  }
}

fn fatal(
  err: AllocError,
  size: usize,
) -> ! {
  tracing::error!(%err, size, "fatal: failed to allocate arena region");

  let layout = Layout::from_size_align(size, 1).unwrap_or(Layout::new::<u8>());
  std::alloc::handle_alloc_error(layout)
}
