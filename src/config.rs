//! Arena configuration parameters.

/// Configuration for an [`Arena`](crate::Arena).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
  /// Capacity in bytes of the head region, and the minimum capacity of every
  /// region chained after it.
  ///
  /// Default: 4096.
  pub region_capacity: usize,
}

impl ArenaConfig {
  /// Default head region capacity in bytes.
  pub const DEFAULT_REGION_CAPACITY: usize = 4096;

  /// Create a config with the given head region capacity.
  pub fn new(region_capacity: usize) -> Self {
    Self { region_capacity }
  }
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self::new(Self::DEFAULT_REGION_CAPACITY)
  }
}
