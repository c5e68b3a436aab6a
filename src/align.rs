use std::mem;

/// Every scalar kind the platform knows about. Its alignment is the
/// strictest alignment any scalar can require.
#[allow(dead_code)]
#[repr(C)]
union MaxAlign {
  c: u8,
  s: u16,
  i: u32,
  l: u64,
  f: f32,
  d: f64,
  p: *const u8,
  fp: fn(),
}

/// The platform's maximum scalar alignment.
pub const MAX_ALIGN: usize = mem::align_of::<MaxAlign>();

/// Rounds a value up to an alignment boundary.
///
/// With one argument the value is rounded up to [`MAX_ALIGN`]; with two
/// arguments it is rounded up to the given power-of-two alignment.
///
/// # Examples
///
/// ```rust
/// use rarena::align;
/// use rarena::align::MAX_ALIGN;
///
/// assert_eq!(align!(13, 8), 16);
/// assert_eq!(align!(16, 8), 16);
/// assert_eq!(align!(1) % MAX_ALIGN, 0);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align!($value, $crate::align::MAX_ALIGN)
  };
  ($value:expr, $alignment:expr) => {
    ($value + ($alignment - 1)) & !($alignment - 1)
  };
}
