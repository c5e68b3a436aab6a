use rarena::{Arena, ArenaStr, Vector, align::MAX_ALIGN};
use tracing_subscriber::EnvFilter;

/// Waits until the user presses ENTER.
/// Run with `RUST_LOG=rarena=trace` to watch the arena log each step.
fn block_until_enter_pressed(scratch: &Arena) {
  println!("\n>>> Press ENTER to continue...");
  let _ = ArenaStr::read_line_stdin(scratch);
}

fn print_arena(
  label: &str,
  arena: &Arena,
) {
  println!(
    "[{}] nodes = {}, used = {} bytes, capacity = {} bytes",
    label,
    arena.node_count(),
    arena.used(),
    arena.capacity(),
  );
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let scratch = Arena::new(256);

  // A 64 byte arena: small enough to watch it chain new regions.
  let mut arena = Arena::new(64);
  print_arena("start", &arena);
  block_until_enter_pressed(&scratch);

  // --------------------------------------------------------------------
  // 1) Allocate 40 bytes. Fits in the head region.
  // --------------------------------------------------------------------
  let first = arena.alloc(40);
  first.fill(0xAB);
  println!("\n[1] alloc(40) at {:?}, addr % MAX_ALIGN = {}", first.as_ptr(), first.as_ptr() as usize % MAX_ALIGN);
  print_arena("1", &arena);
  block_until_enter_pressed(&scratch);

  // --------------------------------------------------------------------
  // 2) Allocate 40 more bytes. The head only has 24 left, so a second
  //    region is chained.
  // --------------------------------------------------------------------
  let second = arena.alloc(40);
  println!("\n[2] alloc(40) at {:?}", second.as_ptr());
  print_arena("2", &arena);
  block_until_enter_pressed(&scratch);

  // --------------------------------------------------------------------
  // 3) Build a few strings. Small ones still fit in the head region.
  // --------------------------------------------------------------------
  let project = ArenaStr::new(&arena, "  demo  ").trim(&arena);
  let path = ArenaStr::concat_raw(&arena, &["src/", "main.c"]);
  let command = ArenaStr::concat(&arena, &[ArenaStr::new(&arena, "cc -o "), project, ArenaStr::new(&arena, " "), path]);
  println!("\n[3] command = {command:?}, upper = {:?}", command.to_upper(&arena));
  print_arena("3", &arena);
  block_until_enter_pressed(&scratch);

  // --------------------------------------------------------------------
  // 4) Vectors own their buffer, independent of any arena.
  // --------------------------------------------------------------------
  let mut lengths: Vector<usize> = Vector::new();
  for s in [project, path, command] {
    let _ = lengths.append(s.len());
  }
  println!("\n[4] lengths = {lengths:?}, capacity = {}", lengths.capacity());
  block_until_enter_pressed(&scratch);

  // --------------------------------------------------------------------
  // 5) Reset. Every chained region is released; the head is rewound.
  // --------------------------------------------------------------------
  arena.reset();
  print_arena("5", &arena);

  println!("\n[6] End of example. Dropping the arenas releases every region.");
}
