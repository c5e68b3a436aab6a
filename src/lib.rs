//! # rarena - Arena-backed memory primitives
//!
//! This crate provides the memory layer of a small build tool: an aligned
//! heap allocator, a chained bump **arena** built on it, a growable
//! **vector** with its own buffer, and a NUL-terminated **string** view whose
//! bytes live in an arena.
//!
//! ## Overview
//!
//! ```text
//!   Chained Arena:
//!
//!   ┌───────────────────────────────┐     ┌──────────────────────────┐
//!   │ head region (capacity N)      │     │ region 2 (max(N, size))  │
//!   │ ┌─────┬─────┬─────┬─────────┐ │     │ ┌────────────┬─────────┐ │
//!   │ │ A1  │ A2  │ A3  │  free   │ │ ──▶ │ │     A4     │  free   │ │
//!   │ └─────┴─────┴─────┴─────────┘ │     │ └────────────┴─────────┘ │
//!   │                   ▲           │     │              ▲           │
//!   │                 used          │     │            used          │
//!   └───────────────────────────────┘     └──────────────────────────┘
//!
//!   Each allocation "bumps" a region's used count forward.
//!   A request that fits nowhere chains a new region.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rarena
//!   ├── align      - MAX_ALIGN and the align! macro
//!   ├── heap       - allocate / free / reallocate with a hidden header word
//!   ├── block      - AlignedBlock, an owning handle over one heap block
//!   ├── config     - ArenaConfig
//!   ├── arena      - Arena, the chained bump allocator
//!   ├── vector     - RawVector and the typed Vector<T>
//!   ├── string     - ArenaStr, arena-scoped strings
//!   └── error      - AllocError, VectorError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rarena::{Arena, ArenaStr, Vector};
//!
//! let arena = Arena::new(64);
//!
//! let name = ArenaStr::new(&arena, "  main.c  ").trim(&arena);
//! let cmd = ArenaStr::concat_raw(&arena, &["gcc ", "-o main "]);
//! let cmd = ArenaStr::concat(&arena, &[cmd, name]);
//! assert_eq!(cmd, "gcc -o main main.c");
//!
//! let mut sizes: Vector<usize> = Vector::new();
//! sizes.append(cmd.len()).unwrap();
//! assert_eq!(sizes.at(0), Some(18));
//! ```
//!
//! ## How It Works
//!
//! Heap blocks are over-allocated and the payload is moved up to the next
//! [`MAX_ALIGN`](align::MAX_ALIGN) boundary. The pointer `malloc` returned is
//! stored in the word right before the payload:
//!
//! ```text
//!   ┌──────────┬──────────┬────────────────────────────┬────────┐
//!   │ padding  │  origin  │      size bytes (zeroed)   │ slack  │
//!   └──────────┴──────────┴────────────────────────────┴────────┘
//!   ▲                     ▲
//!   malloc                pointer returned to the user
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization primitives
//! - **No individual frees**: arena memory is released by reset or drop
//! - **ASCII only**: case mapping and trimming know nothing about unicode
//! - **Unix-flavoured**: the underlying heap is `libc::malloc`

pub mod align;
pub mod arena;
pub mod block;
pub mod config;
pub mod error;
pub mod heap;
pub mod string;
pub mod vector;

pub use arena::Arena;
pub use block::AlignedBlock;
pub use config::ArenaConfig;
pub use error::{AllocError, VectorError};
pub use string::ArenaStr;
pub use vector::{RawVector, Vector};
