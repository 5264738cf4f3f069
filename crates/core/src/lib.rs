//! Cascade core crate - board, piece catalog, and action alphabet.

pub mod action;
pub mod bits;
pub mod board;
pub mod piece;

pub use action::{Action, ActionKind, ActionList};
pub use board::Board;
pub use piece::{Bounds, Pose, Shape, Spawn, SEQUENCE};

/// Well height in rows. Row 0 is the top visible row, row `H - 1` the floor.
pub const H: usize = 20;
/// Well width in columns.
pub const W: usize = 10;
/// Bitmask of a completely full row.
pub const FULL_ROW: u16 = (1 << W) - 1;
/// Number of 64-bit words in the packed row view (four rows per word).
pub const WORDS: usize = H / 4;
/// Pieces in one full game.
pub const STEPS: usize = 10_000;
