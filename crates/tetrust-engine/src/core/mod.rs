//! Board and piece primitives.
//!
//! - [`PieceKind`] and the static shape table it indexes
//! - [`Piece`] - a kind placed at a [`Position`] with a [`PieceRotation`]
//! - [`Board`] - the 10×20 cell grid, collision checks, locking and line clears
//!
//! Coordinates are `(x, y)` with `(0, 0)` at the top-left visible cell; `y`
//! grows downward. Rows with `y < 0` lie above the visible field and are legal
//! for a falling piece, but they are never stored in the grid.

pub use self::{board::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;

/// Number of columns in the field.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows in the field.
pub const BOARD_HEIGHT: usize = 20;

/// Column of the top-left corner of a freshly spawned piece's 4×4 box.
#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub const SPAWN_X: i32 = (BOARD_WIDTH / 2) as i32 - 2;
/// Row of the top-left corner of a freshly spawned piece's 4×4 box.
pub const SPAWN_Y: i32 = 0;
