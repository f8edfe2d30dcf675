use super::piece::{PieceKind, PieceRotation};

/// Occupancy of a piece within its 4×4 bounding box, indexed `[y][x]`.
pub type PieceShape = [[bool; 4]; 4];

/// Side length of the bounding box every shape is drawn in.
pub const SHAPE_SIZE: usize = 4;

/// Returns the occupancy grid of `kind` in `rotation`.
///
/// # Example
///
/// ```
/// use tetrust_engine::{PieceKind, PieceRotation, shape};
///
/// let grid = shape(PieceKind::I, PieceRotation::SPAWN);
/// assert_eq!(grid[1], [true; 4]);
/// ```
#[must_use]
pub fn shape(kind: PieceKind, rotation: PieceRotation) -> &'static PieceShape {
    &PIECE_SHAPES[kind as usize][rotation.as_usize()]
}

/// Returns the `(dx, dy)` offsets of occupied cells, row by row.
pub fn occupied_offsets(
    kind: PieceKind,
    rotation: PieceRotation,
) -> impl Iterator<Item = (usize, usize)> {
    shape(kind, rotation)
        .iter()
        .enumerate()
        .flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(dx, &cell)| cell.then_some((dx, dy)))
        })
}

// Rotation 0 is the spawn orientation; each following entry is a quarter turn
// clockwise. The O-piece is identical in all four states.
const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        // I-piece
        [
            [EEEE, [C, C, C, C], EEEE, EEEE],
            [[E, E, C, E], [E, E, C, E], [E, E, C, E], [E, E, C, E]],
            [EEEE, EEEE, [C, C, C, C], EEEE],
            [[E, C, E, E], [E, C, E, E], [E, C, E, E], [E, C, E, E]],
        ],
        // O-piece
        [
            [EEEE, [E, C, C, E], [E, C, C, E], EEEE],
            [EEEE, [E, C, C, E], [E, C, C, E], EEEE],
            [EEEE, [E, C, C, E], [E, C, C, E], EEEE],
            [EEEE, [E, C, C, E], [E, C, C, E], EEEE],
        ],
        // T-piece
        [
            [EEEE, [E, C, E, E], [C, C, C, E], EEEE],
            [EEEE, [E, C, E, E], [E, C, C, E], [E, C, E, E]],
            [EEEE, EEEE, [C, C, C, E], [E, C, E, E]],
            [EEEE, [E, C, E, E], [C, C, E, E], [E, C, E, E]],
        ],
        // S-piece
        [
            [EEEE, [E, C, C, E], [C, C, E, E], EEEE],
            [EEEE, [E, C, E, E], [E, C, C, E], [E, E, C, E]],
            [EEEE, EEEE, [E, C, C, E], [C, C, E, E]],
            [EEEE, [C, E, E, E], [C, C, E, E], [E, C, E, E]],
        ],
        // Z-piece
        [
            [EEEE, [C, C, E, E], [E, C, C, E], EEEE],
            [EEEE, [E, E, C, E], [E, C, C, E], [E, C, E, E]],
            [EEEE, EEEE, [C, C, E, E], [E, C, C, E]],
            [EEEE, [E, C, E, E], [C, C, E, E], [C, E, E, E]],
        ],
        // J-piece
        [
            [EEEE, [C, E, E, E], [C, C, C, E], EEEE],
            [EEEE, [E, C, C, E], [E, C, E, E], [E, C, E, E]],
            [EEEE, EEEE, [C, C, C, E], [E, E, C, E]],
            [EEEE, [E, C, E, E], [E, C, E, E], [C, C, E, E]],
        ],
        // L-piece
        [
            [EEEE, [E, E, C, E], [C, C, C, E], EEEE],
            [EEEE, [E, C, E, E], [E, C, E, E], [E, C, C, E]],
            [EEEE, EEEE, [C, C, C, E], [C, E, E, E]],
            [EEEE, [C, C, E, E], [E, C, E, E], [E, C, E, E]],
        ],
    ]
};
