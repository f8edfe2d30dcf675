use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, PieceKind, PieceRotation, Position},
};

/// A single cell of the field.
///
/// A cell is either empty (color index `0`) or holds a locked block of some
/// piece kind (color index `1..=7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub const fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }

    #[must_use]
    pub const fn color_index(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.color_index(),
        }
    }
}

/// One row of cells, left to right.
pub type BoardRow = [Cell; BOARD_WIDTH];

const EMPTY_ROW: BoardRow = [Cell::Empty; BOARD_WIDTH];

/// The fixed 10×20 playfield.
///
/// Rows are indexed from the top (`0`) to the bottom (`BOARD_HEIGHT - 1`).
/// The board only stores locked blocks; the falling piece is owned by the
/// caller and checked against the board with [`Board::is_valid_position`].
///
/// Cell queries outside the grid report [`Cell::Empty`]. Collision checks
/// still reject cells left of, right of, or below the grid, but accept cells
/// above it so a piece may overhang the top edge while falling.
///
/// # Example
///
/// ```
/// use tetrust_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::I);
/// let landing = piece.with_position(board.find_drop_position(&piece));
///
/// board.lock_piece(&landing);
/// assert_eq!(board.clear_completed_lines(), 0);
/// assert!(board.cell(3, 19).is_occupied());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.rows.fill(EMPTY_ROW);
    }

    /// Returns the cell at `(x, y)`, or [`Cell::Empty`] outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        match grid_index(x, y) {
            Some((x, y)) => self.rows[y][x],
            None => Cell::Empty,
        }
    }

    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_occupied()
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    /// Returns the rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }

    #[must_use]
    pub fn is_row_complete(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_occupied()))
    }

    /// Checks whether every block of `piece` lies inside the walls, above the
    /// floor, and on an empty cell.
    ///
    /// Blocks above the top edge (`y < 0`) are accepted.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        piece.block_positions().iter().all(|&Position { x, y }| {
            let inside_walls = (0..grid_extent(BOARD_WIDTH)).contains(&x);
            let above_floor = y < grid_extent(BOARD_HEIGHT);
            inside_walls && above_floor && (y < 0 || !self.is_occupied(x, y))
        })
    }

    /// Like [`Self::is_valid_position`], for `piece` moved to a hypothetical pose.
    #[must_use]
    pub fn can_place_piece(
        &self,
        piece: &Piece,
        position: Position,
        rotation: PieceRotation,
    ) -> bool {
        self.is_valid_position(&Piece::at(piece.kind(), position, rotation))
    }

    /// Writes the blocks of `piece` into the grid.
    ///
    /// Blocks above the top edge are clipped and never stored. The caller must
    /// have checked [`Self::is_valid_position`] first; locking an invalid piece
    /// overwrites whatever it overlaps.
    pub fn lock_piece(&mut self, piece: &Piece) {
        debug_assert!(
            self.is_valid_position(piece),
            "locking piece {piece} at an invalid position"
        );
        for Position { x, y } in piece.block_positions() {
            if let Some((x, y)) = grid_index(x, y) {
                self.rows[y][x] = Cell::Filled(piece.kind());
            }
        }
    }

    /// Removes every complete row and returns how many were removed.
    ///
    /// Rows are scanned from the bottom up. When a row is removed, everything
    /// above it shifts down by one and an empty row enters at the top; the
    /// same index is then inspected again, since it now holds the row that
    /// was above.
    pub fn clear_completed_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.is_row_complete(row) {
                self.rows.copy_within(0..row, 1);
                self.rows[0] = EMPTY_ROW;
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Returns the lowest position `piece` can fall to by moving straight down.
    ///
    /// Used for hard drops and the ghost preview. The piece's own position is
    /// returned if it cannot move down at all.
    #[must_use]
    pub fn find_drop_position(&self, piece: &Piece) -> Position {
        let mut dropped = *piece;
        while self.is_valid_position(&dropped.down()) {
            dropped = dropped.down();
        }
        dropped.position()
    }

    /// Checks whether a freshly spawned `kind` would collide immediately.
    #[must_use]
    pub fn is_game_over(&self, kind: PieceKind) -> bool {
        !self.is_valid_position(&Piece::new(kind))
    }
}

#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) const fn grid_extent(len: usize) -> i32 {
    len as i32
}

fn grid_index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|x| *x < BOARD_WIDTH)?;
    let y = usize::try_from(y).ok().filter(|y| *y < BOARD_HEIGHT)?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: Cell = Cell::Filled(PieceKind::I);

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..BOARD_WIDTH {
            board.set_cell(x, y, BLOCK);
        }
    }

    fn occupied(board: &Board) -> Vec<(usize, usize)> {
        board
            .rows()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_occupied())
                    .map(move |(x, _)| (x, y))
            })
            .collect()
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert!(board.is_empty());
        assert_eq!(board.rows().len(), BOARD_HEIGHT);
        for row in board.rows() {
            assert!(row.iter().all(|cell| cell.color_index() == 0));
        }
    }

    #[test]
    fn test_out_of_bounds_cells_are_empty() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, 0);
        assert_eq!(board.cell(-1, 0), Cell::Empty);
        assert_eq!(board.cell(10, 0), Cell::Empty);
        assert_eq!(board.cell(0, -1), Cell::Empty);
        assert_eq!(board.cell(0, 20), Cell::Empty);
        assert_eq!(board.cell(0, 0), BLOCK);
    }

    #[test]
    fn test_valid_position_bounds() {
        let board = Board::EMPTY;
        // I-piece spawn occupies row 1 of its box.
        let piece = Piece::new(PieceKind::I);
        assert!(board.is_valid_position(&piece));
        assert!(board.is_valid_position(&piece.with_position(Position::new(0, 0))));
        assert!(board.is_valid_position(&piece.with_position(Position::new(6, 0))));
        assert!(!board.is_valid_position(&piece.with_position(Position::new(-1, 0))));
        assert!(!board.is_valid_position(&piece.with_position(Position::new(7, 0))));
        assert!(board.is_valid_position(&piece.with_position(Position::new(3, 18))));
        assert!(!board.is_valid_position(&piece.with_position(Position::new(3, 19))));
    }

    #[test]
    fn test_valid_position_allows_overhang() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, 0);
        let vertical = Piece::at(PieceKind::I, Position::new(0, -4), PieceRotation::RIGHT);
        // Entirely above the field: x = 2, y = -4..=-1.
        assert!(board.is_valid_position(&vertical));
        // Reaching row 0, which is filled.
        assert!(!board.is_valid_position(&vertical.down()));
    }

    #[test]
    fn test_collision_with_locked_blocks() {
        let mut board = Board::EMPTY;
        board.set_cell(4, 2, BLOCK);
        let t = Piece::new(PieceKind::T);
        // T spawn covers (4,1), (3,2), (4,2), (5,2).
        assert!(!board.is_valid_position(&t));
        assert!(board.is_valid_position(&t.moved(0, -1)));
        assert!(board.can_place_piece(&t, Position::new(3, -1), PieceRotation::SPAWN));
        assert!(!board.can_place_piece(&t, Position::SPAWN, PieceRotation::REVERSE));
        // The hypothetical check leaves the piece untouched.
        assert_eq!(t, Piece::new(PieceKind::T));
    }

    #[test]
    fn test_lock_piece_writes_color() {
        let mut board = Board::EMPTY;
        let piece = Piece::at(PieceKind::L, Position::new(0, 17), PieceRotation::SPAWN);
        board.lock_piece(&piece);
        assert_eq!(occupied(&board), [(2, 18), (0, 19), (1, 19), (2, 19)]);
        assert_eq!(board.cell(2, 18).color_index(), PieceKind::L.color_index());
        assert_eq!(board.cell(2, 18).kind(), Some(PieceKind::L));
    }

    #[test]
    fn test_lock_piece_clips_overhang() {
        let mut board = Board::EMPTY;
        let vertical = Piece::at(PieceKind::I, Position::new(0, -2), PieceRotation::RIGHT);
        // Cells at x = 2, y = -2..=1.
        board.lock_piece(&vertical);
        assert_eq!(occupied(&board), [(2, 0), (2, 1)]);

        let mut board = Board::EMPTY;
        board.lock_piece(&vertical.with_position(Position::new(0, -4)));
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_on_empty_board() {
        let mut board = Board::EMPTY;
        assert_eq!(board.clear_completed_lines(), 0);
        assert_eq!(board, Board::EMPTY);
    }

    #[test]
    fn test_clear_partial_row_is_kept() {
        let mut board = Board::EMPTY;
        for x in 0..BOARD_WIDTH - 1 {
            board.set_cell(x, 19, BLOCK);
        }
        let before = board.clone();
        assert_eq!(board.clear_completed_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, 3);
        fill_row(&mut board, 7);
        // Markers in rows 0..=2 and 4..=6, one per row at distinct columns.
        for y in [0, 1, 2, 4, 5, 6] {
            board.set_cell(y, y, Cell::Filled(PieceKind::T));
        }

        assert_eq!(board.clear_completed_lines(), 2);

        assert!(!board.is_row_complete(3));
        assert!(!board.is_row_complete(7));
        // Rows above both cleared rows drop by two, rows between drop by one.
        let expected = [(0, 2), (1, 3), (2, 4), (4, 5), (5, 6), (6, 7)];
        let mut actual = occupied(&board);
        actual.sort_by_key(|&(x, _)| x);
        assert_eq!(actual, expected);
        assert!(board.rows().take(2).all(|row| *row == EMPTY_ROW));
    }

    #[test]
    fn test_clear_adjacent_rows_with_reinspection() {
        let mut board = Board::EMPTY;
        for y in 16..20 {
            fill_row(&mut board, y);
        }
        board.set_cell(0, 15, BLOCK);
        assert_eq!(board.clear_completed_lines(), 4);
        assert_eq!(occupied(&board), [(0, 19)]);
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::EMPTY;
        for y in 0..BOARD_HEIGHT {
            fill_row(&mut board, y);
        }
        assert_eq!(board.clear_completed_lines(), BOARD_HEIGHT);
        assert!(board.is_empty());
    }

    #[test]
    fn test_find_drop_position() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::O);
        // O occupies rows 1..=2 of its box.
        assert_eq!(board.find_drop_position(&piece), Position::new(3, 17));

        board.set_cell(4, 10, BLOCK);
        assert_eq!(board.find_drop_position(&piece), Position::new(3, 7));
    }

    #[test]
    fn test_find_drop_position_is_idempotent() {
        let mut board = Board::EMPTY;
        board.set_cell(5, 12, BLOCK);
        board.set_cell(2, 15, BLOCK);
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            let first = board.find_drop_position(&piece);
            let landed = piece.with_position(first);
            assert_eq!(board.find_drop_position(&landed), first);
            assert!(board.is_valid_position(&landed));
            assert!(!board.is_valid_position(&landed.down()));
        }
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut board = Board::EMPTY;
        assert!(!board.is_game_over(PieceKind::T));
        board.set_cell(4, 1, BLOCK);
        assert!(board.is_game_over(PieceKind::T));
        assert!(board.is_game_over(PieceKind::O));
        // I-piece spawn row 1 spans x = 3..=6 too.
        assert!(board.is_game_over(PieceKind::I));
        board.clear();
        assert!(!board.is_game_over(PieceKind::T));
    }
}
