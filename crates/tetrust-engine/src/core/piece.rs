use std::{fmt, ops::RangeInclusive, str::FromStr};

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X, SPAWN_Y,
    board::{Board, grid_extent},
    shape::{self, SHAPE_SIZE},
};

/// A tetromino of a given kind placed on (or above) the board.
///
/// Pieces are plain values. The `left`/`right`/`down`/`rotated`/`with_*`
/// methods return a moved copy so a hypothetical pose can be tested against a
/// [`Board`] without touching `self`; the `move_*`/`rotate` methods
/// mutate in place. None of them validate against the board.
///
/// # Example
///
/// ```
/// use tetrust_engine::{Piece, PieceKind, Position, RotationDirection};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.right().rotated(RotationDirection::Clockwise);
/// assert_eq!(moved.position(), piece.position() + Position::new(1, 0));
/// assert_eq!(piece.block_positions().len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    position: Position,
    rotation: PieceRotation,
}

impl Piece {
    /// Creates a piece in its spawn pose.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            position: Position::SPAWN,
            rotation: PieceRotation::SPAWN,
        }
    }

    #[must_use]
    pub const fn at(kind: PieceKind, position: Position, rotation: PieceRotation) -> Self {
        Self {
            kind,
            position,
            rotation,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    /// Absolute board coordinates of the four occupied cells.
    #[must_use]
    pub fn block_positions(&self) -> ArrayVec<Position, 4> {
        shape::occupied_offsets(self.kind, self.rotation)
            .map(|(dx, dy)| self.position + Position::from_offset(dx, dy))
            .collect()
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        self.with_position(self.position + Position::new(dx, dy))
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.moved(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.moved(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.moved(0, 1)
    }

    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        self.with_rotation(self.rotation.rotated(direction))
    }

    #[must_use]
    pub const fn with_rotation(&self, rotation: PieceRotation) -> Self {
        Self { rotation, ..*self }
    }

    #[must_use]
    pub const fn with_position(&self, position: Position) -> Self {
        Self { position, ..*self }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        *self = self.moved(dx, dy);
    }

    pub fn move_left(&mut self) {
        self.move_by(-1, 0);
    }

    pub fn move_right(&mut self) {
        self.move_by(1, 0);
    }

    pub fn move_down(&mut self) {
        self.move_by(0, 1);
    }

    pub fn rotate(&mut self, direction: RotationDirection) {
        self.rotation = self.rotation.rotated(direction);
    }

    /// Rotates the piece, trying each of [`KICK_OFFSETS`] in order.
    ///
    /// Returns the first rotated pose the board accepts, or `None` if every
    /// candidate collides.
    #[must_use]
    pub fn kicked_rotation(&self, direction: RotationDirection, board: &Board) -> Option<Self> {
        let rotation = self.rotation.rotated(direction);
        KICK_OFFSETS.iter().find_map(|&(dx, dy)| {
            let position = self.position + Position::new(dx, dy);
            board
                .can_place_piece(self, position, rotation)
                .then_some(Self::at(self.kind, position, rotation))
        })
    }
}

/// Offsets tried, in order, when rotating a piece.
///
/// This is a simplified kick list, not the Super Rotation System: it ignores
/// the piece kind and the rotation states involved. The unshifted rotation
/// comes first, then one column left or right, then one row up alone and
/// combined with a sideways shift.
pub const KICK_OFFSETS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-1, -1), (1, -1)];

// Compact notation "K#r@x,y", e.g. "T#1@3,-1".
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.index(),
            self.position.x,
            self.position.y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece notation '{input}': {reason}")]
pub struct ParsePieceError {
    input: String,
    reason: &'static str,
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParsePieceError {
            input: s.to_owned(),
            reason,
        };

        let (kind, rest) = s.split_once('#').ok_or_else(|| err("missing '#'"))?;
        let (rotation, position) = rest.split_once('@').ok_or_else(|| err("missing '@'"))?;
        let (x, y) = position.split_once(',').ok_or_else(|| err("missing ','"))?;

        let mut chars = kind.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => PieceKind::from_char(c).ok_or_else(|| err("unknown piece kind"))?,
            _ => return Err(err("piece kind must be a single character")),
        };
        let rotation = rotation
            .parse::<u8>()
            .ok()
            .filter(|r| *r < 4)
            .ok_or_else(|| err("rotation must be 0-3"))?;
        let x = x
            .parse()
            .ok()
            .filter(|x| Position::X_RANGE.contains(x))
            .ok_or_else(|| err("x coordinate out of range"))?;
        let y = y
            .parse()
            .ok()
            .filter(|y| Position::Y_RANGE.contains(y))
            .ok_or_else(|| err("y coordinate out of range"))?;

        Ok(Self::at(kind, Position::new(x, y), PieceRotation(rotation)))
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A board coordinate, or the top-left corner of a piece's 4×4 box.
///
/// `y` may be negative for cells above the visible field.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Add,
    derive_more::Sub,
    Serialize,
    Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const SPAWN: Self = Self::new(SPAWN_X, SPAWN_Y);

    /// Box corners accepted by the piece notation: the field plus one box
    /// width of margin on each side.
    pub const X_RANGE: RangeInclusive<i32> =
        -BOX_MARGIN..=grid_extent(BOARD_WIDTH) + BOX_MARGIN;
    pub const Y_RANGE: RangeInclusive<i32> =
        -BOX_MARGIN..=grid_extent(BOARD_HEIGHT) + BOX_MARGIN;

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    const fn from_offset(dx: usize, dy: usize) -> Self {
        // Shape offsets are always below SHAPE_SIZE.
        Self::new(dx as i32, dy as i32)
    }
}

const BOX_MARGIN: i32 = grid_extent(SHAPE_SIZE);

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);
    pub const RIGHT: Self = Self(1);
    pub const REVERSE: Self = Self(2);
    pub const LEFT: Self = Self(3);

    /// Creates a rotation state, wrapping `index` modulo 4.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            RotationDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// Color index stored in locked cells, in `1..=7`.
    ///
    /// `0` is reserved for empty cells.
    #[must_use]
    pub const fn color_index(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub const fn from_color_index(index: u8) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[index as usize - 1]),
            _ => None,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrust_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(piece: &Piece) -> Vec<(i32, i32)> {
        piece.block_positions().iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_block_positions_are_offset_by_position() {
        let piece = Piece::at(PieceKind::T, Position::new(2, 5), PieceRotation::SPAWN);
        assert_eq!(positions(&piece), [(3, 6), (2, 7), (3, 7), (4, 7)]);

        let above = piece.with_position(Position::new(0, -2));
        assert_eq!(positions(&above), [(1, -1), (0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_spawn_pose() {
        let piece = Piece::new(PieceKind::I);
        assert_eq!(piece.position(), Position::new(3, 0));
        assert_eq!(piece.rotation(), PieceRotation::SPAWN);
        assert_eq!(positions(&piece), [(3, 1), (4, 1), (5, 1), (6, 1)]);
    }

    #[test]
    fn test_with_methods_do_not_mutate() {
        let piece = Piece::new(PieceKind::L);
        let rotated = piece.with_rotation(PieceRotation::REVERSE);
        let moved = piece.with_position(Position::new(7, 9));

        assert_eq!(piece, Piece::new(PieceKind::L));
        assert_eq!(rotated.rotation(), PieceRotation::REVERSE);
        assert_eq!(rotated.position(), piece.position());
        assert_eq!(moved.position(), Position::new(7, 9));
        assert_eq!(moved.rotation(), piece.rotation());
    }

    #[test]
    fn test_mutating_moves() {
        let mut piece = Piece::new(PieceKind::S);
        piece.move_left();
        piece.move_left();
        piece.move_right();
        piece.move_down();
        piece.move_by(3, -4);
        assert_eq!(piece.position(), Position::new(SPAWN_X + 2, SPAWN_Y - 3));
    }

    #[test]
    fn test_rotation_wraps() {
        let mut piece = Piece::new(PieceKind::J);
        piece.rotate(RotationDirection::CounterClockwise);
        assert_eq!(piece.rotation(), PieceRotation::LEFT);
        for _ in 0..4 {
            piece.rotate(RotationDirection::Clockwise);
        }
        assert_eq!(piece.rotation(), PieceRotation::LEFT);
        assert_eq!(PieceRotation::new(6), PieceRotation::REVERSE);
        assert_eq!(
            piece
                .rotated(RotationDirection::Clockwise)
                .rotated(RotationDirection::Clockwise.reversed()),
            piece
        );
    }

    #[test]
    fn test_color_index_round_trip() {
        for kind in PieceKind::ALL {
            let index = kind.color_index();
            assert!((1..=7).contains(&index));
            assert_eq!(PieceKind::from_color_index(index), Some(kind));
        }
        assert_eq!(PieceKind::from_color_index(0), None);
        assert_eq!(PieceKind::from_color_index(8), None);
    }

    #[test]
    fn test_piece_notation() {
        let piece = Piece::at(PieceKind::S, Position::new(4, -1), PieceRotation::RIGHT);
        assert_eq!(piece.to_string(), "S#1@4,-1");
        assert_eq!("S#1@4,-1".parse::<Piece>(), Ok(piece));

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,-1\"");
        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_notation_errors() {
        for input in ["S1@4,18", "S#1#4,18", "S#1@4", "X#1@4,18", "SZ#1@4,18", "S#4@4,18", "S#1@a,1"] {
            assert!(input.parse::<Piece>().is_err(), "{input} should be rejected");
        }
        assert!(serde_json::from_str::<Piece>("\"T#-1@0,0\"").is_err());
    }

    #[test]
    fn test_piece_notation_bounds_coordinates() {
        for input in ["I#0@2147483647,0", "I#0@0,-2147483648", "I#0@15,0", "I#0@0,-5"] {
            assert!(input.parse::<Piece>().is_err(), "{input} should be rejected");
        }
        let corner = "I#0@14,-4".parse::<Piece>().unwrap();
        assert_eq!(corner.position(), Position::new(14, -4));
        assert_eq!(corner.block_positions().len(), 4);
        assert!(!Board::EMPTY.is_valid_position(&corner));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('t'), None);
    }
}
