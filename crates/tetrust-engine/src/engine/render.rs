use std::fmt::{self, Write as _};

use arrayvec::ArrayVec;

use crate::core::{
    BOARD_HEIGHT, BOARD_WIDTH, Board, Piece, PieceKind, Position, board::grid_extent,
};

use super::{config::MAX_PREVIEW, game_session::SessionState, game_stats::GameStats};

/// Everything a frontend needs to draw one frame.
///
/// Produced by [`GameSession::view`](super::GameSession::view). The view
/// borrows the session, so it cannot outlive the next mutation.
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    pub board: &'a Board,
    pub falling_piece: Piece,
    /// The falling piece at its hard drop landing position.
    pub ghost_piece: Piece,
    pub next_pieces: ArrayVec<PieceKind, MAX_PREVIEW>,
    pub held_piece: Option<PieceKind>,
    /// Whether a hold is currently allowed.
    pub hold_available: bool,
    pub stats: &'a GameStats,
    pub state: SessionState,
}

impl RenderView<'_> {
    /// Returns what to draw at `(x, y)`, layering the falling piece over its
    /// ghost over the locked cells.
    #[must_use]
    pub fn display_cell(&self, x: i32, y: i32) -> DisplayCell {
        let position = Position::new(x, y);
        if self.falling_piece.block_positions().contains(&position) {
            return DisplayCell::Falling(self.falling_piece.kind());
        }
        if let Some(kind) = self.board.cell(x, y).kind() {
            return DisplayCell::Locked(kind);
        }
        if self.ghost_piece.block_positions().contains(&position) {
            return DisplayCell::Ghost(self.ghost_piece.kind());
        }
        DisplayCell::Empty
    }
}

/// A single visible cell of the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DisplayCell {
    Empty,
    Locked(PieceKind),
    Falling(PieceKind),
    Ghost(PieceKind),
}

/// A frontend that draws the game.
///
/// The session never draws itself; a game loop asks it for a
/// [`RenderView`] and passes that to a renderer once per frame.
pub trait Renderer {
    type Error;

    /// Draws one frame.
    fn render(&mut self, view: &RenderView<'_>) -> Result<(), Self::Error>;
}

/// Plain-text renderer, one character per cell.
///
/// Locked and falling cells use the piece letter, the ghost `:`, empty cells
/// `.`. The status line and the hold/next summary follow the field.
#[derive(Debug, Default, Clone)]
pub struct TextRenderer {
    frame: String,
}

impl TextRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered frame.
    #[must_use]
    pub fn frame(&self) -> &str {
        &self.frame
    }
}

impl Renderer for TextRenderer {
    type Error = fmt::Error;

    fn render(&mut self, view: &RenderView<'_>) -> Result<(), Self::Error> {
        self.frame.clear();
        for y in 0..grid_extent(BOARD_HEIGHT) {
            for x in 0..grid_extent(BOARD_WIDTH) {
                let ch = match view.display_cell(x, y) {
                    DisplayCell::Empty => '.',
                    DisplayCell::Ghost(_) => ':',
                    DisplayCell::Locked(kind) | DisplayCell::Falling(kind) => kind.as_char(),
                };
                self.frame.push(ch);
            }
            self.frame.push('\n');
        }

        let state = match view.state {
            SessionState::Playing => "",
            SessionState::Paused => " PAUSED",
            SessionState::GameOver => " GAME OVER",
        };
        writeln!(
            self.frame,
            "score {} level {} lines {}{state}",
            view.stats.score(),
            view.stats.level(),
            view.stats.total_cleared_lines(),
        )?;
        let held = view.held_piece.map_or('-', PieceKind::as_char);
        let next: String = view.next_pieces.iter().map(|kind| kind.as_char()).collect();
        writeln!(self.frame, "hold {held} next {next}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        core::Cell,
        engine::{GameSession, PieceSeed, SessionConfig},
    };

    use super::*;

    #[test]
    fn test_display_cell_layers() {
        let mut board = Board::EMPTY;
        board.set_cell(0, 19, Cell::Filled(PieceKind::Z));
        let stats = GameStats::new();
        let falling = Piece::new(PieceKind::O);
        let ghost = falling.with_position(Position::new(3, 17));
        let view = RenderView {
            board: &board,
            falling_piece: falling,
            ghost_piece: ghost,
            next_pieces: ArrayVec::new(),
            held_piece: None,
            hold_available: true,
            stats: &stats,
            state: SessionState::Playing,
        };

        assert_eq!(view.display_cell(4, 1), DisplayCell::Falling(PieceKind::O));
        assert_eq!(view.display_cell(4, 18), DisplayCell::Ghost(PieceKind::O));
        assert_eq!(view.display_cell(0, 19), DisplayCell::Locked(PieceKind::Z));
        assert_eq!(view.display_cell(9, 0), DisplayCell::Empty);
        assert!(view.display_cell(-1, 0).is_empty());
    }

    #[test]
    fn test_text_renderer_draws_field_and_status() {
        let config = SessionConfig {
            preview_count: 2,
            ..SessionConfig::default()
        };
        let session = GameSession::with_seed(config, PieceSeed::from(7_u128));
        let mut renderer = TextRenderer::new();
        renderer.render(&session.view()).unwrap();

        let lines: Vec<_> = renderer.frame().lines().collect();
        assert_eq!(lines.len(), BOARD_HEIGHT + 2);
        assert!(lines[..BOARD_HEIGHT].iter().all(|line| line.len() == BOARD_WIDTH));
        assert_eq!(lines[BOARD_HEIGHT], "score 0 level 1 lines 0");

        let kind = session.falling_piece().kind();
        let piece_cells = lines[..BOARD_HEIGHT]
            .iter()
            .flat_map(|line| line.chars())
            .filter(|&c| c == kind.as_char())
            .count();
        assert_eq!(piece_cells, 4);

        let next: String = session.next_pieces().take(2).map(PieceKind::as_char).collect();
        assert_eq!(lines[BOARD_HEIGHT + 1], format!("hold - next {next}"));
    }

    #[test]
    fn test_text_renderer_marks_ghost_and_state() {
        let mut session = GameSession::with_seed(SessionConfig::default(), PieceSeed::from(7_u128));
        session.toggle_pause();
        let mut renderer = TextRenderer::new();
        renderer.render(&session.view()).unwrap();

        let ghost_cells = renderer.frame().chars().filter(|&c| c == ':').count();
        assert_eq!(ghost_cells, 4);
        assert!(renderer.frame().contains("PAUSED"));
    }
}
