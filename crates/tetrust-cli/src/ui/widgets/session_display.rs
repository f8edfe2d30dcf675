use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use tetrust_engine::{RenderView, SessionState};

use crate::ui::widgets::{
    BoardDisplay, LineClear, PieceDisplay, PieceStackDisplay, SessionStatsDisplay, color, style,
};

/// The whole game screen: hold and stats on the left, the board in the
/// middle, the next queue on the right.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    view: &'a RenderView<'a>,
    show_ghost: bool,
    last_clear: Option<LineClear>,
    horizontal_padding: u16,
    vertical_padding: u16,
}

// Vertical gap between the hold panel and the stats panel.
const PANEL_SPACING: u16 = 1;

impl<'a> SessionDisplay<'a> {
    pub fn new(view: &'a RenderView<'a>) -> Self {
        Self {
            view,
            show_ghost: true,
            last_clear: None,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn last_clear(self, last_clear: Option<LineClear>) -> Self {
        Self { last_clear, ..self }
    }

    fn border_color(&self) -> Color {
        match self.view.state {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn panel(&self, title: &'static str) -> Block<'static> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(
                self.horizontal_padding,
                self.vertical_padding,
            ))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.view)
            .show_ghost(self.show_ghost)
            .block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            )
    }

    fn hold_panel(&self) -> PieceDisplay<'static> {
        let panel = PieceDisplay::new()
            .dimmed(!self.view.hold_available)
            .block(self.panel("HOLD"));
        match self.view.held_piece {
            Some(piece) => panel.piece(piece),
            None => panel,
        }
    }

    fn piece_stack(&self) -> PieceStackDisplay<'static> {
        PieceStackDisplay::new(self.view.next_pieces.iter().copied()).block(self.panel("NEXT"))
    }

    fn session_stats(&self) -> SessionStatsDisplay<'a> {
        SessionStatsDisplay::new(self.view.stats)
            .last_clear(self.last_clear)
            .block(self.panel("STATS"))
    }

    /// Rows needed to draw everything.
    pub fn height(&self) -> u16 {
        let left = self.hold_panel().height() + PANEL_SPACING + self.session_stats().height();
        left.max(self.board().height())
            .max(self.piece_stack().height())
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board();
        let hold_panel = self.hold_panel();
        let piece_stack = self.piece_stack();
        let session_stats = self.session_stats();

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), session_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(PANEL_SPACING)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(session_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let [piece_stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        if !self.view.next_pieces.is_empty() {
            piece_stack.render(piece_stack_area, buf);
        }

        let popup = match self.view.state {
            SessionState::Playing => None,
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
