use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use tetrust_engine::{BOARD_HEIGHT, BOARD_WIDTH, DisplayCell, RenderView};

use crate::ui::widgets::BlockDisplay;

#[expect(clippy::cast_possible_truncation)]
const COLUMNS: u16 = BOARD_WIDTH as u16;
#[expect(clippy::cast_possible_truncation)]
const ROWS: u16 = BOARD_HEIGHT as u16;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    view: &'a RenderView<'a>,
    show_ghost: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(view: &'a RenderView<'a>) -> Self {
        Self {
            view,
            show_ghost: true,
            block: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        COLUMNS * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROWS * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (y, grid_row) in iter::zip(0.., grid_rows) {
            for (x, grid_cell) in iter::zip(0.., grid_row) {
                let cell = match self.view.display_cell(x, y) {
                    DisplayCell::Ghost(_) if !self.show_ghost => DisplayCell::Empty,
                    cell => cell,
                };
                BlockDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tetrust_engine::{GameSession, PieceSeed, SessionConfig};

    use super::*;

    fn count_symbol(buf: &Buffer, symbol: &str) -> usize {
        buf.content().iter().filter(|cell| cell.symbol() == symbol).count()
    }

    #[test]
    fn test_board_size_with_border() {
        let session = GameSession::with_seed(SessionConfig::default(), PieceSeed::from(1_u128));
        let view = session.view();
        let display = BoardDisplay::new(&view).block(BlockWidget::bordered());
        assert_eq!(display.width(), 22);
        assert_eq!(display.height(), 22);
    }

    #[test]
    fn test_board_size_follows_field_dimensions() {
        let session = GameSession::with_seed(SessionConfig::default(), PieceSeed::from(1_u128));
        let view = session.view();
        let display = BoardDisplay::new(&view);
        assert_eq!(
            usize::from(display.width()),
            BOARD_WIDTH * usize::from(BlockDisplay::width())
        );
        assert_eq!(
            usize::from(display.height()),
            BOARD_HEIGHT * usize::from(BlockDisplay::height())
        );
    }

    #[test]
    fn test_ghost_can_be_hidden() {
        let session = GameSession::with_seed(SessionConfig::default(), PieceSeed::from(1_u128));
        let view = session.view();
        let area = Rect::new(0, 0, 20, 20);

        let mut buf = Buffer::empty(area);
        BoardDisplay::new(&view).render(area, &mut buf);
        // Each ghost block is drawn as "[]" across two cells.
        assert_eq!(count_symbol(&buf, "["), 4);

        let mut buf = Buffer::empty(area);
        BoardDisplay::new(&view).show_ghost(false).render(area, &mut buf);
        assert_eq!(count_symbol(&buf, "["), 0);
    }
}
