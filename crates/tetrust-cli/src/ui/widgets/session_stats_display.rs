use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetrust_engine::GameStats;

use crate::ui::widgets::style;

/// The most recent line clear, shown under the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClear {
    pub lines: usize,
    pub points: u64,
}

impl LineClear {
    fn label(self) -> &'static str {
        match self.lines {
            0 => "",
            1 => "SINGLE",
            2 => "DOUBLE",
            3 => "TRIPLE",
            _ => "TETRIS",
        }
    }
}

pub struct SessionStatsDisplay<'a> {
    stats: &'a GameStats,
    last_clear: Option<LineClear>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(stats: &'a GameStats) -> Self {
        Self {
            stats,
            last_clear: None,
            block: None,
        }
    }

    pub fn last_clear(self, last_clear: Option<LineClear>) -> Self {
        Self { last_clear, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len() + LAST_CLEAR_ROWS).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameStats) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameStats) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats| stats.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|stats| {
        let dur = stats.play_time();
        format!(
            "{:0}:{:0>2}.{:0>2}",
            dur.as_secs() / 60,
            dur.as_secs() % 60,
            dur.subsec_millis() / 10
        )
    }),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|stats| stats.level().to_string()),
    Row::LabelValue("LINES:", &|stats| stats.total_cleared_lines().to_string()),
    Row::LabelValue("PIECES:", &|stats| stats.completed_pieces().to_string()),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|stats| {
        stats.line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|stats| {
        stats.line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|stats| {
        stats.line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("TETRIS:", &|stats| {
        stats.line_cleared_counter()[4].to_string()
    }),
    Row::LabelValue("COMBO:", &|stats| {
        format!("{}/{}", stats.combo(), stats.max_combo())
    }),
];

// A blank separator and the last clear itself.
const LAST_CLEAR_ROWS: usize = 2;

fn render_label_value(label: &str, value: String, area: Rect, buf: &mut Buffer) {
    let style = style::DEFAULT;
    let [label_area, value_area] = area.layout(&Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
    ]));
    Line::styled(label, style)
        .left_aligned()
        .render(label_area, buf);
    Line::styled(value, style)
        .right_aligned()
        .render(value_area, buf);
}

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let total_rows = ROWS.len() + LAST_CLEAR_ROWS;
        let rows_areas =
            Layout::vertical((0..total_rows).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    render_label_value(label, value(self.stats), area, buf);
                }
            }
        }

        if let Some(clear) = self.last_clear
            && let Some(&area) = rows_areas.last()
        {
            render_label_value(clear.label(), format!("+{}", clear.points), area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tetrust_engine::{PieceKind, ScoringRules};

    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_renders_counters_and_last_clear() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(PieceKind::I, 4, &ScoringRules::default());
        stats.add_play_time(Duration::from_millis(61_250));

        let display = SessionStatsDisplay::new(&stats).last_clear(Some(LineClear {
            lines: 4,
            points: 800,
        }));
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        assert_eq!(row_text(&buf, 0).trim_end(), "SCORE:");
        assert_eq!(row_text(&buf, 1).trim_start(), "800");
        assert_eq!(row_text(&buf, 3).trim_start(), "1:01.25");
        assert!(row_text(&buf, 6).starts_with("LINES:"));
        assert!(row_text(&buf, 6).ends_with('4'));
        let last = row_text(&buf, area.height - 1);
        assert!(last.starts_with("TETRIS"));
        assert!(last.ends_with("+800"));
    }

    #[test]
    fn test_line_clear_labels() {
        let label = |lines| LineClear { lines, points: 0 }.label();
        assert_eq!(label(1), "SINGLE");
        assert_eq!(label(3), "TRIPLE");
        assert_eq!(label(4), "TETRIS");
    }
}
