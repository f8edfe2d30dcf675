use std::io;

use ratatui::{
    DefaultTerminal,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use tetrust_engine::{PieceSeed, RenderView, Renderer};

use crate::ui::widgets::{KeyBinding, KeyBindingDisplay, LineClear, SessionDisplay};

/// Draws a session into the terminal with ratatui.
pub struct TerminalRenderer<'t> {
    terminal: &'t mut DefaultTerminal,
    show_ghost: bool,
    seed: Option<PieceSeed>,
    last_clear: Option<LineClear>,
    bindings: &'static [KeyBinding<'static>],
}

impl<'t> TerminalRenderer<'t> {
    pub fn new(terminal: &'t mut DefaultTerminal) -> Self {
        Self {
            terminal,
            show_ghost: true,
            seed: None,
            last_clear: None,
            bindings: &[],
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn seed(self, seed: PieceSeed) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn last_clear(self, last_clear: Option<LineClear>) -> Self {
        Self { last_clear, ..self }
    }

    pub fn bindings(self, bindings: &'static [KeyBinding<'static>]) -> Self {
        Self { bindings, ..self }
    }
}

impl Renderer for TerminalRenderer<'_> {
    type Error = io::Error;

    fn render(&mut self, view: &RenderView<'_>) -> Result<(), Self::Error> {
        let session_display = SessionDisplay::new(view)
            .show_ghost(self.show_ghost)
            .last_clear(self.last_clear);
        let help = KeyBindingDisplay::new(self.bindings);
        let seed = self.seed.map(|seed| {
            Text::from(format!("seed {seed}"))
                .style(Style::default().fg(Color::DarkGray))
                .centered()
        });

        self.terminal.draw(|frame| {
            let [main_area, help_area, seed_area] = Layout::vertical([
                Constraint::Length(session_display.height()),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(frame.area());
            frame.render_widget(&session_display, main_area);
            frame.render_widget(help, help_area);
            if let Some(seed) = seed {
                frame.render_widget(seed, seed_area);
            }
        })?;
        Ok(())
    }
}
