use std::time::{Duration, Instant};

use anyhow::Context as _;
use crossterm::event;
use ratatui::DefaultTerminal;
use tetrust_engine::{GameEvent, GameSession, Intent, Renderer as _};

use crate::{
    command::play::keymap,
    ui::{TerminalRenderer, widgets::LineClear},
};

#[derive(Debug)]
pub(crate) struct PlayApp {
    session: GameSession,
    show_ghost: bool,
    frame_interval: Duration,
    last_clear: Option<LineClear>,
}

impl PlayApp {
    pub(crate) fn new(session: GameSession, show_ghost: bool, frame_interval: Duration) -> Self {
        Self {
            session,
            show_ghost,
            frame_interval,
            last_clear: None,
        }
    }

    pub(crate) fn into_session(self) -> GameSession {
        self.session
    }

    /// Runs the input → tick → draw loop until the player quits.
    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        loop {
            let mut renderer = TerminalRenderer::new(terminal)
                .show_ghost(self.show_ghost)
                .seed(self.session.seed())
                .last_clear(self.last_clear)
                .bindings(keymap::bindings(self.session.state()));
            renderer
                .render(&self.session.view())
                .context("Failed to draw the game")?;

            let intent = self.next_intent()?;
            if self.session.tick(intent, Instant::now()).is_break() {
                return Ok(());
            }
            self.handle_events();
        }
    }

    /// Waits up to one frame for a key press.
    fn next_intent(&self) -> anyhow::Result<Option<Intent>> {
        if !event::poll(self.frame_interval).context("Failed to poll terminal events")? {
            return Ok(None);
        }
        let event = event::read().context("Failed to read terminal event")?;
        Ok(event
            .as_key_event()
            .and_then(|key| keymap::intent_from_key_event(&key)))
    }

    fn handle_events(&mut self) {
        for game_event in self.session.drain_events() {
            match game_event {
                GameEvent::LinesCleared { lines, points } => {
                    self.last_clear = Some(LineClear { lines, points });
                }
                GameEvent::Restarted(_) => self.last_clear = None,
                GameEvent::PieceSpawned(_)
                | GameEvent::PieceLocked(_)
                | GameEvent::LevelUp(_)
                | GameEvent::Held(_)
                | GameEvent::GameOver => {}
            }
        }
    }
}
