//! Game rules on top of the core primitives.
//!
//! - [`GameSession`] - one game: falling piece, hold, gravity, locking, game over
//! - [`GameStats`] - score, level, cleared lines and per-piece counters
//! - [`PieceBuffer`] - upcoming-piece queue (7-bag or uniform) and hold slot
//! - [`PieceSeed`] - seed for deterministic piece generation
//! - [`SessionConfig`] - scoring table, gravity curve and other tunables
//! - [`DropTimer`] - wall-clock pacing of automatic drops
//! - [`Renderer`] / [`RenderView`] - the drawing seam for frontends
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`]; the first piece spawns immediately
//! 2. Feed it [`Intent`]s and the current time through [`GameSession::tick`]
//! 3. A piece that can no longer fall is locked, full rows are cleared and
//!    scored, and the next piece spawns
//! 4. When a spawned piece collides, the session is over until it is reset
//!
//! # Example
//!
//! ```
//! use tetrust_engine::{GameSession, PieceSeed, Renderer, SessionConfig, TextRenderer};
//!
//! let mut session = GameSession::with_seed(SessionConfig::default(), PieceSeed::from(42_u128));
//! while !session.is_game_over() {
//!     session.hard_drop().unwrap();
//! }
//!
//! let mut renderer = TextRenderer::new();
//! renderer.render(&session.view()).unwrap();
//! assert!(renderer.frame().contains("GAME OVER"));
//! ```

pub use self::{
    config::*, drop_timer::*, game_session::*, game_stats::*, piece_buffer::*, render::*,
};

mod config;
mod drop_timer;
mod game_session;
mod game_stats;
mod piece_buffer;
mod render;
