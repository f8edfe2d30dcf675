use std::{
    ops::ControlFlow,
    time::{Duration, Instant},
};

use arrayvec::ArrayVec;
use rand::Rng as _;

use crate::{
    ActionError, HoldError, PieceCollisionError,
    core::{Board, Piece, PieceKind, RotationDirection},
};

use super::{
    config::{MAX_PREVIEW, SessionConfig},
    drop_timer::DropTimer,
    game_stats::GameStats,
    piece_buffer::{PieceBuffer, PieceSeed},
    render::RenderView,
};

/// Lifecycle state of a [`GameSession`].
///
/// `Playing` and `Paused` toggle into each other. `GameOver` is entered when a
/// newly spawned piece collides and is left only by a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A discrete player command, produced by an input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    Pause,
    Restart,
    Quit,
}

/// Something that happened inside the session, in order of occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PieceSpawned(PieceKind),
    PieceLocked(Piece),
    LinesCleared { lines: usize, points: u64 },
    LevelUp(u32),
    Held(PieceKind),
    GameOver,
    Restarted(PieceSeed),
}

/// One game from first spawn to top-out.
///
/// The session owns the board, the falling piece, the piece queue with its
/// hold slot, and the statistics, and runs the
/// spawn → fall → lock → clear → spawn cycle.
///
/// Player actions (`try_*`, [`Self::hard_drop`]) are rejected with an error
/// and leave the session untouched when they would collide or when the
/// session is not [`SessionState::Playing`].
///
/// # Example
///
/// ```
/// use std::{ops::ControlFlow, time::Instant};
///
/// use tetrust_engine::{GameSession, Intent, SessionConfig};
///
/// let mut session = GameSession::new(SessionConfig::default());
/// let now = Instant::now();
///
/// assert!(session.try_move_left().is_ok());
/// assert_eq!(session.tick(Some(Intent::HardDrop), now), ControlFlow::Continue(()));
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert_eq!(session.tick(Some(Intent::Quit), now), ControlFlow::Break(()));
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    falling_piece: Piece,
    piece_buffer: PieceBuffer,
    seed: PieceSeed,
    hold_used: bool,
    state: SessionState,
    stats: GameStats,
    drop_timer: DropTimer,
    last_tick: Option<Instant>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Starts a session with a random seed.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    /// Starts a session whose piece sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(config: SessionConfig, seed: PieceSeed) -> Self {
        let mut piece_buffer = PieceBuffer::with_seed(config.randomizer, seed);
        let first = piece_buffer.pop_next();
        let mut this = Self {
            config,
            board: Board::EMPTY,
            falling_piece: Piece::new(first),
            piece_buffer,
            seed,
            hold_used: false,
            state: SessionState::Playing,
            stats: GameStats::new(),
            drop_timer: DropTimer::new(),
            last_tick: None,
            events: Vec::new(),
        };
        this.spawn(first);
        this
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// The seed the current game was started with.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    /// The falling piece moved to where a hard drop would land it.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        let landing = self.board.find_drop_position(&self.falling_piece);
        self.falling_piece.with_position(landing)
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.piece_buffer.held_piece()
    }

    /// Whether hold has already been used for the current piece.
    #[must_use]
    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    /// Whether [`Self::try_hold`] would currently succeed, ignoring pause.
    ///
    /// The first hold of a game is always allowed. A swap is allowed only if
    /// the held piece fits at the spawn pose.
    #[must_use]
    pub fn can_hold(&self) -> bool {
        if !self.config.hold_enabled || self.hold_used {
            return false;
        }
        self.piece_buffer.held_piece().is_none()
            || self
                .board
                .is_valid_position(&Piece::new(self.piece_buffer.peek_hold_result()))
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.next_pieces()
    }

    /// Current automatic drop interval, derived from the level.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.config.gravity.interval(self.stats.level())
    }

    /// Read-only snapshot for a [`Renderer`](super::Renderer).
    #[must_use]
    pub fn view(&self) -> RenderView<'_> {
        let preview = self.config.preview_count.min(MAX_PREVIEW);
        RenderView {
            board: &self.board,
            falling_piece: self.falling_piece,
            ghost_piece: self.ghost_piece(),
            next_pieces: self.next_pieces().take(preview).collect::<ArrayVec<_, MAX_PREVIEW>>(),
            held_piece: self.held_piece(),
            hold_available: self.can_hold(),
            stats: &self.stats,
            state: self.state,
        }
    }

    /// Takes the events recorded since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Runs one step of the game loop.
    ///
    /// Applies `intent` (if any), then performs at most one automatic drop if
    /// the drop interval has elapsed since the previous one. Rejected intents
    /// are ignored. Returns [`ControlFlow::Break`] when the intent is
    /// [`Intent::Quit`].
    pub fn tick(&mut self, intent: Option<Intent>, now: Instant) -> ControlFlow<()> {
        if let Some(Intent::Quit) = intent {
            return ControlFlow::Break(());
        }

        if let Some(last) = self.last_tick
            && self.state.is_playing()
        {
            self.stats.add_play_time(now.saturating_duration_since(last));
        }
        self.last_tick = Some(now);

        if let Some(intent) = intent {
            _ = self.apply(intent);
        }

        if self.state.is_playing() {
            if self.drop_timer.poll(now, self.drop_interval()) {
                self.gravity_step();
            }
        } else {
            self.drop_timer.hold(now);
        }

        ControlFlow::Continue(())
    }

    /// Applies a single intent. [`Intent::Quit`] is accepted and does nothing.
    pub fn apply(&mut self, intent: Intent) -> Result<(), ActionError> {
        match intent {
            Intent::MoveLeft => self.try_move_left()?,
            Intent::MoveRight => self.try_move_right()?,
            Intent::SoftDrop => self.try_soft_drop()?,
            Intent::HardDrop => {
                self.hard_drop()?;
            }
            Intent::RotateCw => self.try_rotate(RotationDirection::Clockwise)?,
            Intent::RotateCcw => self.try_rotate(RotationDirection::CounterClockwise)?,
            Intent::Hold => self.try_hold()?,
            Intent::Pause => self.toggle_pause(),
            Intent::Restart => self.reset(),
            Intent::Quit => {}
        }
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    pub fn try_move_left(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        self.set_falling_piece(self.falling_piece.left())?;
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        self.set_falling_piece(self.falling_piece.right())?;
        Ok(())
    }

    /// Moves the piece down one row and awards the soft drop bonus.
    ///
    /// A piece resting on the stack is not locked by a soft drop; gravity
    /// or a hard drop does that.
    pub fn try_soft_drop(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        self.set_falling_piece(self.falling_piece.down())?;
        self.stats
            .add_drop_bonus(self.config.scoring.soft_drop_per_cell);
        Ok(())
    }

    /// Drops the piece to its landing position and locks it.
    ///
    /// Returns the number of rows the piece fell.
    pub fn hard_drop(&mut self) -> Result<usize, ActionError> {
        self.ensure_playing()?;
        let landing = self.ghost_piece();
        let rows = usize::try_from(landing.position().y - self.falling_piece.position().y)
            .unwrap_or_default();
        self.falling_piece = landing;
        let cells = u64::try_from(rows).unwrap_or(u64::MAX);
        self.stats
            .add_drop_bonus(self.config.scoring.hard_drop_per_cell.saturating_mul(cells));
        self.lock_falling_piece();
        Ok(rows)
    }

    /// Rotates the falling piece, applying wall kicks when needed.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let rotated = self
            .falling_piece
            .kicked_rotation(direction, &self.board)
            .ok_or(PieceCollisionError)?;
        self.falling_piece = rotated;
        Ok(())
    }

    /// Puts the falling piece into the hold slot.
    ///
    /// The first hold of a game stores the piece and spawns the next one from
    /// the queue. Later holds swap with the held piece, which re-enters at
    /// the spawn pose; the hold is rejected if that pose collides. Only one
    /// hold is allowed per piece.
    pub fn try_hold(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        if !self.config.hold_enabled {
            return Err(HoldError::Disabled.into());
        }
        if self.hold_used {
            return Err(HoldError::HoldAlreadyUsed.into());
        }

        let current = self.falling_piece.kind();
        match self.piece_buffer.held_piece() {
            None => {
                let next = self.piece_buffer.hold(current);
                self.events.push(GameEvent::Held(current));
                self.spawn(next);
            }
            Some(held) => {
                let swapped = Piece::new(held);
                if !self.board.is_valid_position(&swapped) {
                    return Err(HoldError::PieceCollision(PieceCollisionError).into());
                }
                self.piece_buffer.hold(current);
                self.events.push(GameEvent::Held(current));
                self.falling_piece = swapped;
            }
        }
        self.hold_used = true;
        Ok(())
    }

    /// Applies one automatic drop: move down, or lock if the piece has landed.
    pub fn gravity_step(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        if self.set_falling_piece(self.falling_piece.down()).is_err() {
            self.lock_falling_piece();
        }
    }

    /// Starts a new game with a seed drawn from the current game's generator.
    pub fn reset(&mut self) {
        let seed = self.piece_buffer.derive_seed();
        self.reset_with_seed(seed);
    }

    pub fn reset_with_seed(&mut self, seed: PieceSeed) {
        self.board.clear();
        self.stats = GameStats::new();
        self.piece_buffer = PieceBuffer::with_seed(self.config.randomizer, seed);
        self.seed = seed;
        self.state = SessionState::Playing;
        self.last_tick = None;
        self.events.push(GameEvent::Restarted(seed));
        let first = self.piece_buffer.pop_next();
        self.spawn(first);
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.state.is_playing() {
            Ok(())
        } else {
            Err(ActionError::NotPlaying)
        }
    }

    fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.is_valid_position(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    fn lock_falling_piece(&mut self) {
        let piece = self.falling_piece;
        self.board.lock_piece(&piece);
        self.events.push(GameEvent::PieceLocked(piece));

        let cleared_lines = self.board.clear_completed_lines();
        let result = self
            .stats
            .complete_piece_drop(piece.kind(), cleared_lines, &self.config.scoring);
        if cleared_lines > 0 {
            self.events.push(GameEvent::LinesCleared {
                lines: cleared_lines,
                points: result.points,
            });
        }
        if let Some(level) = result.level_up {
            self.events.push(GameEvent::LevelUp(level));
        }

        let next = self.piece_buffer.pop_next();
        self.spawn(next);
    }

    fn spawn(&mut self, kind: PieceKind) {
        self.falling_piece = Piece::new(kind);
        self.hold_used = false;
        self.drop_timer.restart();
        if self.board.is_game_over(kind) {
            self.state = SessionState::GameOver;
            self.events.push(GameEvent::GameOver);
        } else {
            self.events.push(GameEvent::PieceSpawned(kind));
        }
    }
}
