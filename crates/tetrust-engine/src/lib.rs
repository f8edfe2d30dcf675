pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or its walls")]
pub struct PieceCollisionError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum HoldError {
    #[display("piece colliding when holding piece")]
    PieceCollision(PieceCollisionError),
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
    #[display("hold is disabled for this session")]
    Disabled,
}

/// Why a player action was rejected.
///
/// A rejected action never changes the session state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum ActionError {
    #[display("session is not playing")]
    #[from(ignore)]
    NotPlaying,
    #[display("{_0}")]
    Collision(PieceCollisionError),
    #[display("{_0}")]
    Hold(HoldError),
}
