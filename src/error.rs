use thiserror::Error;

use crate::game::types::UnitId;

/// Errors surfaced by the level engine.
///
/// Contract violations (moving a unit that is not on the board, registering a player on a level
/// without start squares) are programmer errors and panic instead.
#[derive(Debug, Error)]
pub enum GameError {
    /// A decision capability failed to produce the next move of an NPC.
    #[error("decision for {unit} failed: {reason}")]
    Decision { unit: UnitId, reason: String },

    /// A collision reaction failed while resolving a move.
    #[error("collision between {mover} and {subject} failed: {reason}")]
    Collision {
        mover: UnitId,
        subject: UnitId,
        reason: String,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The level session actor could not be reached.
    #[error("mailbox error: {0}")]
    Mailbox(#[from] actix::MailboxError),
}
