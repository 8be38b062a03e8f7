use std::sync::Arc;

use actix::prelude::*;

use crate::error::GameError;
use crate::game::level::{LevelSnapshot, MoveOutcome};
use crate::game::observer::LevelObserver;
use crate::game::types::{Direction, UnitId};

/// Start or resume the level. Replies whether the level was started by this message.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Start;

/// Stop or pause the level. Replies whether the level was stopped by this message.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Stop;

/// Move a unit, typically the player on user input.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<MoveOutcome, GameError>")]
pub struct MoveUnit {
    pub unit: UnitId,
    pub direction: Direction,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterPlayer {
    pub unit: UnitId,
}

/// The session keeps a weak handle only; the sender owns the observer.
#[derive(Message)]
#[rtype(result = "()")]
pub struct AddObserver(pub Arc<dyn LevelObserver>);

#[derive(Message)]
#[rtype(result = "()")]
pub struct RemoveObserver(pub Arc<dyn LevelObserver>);

#[derive(Message)]
#[rtype(result = "LevelSnapshot")]
pub struct GetSnapshot;

#[derive(Message)]
#[rtype(result = "bool")]
pub struct IsInProgress;

/// Number of NPC timers currently armed.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct ActiveSchedules;

/// Whether every unit and its square agree on where the unit is.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct CheckConsistency;

/// ASCII dump of the board.
#[derive(Message)]
#[rtype(result = "String")]
pub struct RenderBoard;
