//! Collision rules.
//!
//! A reaction is looked up by the ordered pair (mover class, subject class). `(A, B)` and
//! `(B, A)` are independent entries. Reactions only touch unit state and board membership; they
//! get the board, not the level, so they cannot start another move.

use std::collections::HashMap;

use log::debug;

use crate::error::GameError;
use crate::game::board::Board;
use crate::game::types::UnitId;
use crate::game::unit::UnitClass;

/// Reaction to `mover` arriving on a square already occupied by `subject`.
pub type Reaction = Box<dyn Fn(&mut Board, UnitId, UnitId) -> Result<(), GameError> + Send + Sync>;

#[derive(Default)]
pub struct CollisionTable {
    reactions: HashMap<(UnitClass, UnitClass), Reaction>,
}

impl CollisionTable {
    /// A table without any reaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Players die when they meet a ghost, whoever moves, and eat the pellets they walk onto.
    pub fn standard() -> Self {
        Self::new()
            .on(UnitClass::Player, UnitClass::Ghost, |board, player, ghost| {
                player_versus_ghost(board, player, ghost)
            })
            .on(UnitClass::Ghost, UnitClass::Player, |board, ghost, player| {
                player_versus_ghost(board, player, ghost)
            })
            .on(UnitClass::Player, UnitClass::Pellet, player_versus_pellet)
    }

    /// Register (or replace) the reaction for `mover` arriving on `subject`.
    pub fn on<F>(mut self, mover: UnitClass, subject: UnitClass, reaction: F) -> Self
    where
        F: Fn(&mut Board, UnitId, UnitId) -> Result<(), GameError> + Send + Sync + 'static,
    {
        self.reactions.insert((mover, subject), Box::new(reaction));
        self
    }

    pub fn has_reaction(&self, mover: UnitClass, subject: UnitClass) -> bool {
        self.reactions.contains_key(&(mover, subject))
    }

    /// Apply the reaction for this pair of units, if any.
    pub fn collide(&self, board: &mut Board, mover: UnitId, subject: UnitId) -> Result<(), GameError> {
        let key = (board.unit(mover).class(), board.unit(subject).class());
        match self.reactions.get(&key) {
            Some(reaction) => reaction(board, mover, subject),
            None => Ok(()),
        }
    }
}

/// The player dies.
pub fn player_versus_ghost(board: &mut Board, player: UnitId, ghost: UnitId) -> Result<(), GameError> {
    debug!("[Collision] {} caught {}", ghost, player);
    board.unit_mut(player).set_alive(false);
    Ok(())
}

/// The pellet leaves the board and its value is added to the player's score.
pub fn player_versus_pellet(board: &mut Board, player: UnitId, pellet: UnitId) -> Result<(), GameError> {
    let value = board.unit(pellet).pellet_value().ok_or_else(|| GameError::Collision {
        mover: player,
        subject: pellet,
        reason: "subject is not a pellet".to_string(),
    })?;
    board.leave_square(pellet);
    board.unit_mut(player).add_points(value);
    Ok(())
}
