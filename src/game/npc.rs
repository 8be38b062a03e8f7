//! Decision capability of NPCs.
//!
//! The engine only asks an NPC where it wants to go next. How it decides is up to the
//! implementation; [`RandomWalk`] is the simplest one.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;

use crate::error::GameError;
use crate::game::board::Board;
use crate::game::types::Direction;
use crate::game::unit::Unit;

/// Picks the next move of an NPC. Called once per scheduling tick and must not block.
///
/// `Ok(None)` means the NPC does not move this tick.
pub trait NextMove: Send {
    fn next_move(&mut self, unit: &Unit, board: &Board) -> Result<Option<Direction>, GameError>;
}

/// Moves to a random accessible neighbour, or stays put when boxed in.
pub struct RandomWalk {
    rng: StdRng,
}

impl RandomWalk {
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self::new()
    }
}

impl NextMove for RandomWalk {
    fn next_move(&mut self, unit: &Unit, board: &Board) -> Result<Option<Direction>, GameError> {
        let Some(pos) = unit.square() else {
            return Ok(None);
        };
        Ok(Direction::ALL
            .into_iter()
            .filter(|direction| board.is_accessible_to(board.neighbour(pos, *direction), unit.id()))
            .choose(&mut self.rng))
    }
}
