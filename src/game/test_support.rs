//! Helpers shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::GameError;
use crate::game::board::Board;
use crate::game::collision::CollisionTable;
use crate::game::level::Level;
use crate::game::npc::NextMove;
use crate::game::observer::LevelObserver;
use crate::game::types::{Direction, Position, UnitId};
use crate::game::unit::{Unit, UnitKind};

#[derive(Default)]
pub struct CountingObserver {
    won: AtomicUsize,
    lost: AtomicUsize,
}

impl CountingObserver {
    pub fn won(&self) -> usize {
        self.won.load(Ordering::SeqCst)
    }

    pub fn lost(&self) -> usize {
        self.lost.load(Ordering::SeqCst)
    }
}

impl LevelObserver for CountingObserver {
    fn level_won(&self) {
        self.won.fetch_add(1, Ordering::SeqCst);
    }

    fn level_lost(&self) {
        self.lost.fetch_add(1, Ordering::SeqCst);
    }
}

/// Always heads the same way and counts how often it was asked.
pub struct CountingBrain {
    pub direction: Option<Direction>,
    pub calls: Arc<AtomicUsize>,
}

impl CountingBrain {
    pub fn new(direction: Option<Direction>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { direction, calls: calls.clone() }, calls)
    }
}

impl NextMove for CountingBrain {
    fn next_move(&mut self, _unit: &Unit, _board: &Board) -> Result<Option<Direction>, GameError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.direction)
    }
}

/// Replays a fixed list of decisions, then stays put.
pub struct Scripted(pub VecDeque<Result<Option<Direction>, String>>);

impl NextMove for Scripted {
    fn next_move(&mut self, unit: &Unit, _board: &Board) -> Result<Option<Direction>, GameError> {
        match self.0.pop_front() {
            Some(Ok(direction)) => Ok(direction),
            Some(Err(reason)) => Err(GameError::Decision { unit: unit.id(), reason }),
            None => Ok(None),
        }
    }
}

pub fn ghost(interval_ms: u64) -> UnitKind {
    UnitKind::ghost(Duration::from_millis(interval_ms))
}

/// `[Player@0, Pellet@1, Wall@2]`.
pub fn pellet_row() -> (Level, UnitId, UnitId) {
    let mut board = Board::new(3, 1);
    let player = board.add_unit(UnitKind::player("p"));
    let pellet = board.spawn(UnitKind::pellet(10), Position::new(1, 0));
    board.spawn(UnitKind::Wall, Position::new(2, 0));
    let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], CollisionTable::standard());
    level.register_player(player);
    (level, player, pellet)
}

/// `[Player@0, Ghost@1]`, plus a pellet out of reach so the level is not won.
pub fn ghost_row() -> (Level, UnitId, UnitId) {
    let mut board = Board::new(3, 1);
    let player = board.add_unit(UnitKind::player("p"));
    let npc = board.spawn(ghost(200), Position::new(1, 0));
    board.spawn(UnitKind::pellet(10), Position::new(2, 0));
    let (brain, _) = CountingBrain::new(None);
    let mut level = Level::new(
        board,
        vec![(npc, Box::new(brain) as Box<dyn NextMove>)],
        vec![Position::new(0, 0)],
        CollisionTable::standard(),
    );
    level.register_player(player);
    (level, player, npc)
}
