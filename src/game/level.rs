//! A level: the board with the players and NPCs on it.
//!
//! `Level` is the synchronous half of the orchestrator. It owns the board, the NPC decision
//! capabilities, the registered players, the collision table and the observers, and it holds the
//! run state. Every move goes through [`Level::move_unit`], which takes `&mut self`: whoever owns
//! the level (the [`LevelSession`](crate::session::level_session::server::LevelSession) actor)
//! is the single serialization point, so no two moves ever interleave.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use serde::Serialize;

use crate::error::GameError;
use crate::game::board::Board;
use crate::game::collision::CollisionTable;
use crate::game::npc::NextMove;
use crate::game::observer::{LevelObserver, ObserverSet};
use crate::game::types::{Direction, Position, UnitId};
use crate::game::unit::{Unit, UnitClass};

/// Win/loss conditions as evaluated after a move. Both may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelStatus {
    pub won: bool,
    pub lost: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    /// The level is not in progress; nothing happened.
    Dropped,
    /// The destination was not accessible; only the facing direction changed.
    Blocked { status: LevelStatus },
    /// The unit moved and collided with `collisions` prior occupants.
    Moved { collisions: usize, status: LevelStatus },
}

impl MoveOutcome {
    /// Status evaluated after the move, `None` when the move was dropped.
    pub fn status(&self) -> Option<LevelStatus> {
        match self {
            MoveOutcome::Dropped => None,
            MoveOutcome::Blocked { status } | MoveOutcome::Moved { status, .. } => Some(*status),
        }
    }

    pub fn has_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Serializable view of a level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSnapshot {
    pub in_progress: bool,
    pub width: usize,
    pub height: usize,
    pub remaining_pellets: usize,
    pub any_player_alive: bool,
    /// Score of the first registered player, `-1` without players.
    pub score: i64,
    pub players: Vec<UnitId>,
    pub units: Vec<Unit>,
}

pub struct Level {
    board: Board,
    npcs: Vec<(UnitId, Box<dyn NextMove>)>,
    in_progress: bool,
    start_squares: Vec<Position>,
    start_square_index: usize,
    players: Vec<UnitId>,
    collisions: CollisionTable,
    observers: ObserverSet,
}

impl Level {
    /// Create a level. NPCs must already be placed on the board.
    pub fn new(
        board: Board,
        npcs: Vec<(UnitId, Box<dyn NextMove>)>,
        start_squares: Vec<Position>,
        collisions: CollisionTable,
    ) -> Self {
        for (npc, _) in &npcs {
            assert!(
                board.unit(*npc).interval().is_some(),
                "{} is not an NPC and cannot be scheduled",
                npc
            );
        }
        Self {
            board,
            npcs,
            in_progress: false,
            start_squares,
            start_square_index: 0,
            players: Vec::new(),
            collisions,
            observers: ObserverSet::default(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn add_observer(&mut self, observer: &Arc<dyn LevelObserver>) {
        self.observers.add(observer);
    }

    pub fn remove_observer(&mut self, observer: &Arc<dyn LevelObserver>) {
        self.observers.remove(observer);
    }

    /// Register a player and put it on the next start square. Start squares are handed out in
    /// turn. Registering a player again has no effect.
    pub fn register_player(&mut self, player: UnitId) {
        assert!(!self.start_squares.is_empty(), "this level has no start squares");
        assert_eq!(
            self.board.unit(player).class(),
            UnitClass::Player,
            "{} is not a player",
            player
        );

        if self.players.contains(&player) {
            return;
        }
        self.players.push(player);
        let square = self.start_squares[self.start_square_index];
        self.board.occupy(player, square);
        self.start_square_index = (self.start_square_index + 1) % self.start_squares.len();
        info!("[Level] Registered {} on {:?}", player, square);
    }

    pub fn players(&self) -> &[UnitId] {
        &self.players
    }

    pub fn npc_units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.npcs.iter().map(|(unit, _)| *unit)
    }

    pub fn npc_interval(&self, npc: UnitId) -> Duration {
        self.board
            .unit(npc)
            .interval()
            .unwrap_or_else(|| panic!("{} is not an NPC", npc))
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Allow movement. Returns the status evaluated on start, or `None` if the level was already
    /// in progress.
    pub fn start(&mut self) -> Option<LevelStatus> {
        if self.in_progress {
            return None;
        }
        self.in_progress = true;
        info!("[Level] Started");
        Some(self.update_observers())
    }

    /// Disallow movement. Returns whether the level was in progress.
    pub fn stop(&mut self) -> bool {
        if !self.in_progress {
            return false;
        }
        self.in_progress = false;
        info!("[Level] Stopped");
        true
    }

    /// Ask an NPC's decision capability for its next move.
    pub fn next_npc_move(&mut self, npc: UnitId) -> Result<Option<Direction>, GameError> {
        let board = &self.board;
        let (_, brain) = self
            .npcs
            .iter_mut()
            .find(|(unit, _)| *unit == npc)
            .unwrap_or_else(|| panic!("{} is not an NPC of this level", npc));
        brain.next_move(board.unit(npc), board)
    }

    /// Move a unit one square in `direction` and handle all collisions.
    ///
    /// Dropped while the level is not in progress. If the destination is not accessible only the
    /// facing direction changes. Otherwise the unit moves and the collision table is applied to
    /// each prior occupant of the destination, in arrival order. Observers are notified before
    /// this returns.
    ///
    /// # Panics
    ///
    /// If `unit` does not belong to the board, is not placed on it or is terrain.
    pub fn move_unit(&mut self, unit: UnitId, direction: Direction) -> Result<MoveOutcome, GameError> {
        let location = match self.board.unit(unit).square() {
            Some(location) => location,
            None => panic!("cannot move {}: it is not on the board", unit),
        };
        assert!(
            self.board.unit(unit).class().is_movable(),
            "{} cannot be moved",
            unit
        );

        if !self.in_progress {
            debug!("[Level] Dropped move of {} while not in progress", unit);
            return Ok(MoveOutcome::Dropped);
        }

        self.board.unit_mut(unit).set_direction(direction);
        let destination = self.board.neighbour(location, direction);

        if !self.board.is_accessible_to(destination, unit) {
            debug!("[Level] {} blocked moving {:?} from {:?}", unit, direction, location);
            let status = self.update_observers();
            return Ok(MoveOutcome::Blocked { status });
        }

        let occupants: Vec<UnitId> = self
            .board
            .occupants_at(destination)
            .iter()
            .copied()
            .filter(|occupant| *occupant != unit)
            .collect();
        self.board.occupy(unit, destination);
        for occupant in &occupants {
            self.collisions.collide(&mut self.board, unit, *occupant)?;
        }

        let status = self.update_observers();
        Ok(MoveOutcome::Moved { collisions: occupants.len(), status })
    }

    pub fn is_any_player_alive(&self) -> bool {
        self.players.iter().any(|player| self.board.unit(*player).is_alive())
    }

    /// Pellets still on the board.
    pub fn remaining_pellets(&self) -> usize {
        self.board.count_on_board(UnitClass::is_consumable)
    }

    /// Score of the first registered player, `-1` without players.
    pub fn first_player_score(&self) -> i64 {
        self.players
            .first()
            .and_then(|player| self.board.unit(*player).score())
            .map_or(-1, i64::from)
    }

    /// Occupancy invariant over every unit of the board.
    pub fn is_consistent(&self) -> bool {
        self.board.units().all(|unit| self.board.is_consistent(unit.id()))
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            in_progress: self.in_progress,
            width: self.board.width(),
            height: self.board.height(),
            remaining_pellets: self.remaining_pellets(),
            any_player_alive: self.is_any_player_alive(),
            score: self.first_player_score(),
            players: self.players.clone(),
            units: self.board.units().cloned().collect(),
        }
    }

    /// Evaluate both end conditions and notify every observer of each one that holds.
    fn update_observers(&mut self) -> LevelStatus {
        let status = LevelStatus {
            lost: !self.is_any_player_alive(),
            won: self.remaining_pellets() == 0,
        };
        if status.lost {
            info!("[Level] Level lost");
            self.observers.notify_lost();
        }
        if status.won {
            info!("[Level] Level won");
            self.observers.notify_won();
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::game::test_support::{CountingObserver, ghost, ghost_row, pellet_row};
    use crate::game::unit::UnitKind;

    fn observe(level: &mut Level) -> Arc<CountingObserver> {
        let counting = Arc::new(CountingObserver::default());
        let handle: Arc<dyn LevelObserver> = counting.clone();
        level.add_observer(&handle);
        // The level only keeps a weak handle; the test keeps the observer alive through `counting`.
        counting
    }

    #[test]
    fn test_eating_last_pellet_wins() {
        let (mut level, player, pellet) = pellet_row();
        let first = observe(&mut level);
        let second = observe(&mut level);
        level.start();
        assert_eq!(level.remaining_pellets(), 1);

        let outcome = level.move_unit(player, Direction::Right).expect("move");

        assert_eq!(
            outcome,
            MoveOutcome::Moved { collisions: 1, status: LevelStatus { won: true, lost: false } }
        );
        assert_eq!(level.board().unit(player).square(), Some(Position::new(1, 0)));
        assert!(!level.board().unit(pellet).has_square());
        assert_eq!(level.remaining_pellets(), 0);
        assert_eq!(level.board().unit(player).score(), Some(10));
        assert_eq!((first.won(), first.lost()), (1, 0));
        assert_eq!((second.won(), second.lost()), (1, 0));
    }

    #[test]
    fn test_walking_into_ghost_loses() {
        let (mut level, player, _) = ghost_row();
        let counting = observe(&mut level);
        level.start();
        assert!(level.is_any_player_alive());

        let outcome = level.move_unit(player, Direction::Right).expect("move");

        assert_eq!(outcome.status(), Some(LevelStatus { won: false, lost: true }));
        assert!(!level.is_any_player_alive());
        assert_eq!((counting.won(), counting.lost()), (0, 1));
    }

    #[test]
    fn test_move_is_dropped_when_not_in_progress() {
        let (mut level, player, _) = pellet_row();
        let counting = observe(&mut level);
        let before = serde_json::to_string(&level.snapshot()).expect("snapshot");

        let outcome = level.move_unit(player, Direction::Right).expect("move");

        assert_eq!(outcome, MoveOutcome::Dropped);
        assert_eq!(serde_json::to_string(&level.snapshot()).expect("snapshot"), before);
        assert_eq!(counting.won(), 0);

        level.start();
        level.stop();
        let before = serde_json::to_string(&level.snapshot()).expect("snapshot");
        assert_eq!(level.move_unit(player, Direction::Left).expect("move"), MoveOutcome::Dropped);
        assert_eq!(serde_json::to_string(&level.snapshot()).expect("snapshot"), before);
    }

    #[test]
    fn test_blocked_move_only_turns_the_unit() {
        let mut board = Board::new(3, 1);
        let player = board.add_unit(UnitKind::player("p"));
        board.spawn(UnitKind::pellet(10), Position::new(1, 0));
        board.spawn(UnitKind::Wall, Position::new(2, 0));
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let table = CollisionTable::standard().on(UnitClass::Player, UnitClass::Wall, move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], table);
        level.register_player(player);
        level.start();
        assert_eq!(level.board().unit(player).direction(), Direction::Right);

        // Moving left wraps onto the wall at the far end of the row.
        let outcome = level.move_unit(player, Direction::Left).expect("move");

        assert!(matches!(outcome, MoveOutcome::Blocked { .. }));
        assert_eq!(level.board().unit(player).direction(), Direction::Left);
        assert_eq!(level.board().unit(player).square(), Some(Position::new(0, 0)));
        assert_eq!(level.remaining_pellets(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(level.board().is_consistent(player));
    }

    #[test]
    fn test_unit_does_not_collide_with_itself() {
        let mut board = Board::new(2, 1);
        let player = board.add_unit(UnitKind::player("p"));
        board.spawn(UnitKind::pellet(10), Position::new(1, 0));
        let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], CollisionTable::standard());
        level.register_player(player);
        level.start();

        // On a single row, moving up wraps back onto the same square.
        let outcome = level.move_unit(player, Direction::Up).expect("move");

        assert!(matches!(outcome, MoveOutcome::Moved { collisions: 0, .. }));
        assert_eq!(level.board().occupants_at(Position::new(0, 0)), &[player]);
    }

    #[test]
    fn test_collisions_follow_arrival_order() {
        let mut board = Board::new(2, 1);
        let player = board.add_unit(UnitKind::player("p"));
        let target = Position::new(1, 0);
        let first = board.spawn(UnitKind::pellet(1), target);
        let second = board.spawn(UnitKind::pellet(2), target);
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = seen.clone();
        let table = CollisionTable::new().on(UnitClass::Player, UnitClass::Pellet, move |board, mover, subject| {
            log.lock().expect("lock").push(subject);
            crate::game::collision::player_versus_pellet(board, mover, subject)
        });
        let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], table);
        level.register_player(player);
        level.start();

        level.move_unit(player, Direction::Right).expect("move");

        assert_eq!(*seen.lock().expect("lock"), vec![first, second]);
        assert_eq!(level.board().unit(player).score(), Some(3));
        assert_eq!(level.board().occupants_at(target), &[player]);
    }

    #[test]
    fn test_held_condition_notifies_again() {
        let (mut level, player, _) = pellet_row();
        let counting = observe(&mut level);
        level.start();
        level.move_unit(player, Direction::Right).expect("move");
        level.move_unit(player, Direction::Left).expect("move");
        assert_eq!(counting.won(), 2);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let (mut level, _, _) = pellet_row();
        assert!(!level.stop());
        assert!(level.start().is_some());
        assert!(level.start().is_none());
        assert!(level.is_in_progress());
        assert!(level.stop());
        assert!(!level.stop());
        assert!(!level.is_in_progress());
    }

    #[test]
    fn test_start_evaluates_end_conditions() {
        let mut board = Board::new(2, 1);
        let player = board.add_unit(UnitKind::player("p"));
        let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], CollisionTable::standard());
        level.register_player(player);
        let counting = observe(&mut level);

        let status = level.start().expect("started");
        assert!(status.won);
        assert_eq!(counting.won(), 1);
    }

    #[test]
    fn test_players_rotate_over_start_squares() {
        let mut board = Board::new(3, 1);
        let a = board.add_unit(UnitKind::player("a"));
        let b = board.add_unit(UnitKind::player("b"));
        let c = board.add_unit(UnitKind::player("c"));
        let starts = vec![Position::new(0, 0), Position::new(2, 0)];
        let mut level = Level::new(board, Vec::new(), starts, CollisionTable::standard());

        level.register_player(a);
        level.register_player(a);
        level.register_player(b);
        level.register_player(c);

        assert_eq!(level.players(), &[a, b, c]);
        assert_eq!(level.board().unit(a).square(), Some(Position::new(0, 0)));
        assert_eq!(level.board().unit(b).square(), Some(Position::new(2, 0)));
        assert_eq!(level.board().unit(c).square(), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_every_unit_stays_consistent_while_moving() {
        let (mut level, player, npc) = ghost_row();
        level.start();
        for direction in [Direction::Left, Direction::Left, Direction::Right, Direction::Right] {
            level.move_unit(npc, direction).expect("move");
            level.move_unit(player, direction).expect("move");
            for unit in level.board().units() {
                assert!(level.board().is_consistent(unit.id()));
            }
        }
    }

    #[test]
    fn test_failing_collision_propagates() {
        let mut board = Board::new(2, 1);
        let player = board.add_unit(UnitKind::player("p"));
        board.spawn(UnitKind::pellet(1), Position::new(1, 0));
        let table = CollisionTable::new().on(UnitClass::Player, UnitClass::Pellet, |_, mover, subject| {
            Err(GameError::Collision { mover, subject, reason: "rejected".to_string() })
        });
        let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], table);
        level.register_player(player);
        level.start();

        assert!(matches!(level.move_unit(player, Direction::Right), Err(GameError::Collision { .. })));
    }

    #[test]
    fn test_first_player_score() {
        let board = Board::new(1, 1);
        let level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], CollisionTable::standard());
        assert_eq!(level.first_player_score(), -1);

        let (level, _, _) = pellet_row();
        assert_eq!(level.first_player_score(), 0);
    }

    #[test]
    #[should_panic(expected = "is not on the board")]
    fn test_moving_unplaced_unit_panics() {
        let (mut level, _, pellet) = pellet_row();
        level.start();
        level.board.leave_square(pellet);
        let _ = level.move_unit(pellet, Direction::Left);
    }

    #[test]
    #[should_panic(expected = "cannot be moved")]
    fn test_moving_terrain_panics() {
        let (mut level, _, _) = pellet_row();
        level.start();
        let wall = UnitId(2);
        assert_eq!(level.board().unit(wall).class(), UnitClass::Wall);
        let _ = level.move_unit(wall, Direction::Left);
    }

    #[test]
    fn test_only_consumables_count_towards_winning() {
        let mut board = Board::new(4, 1);
        let player = board.add_unit(UnitKind::player("p"));
        board.spawn(UnitKind::Wall, Position::new(3, 0));
        board.spawn(ghost(200), Position::new(2, 0));
        let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], CollisionTable::standard());
        level.register_player(player);

        assert_eq!(level.remaining_pellets(), 0);
        assert_eq!(level.start(), Some(LevelStatus { won: true, lost: false }));
    }

    #[test]
    fn test_win_and_loss_on_the_same_move() {
        let mut board = Board::new(2, 1);
        let player = board.add_unit(UnitKind::player("p"));
        board.spawn(ghost(200), Position::new(1, 0));
        let mut level = Level::new(board, Vec::new(), vec![Position::new(0, 0)], CollisionTable::standard());
        level.register_player(player);
        let counting = observe(&mut level);
        level.start();

        let outcome = level.move_unit(player, Direction::Right).expect("move");

        assert_eq!(outcome.status(), Some(LevelStatus { won: true, lost: true }));
        assert_eq!(counting.lost(), 1);
        assert_eq!(counting.won(), 2);
    }
}
