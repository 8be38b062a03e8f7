//! Units: everything that can occupy a square.
//!
//! Units are a tagged variant rather than a class hierarchy. The collision table and the
//! accessibility rules dispatch on [`UnitClass`].

use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::game::types::{Direction, Position, UnitId};

/// The concrete kind of a unit, used as the key of collision and accessibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    Player,
    Ghost,
    Pellet,
    Wall,
}

impl UnitClass {
    /// Units of this class are moved by the level.
    pub fn is_movable(self) -> bool {
        matches!(self, UnitClass::Player | UnitClass::Ghost)
    }

    /// Units of this class deny entry to their square regardless of who asks.
    pub fn blocks_everyone(self) -> bool {
        self == UnitClass::Wall
    }

    /// Units of this class count towards winning the level.
    pub fn is_consumable(self) -> bool {
        self == UnitClass::Pellet
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitKind {
    Player { name: String, alive: bool, score: u32 },
    /// A hostile NPC, moved every `interval_ms` by its decision capability.
    Ghost { interval_ms: u64 },
    Pellet { value: u32 },
    Wall,
}

impl UnitKind {
    pub fn player(name: impl Into<String>) -> Self {
        UnitKind::Player { name: name.into(), alive: true, score: 0 }
    }

    /// # Panics
    ///
    /// If `interval` is shorter than one millisecond.
    pub fn ghost(interval: Duration) -> Self {
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        assert!(interval_ms > 0, "an NPC needs an interval of at least 1ms, got {:?}", interval);
        UnitKind::Ghost { interval_ms }
    }

    pub fn pellet(value: u32) -> Self {
        UnitKind::Pellet { value }
    }

    pub fn class(&self) -> UnitClass {
        match self {
            UnitKind::Player { .. } => UnitClass::Player,
            UnitKind::Ghost { .. } => UnitClass::Ghost,
            UnitKind::Pellet { .. } => UnitClass::Pellet,
            UnitKind::Wall => UnitClass::Wall,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
    direction: Direction,
    square: Option<Position>,
}

impl Unit {
    pub(crate) fn new(id: UnitId, kind: UnitKind) -> Self {
        Self { id, kind, direction: Direction::default(), square: None }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn class(&self) -> UnitClass {
        self.kind.class()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// The square this unit occupies, `None` while it is not on the board.
    pub fn square(&self) -> Option<Position> {
        self.square
    }

    pub fn has_square(&self) -> bool {
        self.square.is_some()
    }

    /// Only the board moves units, so that both sides of the occupancy stay in sync.
    pub(crate) fn set_square(&mut self, square: Option<Position>) {
        self.square = square;
    }

    /// Whether this unit is a living player.
    pub fn is_alive(&self) -> bool {
        matches!(self.kind, UnitKind::Player { alive: true, .. })
    }

    pub fn set_alive(&mut self, is_alive: bool) {
        if let UnitKind::Player { alive, .. } = &mut self.kind {
            *alive = is_alive;
        }
    }

    pub fn score(&self) -> Option<u32> {
        match self.kind {
            UnitKind::Player { score, .. } => Some(score),
            _ => None,
        }
    }

    pub fn add_points(&mut self, points: u32) {
        if let UnitKind::Player { score, .. } = &mut self.kind {
            *score = score.saturating_add(points);
        }
    }

    /// Movement interval of an NPC.
    pub fn interval(&self) -> Option<Duration> {
        match self.kind {
            UnitKind::Ghost { interval_ms } => Some(Duration::from_millis(interval_ms)),
            _ => None,
        }
    }

    pub fn pellet_value(&self) -> Option<u32> {
        match self.kind {
            UnitKind::Pellet { value } => Some(value),
            _ => None,
        }
    }
}
