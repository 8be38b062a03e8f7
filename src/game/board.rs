//! Board and square occupancy.
//!
//! The board owns its squares and every unit. A unit only records the position of the square it
//! occupies; each square keeps its occupants in arrival order. [`Board::occupy`] and
//! [`Board::leave_square`] update both sides together, so they always agree between calls.
//!
//! There is no locking here: the level is the only writer and serializes all moves.

use serde::{Serialize, Deserialize};

use crate::game::types::{Direction, Position, UnitId};
use crate::game::unit::{Unit, UnitClass, UnitKind};

/// Per-class accessibility rules that are not implied by the unit class alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRules {
    pub npcs_block_npcs: bool,
}

impl Default for AccessRules {
    fn default() -> Self {
        Self { npcs_block_npcs: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Square {
    position: Position,
    occupants: Vec<UnitId>,
}

impl Square {
    fn new(position: Position) -> Self {
        Self { position, occupants: Vec::new() }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Occupants in the order they arrived.
    pub fn occupants(&self) -> &[UnitId] {
        &self.occupants
    }

    fn put(&mut self, unit: UnitId) {
        self.occupants.push(unit);
    }

    fn remove(&mut self, unit: UnitId) {
        self.occupants.retain(|occupant| *occupant != unit);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    squares: Vec<Square>,
    units: Vec<Unit>,
    rules: AccessRules,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_rules(width, height, AccessRules::default())
    }

    pub fn with_rules(width: usize, height: usize, rules: AccessRules) -> Self {
        assert!(width > 0 && height > 0, "a board needs at least one square");
        let squares = (0..height)
            .flat_map(|y| (0..width).map(move |x| Square::new(Position { x, y })))
            .collect();
        Self { width, height, squares, units: Vec::new(), rules }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn square_at(&self, pos: Position) -> &Square {
        assert!(self.contains(pos), "position {:?} is outside the board", pos);
        &self.squares[pos.y * self.width + pos.x]
    }

    fn square_at_mut(&mut self, pos: Position) -> &mut Square {
        assert!(self.contains(pos), "position {:?} is outside the board", pos);
        &mut self.squares[pos.y * self.width + pos.x]
    }

    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    pub fn occupants_at(&self, pos: Position) -> &[UnitId] {
        self.square_at(pos).occupants()
    }

    /// The square one step away in `direction`. Edges wrap around to the opposite side.
    pub fn neighbour(&self, pos: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        let x = (pos.x as i64 + dx as i64).rem_euclid(self.width as i64) as usize;
        let y = (pos.y as i64 + dy as i64).rem_euclid(self.height as i64) as usize;
        Position { x, y }
    }

    /// Create a unit that is not placed on any square yet.
    pub fn add_unit(&mut self, kind: UnitKind) -> UnitId {
        let id = UnitId(self.units.len());
        self.units.push(Unit::new(id, kind));
        id
    }

    /// Create a unit and place it on `pos`.
    pub fn spawn(&mut self, kind: UnitKind, pos: Position) -> UnitId {
        let id = self.add_unit(kind);
        self.occupy(id, pos);
        id
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        self.units
            .get(id.0)
            .unwrap_or_else(|| panic!("{} does not belong to this board", id))
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        self.units
            .get_mut(id.0)
            .unwrap_or_else(|| panic!("{} does not belong to this board", id))
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Move a unit onto `target`, leaving its current square first.
    pub fn occupy(&mut self, id: UnitId, target: Position) {
        self.leave_square(id);
        self.square_at_mut(target).put(id);
        self.unit_mut(id).set_square(Some(target));
        debug_assert!(self.is_consistent(id));
    }

    /// Take a unit off the board. No-op for a unit that is not placed.
    pub fn leave_square(&mut self, id: UnitId) {
        if let Some(current) = self.unit(id).square() {
            self.square_at_mut(current).remove(id);
            self.unit_mut(id).set_square(None);
        }
        debug_assert!(self.is_consistent(id));
    }

    /// Whether `unit` may enter the square at `pos` given its current occupants.
    pub fn is_accessible_to(&self, pos: Position, unit: UnitId) -> bool {
        let visitor = self.unit(unit).class();
        self.occupants_at(pos)
            .iter()
            .filter(|occupant| **occupant != unit)
            .all(|occupant| !self.blocks(self.unit(*occupant).class(), visitor))
    }

    fn blocks(&self, occupant: UnitClass, visitor: UnitClass) -> bool {
        if occupant.blocks_everyone() {
            return true;
        }
        occupant == UnitClass::Ghost && visitor == UnitClass::Ghost && self.rules.npcs_block_npcs
    }

    /// Number of placed units whose class matches `predicate`, counted from the squares'
    /// occupant lists.
    pub fn count_on_board(&self, predicate: impl Fn(UnitClass) -> bool) -> usize {
        self.squares
            .iter()
            .flat_map(|square| square.occupants())
            .filter(|occupant| predicate(self.unit(**occupant).class()))
            .count()
    }

    /// The unit's square lists it, and no other square does.
    pub fn is_consistent(&self, id: UnitId) -> bool {
        let listed_on: Vec<Position> = self
            .squares
            .iter()
            .filter(|square| square.occupants.contains(&id))
            .map(|square| square.position)
            .collect();
        match self.unit(id).square() {
            Some(pos) => listed_on == [pos],
            None => listed_on.is_empty(),
        }
    }
}
