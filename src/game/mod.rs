//! Synchronous domain model of a level.
//!
//! Nothing in here spawns tasks or takes locks: the level session actor owns the [`level::Level`]
//! and is the only one mutating it.

pub mod types;
pub mod unit;
pub mod board;
pub mod collision;
pub mod npc;
pub mod observer;
pub mod level;
pub mod demo;

#[cfg(test)]
pub(crate) mod test_support;
