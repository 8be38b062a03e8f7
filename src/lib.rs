//! Level engine for a grid-based arcade game.
//!
//! The crate serializes moves coming from a human-driven player and from autonomously scheduled
//! NPCs against a shared board, resolves collisions between co-located units, and notifies
//! observers when the level is won or lost.
//!
//! - [`game`] holds the synchronous domain model (board, units, collisions, level state machine).
//! - [`session`] holds the actix actors that run a level: the per-NPC timers and the reporter.
//! - [`config`] holds defaults and the injected [`config::GameConfig`].

pub mod config;
pub mod error;
pub mod game;
pub mod session;

pub use error::GameError;
