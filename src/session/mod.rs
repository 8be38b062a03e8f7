//! Session layer root module.
//!
//! This module organizes the actors that run a level:
//! - `level_session`: owns a level, serializes every move through its mailbox and drives one timer
//!   per NPC
//! - `reporter`: receives fire-and-forget game events

pub mod level_session;
pub mod reporter;
