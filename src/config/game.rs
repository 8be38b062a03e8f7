/// Game configuration constants.
///
/// This module defines the default gameplay parameters such as NPC pacing,
/// pellet value, and the size and duration of the demo level.
pub const DEFAULT_PLAYER_NAME: &str = "default";

/// Interval (in milliseconds) between two moves of the same NPC.
pub const NPC_INTERVAL_MS: u64 = 250;

/// Points awarded to a player for each pellet eaten.
pub const PELLET_VALUE: u32 = 10;

/// Interval (in milliseconds) between two simulated key presses in the demo.
pub const PLAYER_INPUT_INTERVAL_MS: u64 = 180;

/// How long (in seconds) the demo runs before it is stopped.
pub const DEMO_DURATION_SECS: u64 = 30;

/// Number of rows in the demo grid.
pub const GRID_ROW: usize = 7;

/// Number of columns in the demo grid.
pub const GRID_COL: usize = 11;
