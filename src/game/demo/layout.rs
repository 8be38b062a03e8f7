//! Demo board, built in code.

use log::debug;

use crate::config::GameConfig;
use crate::config::game::{GRID_COL, GRID_ROW, PELLET_VALUE};
use crate::game::board::{AccessRules, Board};
use crate::game::collision::CollisionTable;
use crate::game::level::Level;
use crate::game::npc::{NextMove, RandomWalk};
use crate::game::types::{Position, UnitId};
use crate::game::unit::UnitKind;

/// Interior pillars of the demo board.
const PILLARS: [(usize, usize); 8] = [(2, 2), (3, 2), (7, 2), (8, 2), (2, 4), (3, 4), (7, 4), (8, 4)];

/// Build the demo level: a walled grid with pillars, two ghosts in the far corners and a pellet
/// on every other free square. Returns the level with its player already registered.
pub fn demo_level(config: &GameConfig) -> (Level, UnitId) {
    let rules = AccessRules { npcs_block_npcs: config.npcs_block_npcs };
    let mut board = Board::with_rules(GRID_COL, GRID_ROW, rules);

    let start = Position::new(1, 1);
    let ghost_squares = [Position::new(GRID_COL - 2, GRID_ROW - 2), Position::new(GRID_COL - 2, 1)];

    for y in 0..GRID_ROW {
        for x in 0..GRID_COL {
            let pos = Position::new(x, y);
            let border = x == 0 || y == 0 || x == GRID_COL - 1 || y == GRID_ROW - 1;
            if border || PILLARS.contains(&(x, y)) {
                board.spawn(UnitKind::Wall, pos);
            } else if pos != start && !ghost_squares.contains(&pos) {
                board.spawn(UnitKind::pellet(PELLET_VALUE), pos);
            }
        }
    }

    let npcs: Vec<(UnitId, Box<dyn NextMove>)> = ghost_squares
        .iter()
        .map(|pos| {
            let ghost = board.spawn(UnitKind::ghost(config.npc_interval()), *pos);
            (ghost, Box::new(RandomWalk::new()) as Box<dyn NextMove>)
        })
        .collect();

    let player = board.add_unit(UnitKind::player(config.player_name.clone()));
    let mut level = Level::new(board, npcs, vec![start], CollisionTable::standard());
    level.register_player(player);
    debug!("[Demo] Level ready with {} pellets", level.remaining_pellets());
    (level, player)
}
