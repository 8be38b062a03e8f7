use crate::game::board::Board;
use crate::game::unit::UnitClass;

/// Text dump of the board for debug logs: `#` wall, `P` player (`x` once dead), `G` ghost,
/// `.` pellet. The topmost symbol wins when units share a square.
pub fn render_ascii(board: &Board) -> String {
    let mut out = String::with_capacity((board.width() + 1) * board.height());
    for (i, square) in board.squares().enumerate() {
        let units: Vec<_> = square.occupants().iter().map(|id| board.unit(*id)).collect();
        let symbol = if let Some(player) = units.iter().find(|u| u.class() == UnitClass::Player) {
            if player.is_alive() { 'P' } else { 'x' }
        } else if units.iter().any(|u| u.class() == UnitClass::Ghost) {
            'G'
        } else if units.iter().any(|u| u.class() == UnitClass::Wall) {
            '#'
        } else if units.iter().any(|u| u.class() == UnitClass::Pellet) {
            '.'
        } else {
            ' '
        };
        out.push(symbol);
        if (i + 1) % board.width() == 0 {
            out.push('\n');
        }
    }
    out
}
