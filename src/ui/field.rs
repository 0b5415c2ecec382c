use crate::simulation::environment::Tile;
use crate::simulation::geometry::Position;
use crate::simulation::memory::{CellStatus, GridKnowledge};
use crate::simulation::vacuum::Simulator;
use rayon::prelude::*;

const WALL: char = '#';
const DOCK: char = 'D';
const FLOOR: char = ' ';
const UNSEEN: char = '.';
const VACUUM: char = '@';

/// Renders the house as the agent sees it: ground truth for every cell the
/// agent has classified, `.` for the rest, `@` for the vacuum.
#[must_use]
pub fn compute_field_grid(sim: &Simulator, knowledge: &GridKnowledge) -> Vec<String> {
    let house = sim.house();
    let (rows, cols) = house.dimensions();
    let dock = house.dock();
    let vacuum = sim.position();

    // Use rayon to compute rows in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            let mut line = String::with_capacity(cols);
            for c in 0..cols {
                let pos = Position::new(r as i32, c as i32);
                if pos == vacuum {
                    line.push(VACUUM);
                    continue;
                }
                if knowledge.status(pos.relative_to(dock)) == CellStatus::Unknown {
                    line.push(UNSEEN);
                    continue;
                }
                line.push(match house.tile(pos) {
                    Tile::Wall => WALL,
                    Tile::Dock => DOCK,
                    Tile::Floor(0) => FLOOR,
                    Tile::Floor(dirt) => char::from(b'0' + dirt),
                });
            }
            line
        })
        .collect()
}
