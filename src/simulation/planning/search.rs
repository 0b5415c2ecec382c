//! Uninformed breadth-first searches over the known map.
//!
//! Uniform edge cost makes BFS optimal; these cover the cases A* cannot
//! (many goals, whole distance fields, routes through unexplored frontier).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::simulation::geometry::{Direction, Position};
use crate::simulation::memory::GridKnowledge;

/// Child → (parent, direction taken from the parent).
pub(crate) type ParentTable = HashMap<Position, (Position, Direction)>;

/// Walks the parent table back from `to` and returns the moves `from` → `to`.
pub(crate) fn reconstruct(parents: &ParentTable, from: Position, to: Position) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let Some(&(parent, direction)) = parents.get(&cursor) else {
            debug_assert!(false, "broken parent chain at {cursor}");
            return Vec::new();
        };
        path.push(direction);
        cursor = parent;
    }
    path.reverse();
    path
}

/// Cells a search may step onto: known floor, plus frontier cells when allowed.
fn enterable(grid: &GridKnowledge, pos: Position) -> bool {
    grid.is_known_free(pos) || grid.is_frontier(pos)
}

/// Finds the closest cell satisfying `predicate`, with the route to it.
///
/// Only known floor is expanded; frontier cells are reachable as end points.
/// Among equally distant matches the one whose first step comes earliest in
/// canonical direction order wins, then the smaller position.
pub fn nearest_matching<F>(
    grid: &GridKnowledge,
    from: Position,
    predicate: F,
) -> Option<(Position, Vec<Direction>)>
where
    F: Fn(Position) -> bool,
{
    if predicate(from) {
        return Some((from, Vec::new()));
    }

    let mut visited = HashSet::from([from]);
    let mut parents = ParentTable::new();
    let mut layer = vec![from];

    // Layers are built in parent order starting from N, E, S, W, so the first
    // time a cell is reached is always via the lowest-ranked first step.
    while !layer.is_empty() {
        let mut next_layer = Vec::new();
        for &cell in &layer {
            if cell != from && !grid.is_known_free(cell) {
                continue;
            }
            for (direction, next) in cell.neighbors() {
                if !enterable(grid, next) || !visited.insert(next) {
                    continue;
                }
                parents.insert(next, (cell, direction));
                next_layer.push(next);
            }
        }

        let best = next_layer
            .iter()
            .copied()
            .filter(|&pos| predicate(pos))
            .map(|pos| (reconstruct(&parents, from, pos), pos))
            .min_by_key(|(path, pos)| (path.first().map_or(0, |d| d.rank()), *pos));
        if let Some((path, target)) = best {
            return Some((target, path));
        }
        layer = next_layer;
    }
    None
}

/// BFS that may also pass through frontier cells.
///
/// Fallback for targets beyond confirmed terrain; frontier cells are known not
/// to be walls, only their dirt is unknown.
pub fn through_frontier(grid: &GridKnowledge, from: Position, to: Position) -> Option<Vec<Direction>> {
    let mut visited = HashSet::from([from]);
    let mut parents = ParentTable::new();
    let mut queue = VecDeque::from([from]);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            return Some(reconstruct(&parents, from, to));
        }
        for (direction, next) in cell.neighbors() {
            if !enterable(grid, next) || !visited.insert(next) {
                continue;
            }
            parents.insert(next, (cell, direction));
            queue.push_back(next);
        }
    }
    None
}

/// Shortest known-terrain distance from `root` to every reachable cell.
///
/// Frontier cells get a distance but are not expanded.
#[must_use]
pub fn distance_field(grid: &GridKnowledge, root: Position) -> HashMap<Position, u32> {
    let mut distances = HashMap::from([(root, 0)]);
    let mut queue = VecDeque::from([root]);

    while let Some(cell) = queue.pop_front() {
        if cell != root && !grid.is_known_free(cell) {
            continue;
        }
        let next_distance = distances[&cell] + 1;
        for (_, next) in cell.neighbors() {
            if !enterable(grid, next) || distances.contains_key(&next) {
                continue;
            }
            distances.insert(next, next_distance);
            queue.push_back(next);
        }
    }
    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open strip of `len` observed cells east of the origin.
    fn corridor(len: i32) -> GridKnowledge {
        let mut grid = GridKnowledge::new(Position::new(0, 0));
        for col in 0..len {
            let pos = Position::new(0, col);
            grid.report_wall(pos, Direction::North);
            grid.report_wall(pos, Direction::South);
            if col == 0 {
                grid.report_wall(pos, Direction::West);
            }
            grid.observe(pos, 0);
        }
        grid
    }

    #[test]
    fn test_nearest_matching_prefers_from() {
        let grid = corridor(3);
        let origin = Position::new(0, 0);
        assert_eq!(nearest_matching(&grid, origin, |p| p == origin), Some((origin, vec![])));
    }

    #[test]
    fn test_nearest_matching_finds_frontier_end() {
        let grid = corridor(3);
        let found = nearest_matching(&grid, Position::new(0, 0), |p| grid.is_frontier(p));
        let (target, path) = found.unwrap();
        assert_eq!(target, Position::new(0, 3));
        assert_eq!(path, vec![Direction::East; 3]);
    }

    #[test]
    fn test_nearest_matching_tie_breaks_on_direction() {
        // Open dock: all four neighbours are frontier at distance 1.
        let mut grid = GridKnowledge::new(Position::new(0, 0));
        grid.observe(Position::new(0, 0), 0);
        let (target, path) =
            nearest_matching(&grid, Position::new(0, 0), |p| grid.is_frontier(p)).unwrap();
        assert_eq!(target, Position::new(-1, 0));
        assert_eq!(path, vec![Direction::North]);
    }

    #[test]
    fn test_distance_field_counts_frontier_leaf() {
        let grid = corridor(4);
        let field = distance_field(&grid, Position::new(0, 0));
        assert_eq!(field[&Position::new(0, 3)], 3);
        assert_eq!(field[&Position::new(0, 4)], 4);
        assert!(!field.contains_key(&Position::new(0, 5)));
        assert!(!field.contains_key(&Position::new(1, 0)));
    }

    #[test]
    fn test_through_frontier_uses_frontier_hops() {
        let mut grid = GridKnowledge::new(Position::new(0, 0));
        grid.observe(Position::new(0, 0), 0);
        // (0, 1) is frontier; nothing beyond it is known.
        assert_eq!(
            through_frontier(&grid, Position::new(0, 0), Position::new(0, 1)),
            Some(vec![Direction::East])
        );
        assert_eq!(through_frontier(&grid, Position::new(0, 0), Position::new(0, 2)), None);
    }
}
