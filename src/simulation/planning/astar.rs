//! A* route planning over the agent's known map.
//!
//! Nodes are known floor cells; a frontier cell may be entered only when it is
//! the goal, since nothing is known beyond it. Edges cost 1 and the Manhattan
//! heuristic is consistent, so the first time the goal is popped its route is
//! optimal.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::simulation::geometry::{Direction, Position};
use crate::simulation::memory::GridKnowledge;
use crate::simulation::planning::search::{self, ParentTable};

/// Open-set entry. Field order is the tie-break order: lowest f, then the
/// canonical rank of the edge that reached the node, then position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f_score: u32,
    edge_rank: u8,
    pos: Position,
}

/// Shortest-path planner with search statistics for the viewer.
#[derive(Clone, Debug, Default)]
pub struct PathPlanner {
    /// Nodes expanded by the last search
    last_expansions: usize,
    /// Whether the last `shortest_path` had to fall back to BFS
    last_used_fallback: bool,
}

impl PathPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn last_expansions(&self) -> usize {
        self.last_expansions
    }

    #[must_use]
    pub const fn last_used_fallback(&self) -> bool {
        self.last_used_fallback
    }

    /// Plans the moves from `from` to `to`.
    ///
    /// Tries A* over confirmed terrain first, then BFS through frontier cells.
    /// An empty result means "unreachable now"; callers must handle
    /// `from == to` themselves.
    pub fn shortest_path(
        &mut self,
        grid: &GridKnowledge,
        from: Position,
        to: Position,
    ) -> Vec<Direction> {
        self.last_used_fallback = false;
        if from == to {
            self.last_expansions = 0;
            return Vec::new();
        }
        if let Some(path) = self.astar(grid, from, to) {
            return path;
        }

        tracing::trace!(%from, %to, "no confirmed route, searching through frontier");
        self.last_used_fallback = true;
        search::through_frontier(grid, from, to).unwrap_or_default()
    }

    /// Route to the nearest cell satisfying `predicate`, or empty if none.
    pub fn shortest_path_to_any<F>(
        &mut self,
        grid: &GridKnowledge,
        from: Position,
        predicate: F,
    ) -> Vec<Direction>
    where
        F: Fn(Position) -> bool,
    {
        self.last_used_fallback = false;
        search::nearest_matching(grid, from, predicate)
            .map(|(_, path)| path)
            .unwrap_or_default()
    }

    fn astar(&mut self, grid: &GridKnowledge, from: Position, to: Position) -> Option<Vec<Direction>> {
        let mut open = BinaryHeap::new();
        let mut g_scores = HashMap::from([(from, 0_u32)]);
        let mut parents = ParentTable::new();
        let mut closed = HashSet::new();
        self.last_expansions = 0;

        open.push(Reverse(OpenEntry {
            f_score: from.manhattan(to),
            edge_rank: 0,
            pos: from,
        }));

        while let Some(Reverse(entry)) = open.pop() {
            if !closed.insert(entry.pos) {
                continue;
            }
            self.last_expansions += 1;
            if entry.pos == to {
                return Some(search::reconstruct(&parents, from, to));
            }

            let g_current = g_scores[&entry.pos];
            for (direction, next) in entry.pos.neighbors() {
                if closed.contains(&next) {
                    continue;
                }
                let enterable = grid.is_known_free(next) || (next == to && grid.is_frontier(next));
                if !enterable {
                    continue;
                }
                let tentative = g_current + 1;
                if g_scores.get(&next).is_none_or(|&old| tentative < old) {
                    g_scores.insert(next, tentative);
                    parents.insert(next, (entry.pos, direction));
                    open.push(Reverse(OpenEntry {
                        f_score: tentative + next.manhattan(to),
                        edge_rank: direction.rank(),
                        pos: next,
                    }));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fully observed open room of `rows` × `cols` cells with the dock at the
    /// top-left corner and walls all around.
    fn open_room(rows: i32, cols: i32) -> GridKnowledge {
        let mut grid = GridKnowledge::new(Position::new(0, 0));
        for row in 0..rows {
            for col in 0..cols {
                let pos = Position::new(row, col);
                if row == 0 {
                    grid.report_wall(pos, Direction::North);
                }
                if row == rows - 1 {
                    grid.report_wall(pos, Direction::South);
                }
                if col == 0 {
                    grid.report_wall(pos, Direction::West);
                }
                if col == cols - 1 {
                    grid.report_wall(pos, Direction::East);
                }
                grid.observe(pos, 0);
            }
        }
        grid
    }

    #[test]
    fn test_same_cell_is_empty() {
        let grid = open_room(2, 2);
        let mut planner = PathPlanner::new();
        assert!(planner.shortest_path(&grid, Position::new(0, 0), Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_open_room_path_is_manhattan() {
        let grid = open_room(4, 5);
        let mut planner = PathPlanner::new();
        let from = Position::new(0, 0);
        let to = Position::new(3, 4);
        let path = planner.shortest_path(&grid, from, to);
        assert_eq!(path.len() as u32, from.manhattan(to));
        assert_eq!(from.follow(&path), to);
        assert!(!planner.last_used_fallback());
    }

    #[test]
    fn test_deterministic_tie_break() {
        let grid = open_room(3, 3);
        let mut planner = PathPlanner::new();
        let first = planner.shortest_path(&grid, Position::new(0, 0), Position::new(2, 2));
        let second = planner.shortest_path(&grid, Position::new(0, 0), Position::new(2, 2));
        assert_eq!(first, second);
    }

    #[test]
    fn test_detour_around_wall() {
        // Row 0: D . .     the middle of row 0 is a wall, forcing a detour
        //        . . .     through row 1.
        let mut grid = GridKnowledge::new(Position::new(0, 0));
        grid.report_wall(Position::new(0, 0), Direction::North);
        grid.report_wall(Position::new(0, 0), Direction::West);
        grid.report_wall(Position::new(0, 0), Direction::East);
        grid.observe(Position::new(0, 0), 0);
        grid.observe(Position::new(1, 0), 0);
        grid.observe(Position::new(1, 1), 0);
        grid.observe(Position::new(1, 2), 0);
        grid.observe(Position::new(0, 2), 0);

        let mut planner = PathPlanner::new();
        let from = Position::new(0, 0);
        let to = Position::new(0, 2);
        let path = planner.shortest_path(&grid, from, to);
        assert_eq!(path.len(), 4);
        assert_eq!(from.follow(&path), to);
        let mut cursor = from;
        for d in path {
            cursor = cursor.step(d);
            assert!(!grid.is_wall(cursor));
        }
    }

    #[test]
    fn test_frontier_only_as_destination() {
        let mut grid = GridKnowledge::new(Position::new(0, 0));
        grid.observe(Position::new(0, 0), 0);
        let mut planner = PathPlanner::new();

        let path = planner.shortest_path(&grid, Position::new(0, 0), Position::new(0, 1));
        assert_eq!(path, vec![Direction::East]);
        assert!(!planner.last_used_fallback());

        // Two cells out is beyond the frontier: nothing confirms a route.
        let path = planner.shortest_path(&grid, Position::new(0, 0), Position::new(0, 2));
        assert!(path.is_empty());
        assert!(planner.last_used_fallback());
    }

    #[test]
    fn test_to_any_returns_route_to_match() {
        let mut grid = open_room(3, 3);
        grid.observe(Position::new(2, 1), 3);
        let mut planner = PathPlanner::new();
        let from = Position::new(0, 0);
        let path = planner.shortest_path_to_any(&grid, from, |p| grid.dirt_at(p) > 0);
        assert_eq!(path.len(), 3);
        assert_eq!(from.follow(&path), Position::new(2, 1));
    }
}
