//! Incrementally built map of the house, as the vacuum has sensed it.
//!
//! Cells move one way only: unknown → frontier → free/dock, or unknown → wall.
//! The remembered dirt total is kept in step with every write so "is anything
//! left to clean" never needs a scan.

use std::collections::{BTreeSet, HashMap};

use crate::simulation::geometry::{Direction, Position};
use crate::simulation::params::MAX_DIRT;
use crate::simulation::planning;

/// What the controller believes about a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStatus {
    Unknown,
    Wall,
    /// Passable floor with its last sensed dirt level.
    Free(u8),
    /// The charging dock; passable and never dirty.
    Dock,
}

impl CellStatus {
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Free(_) | Self::Dock)
    }

    #[must_use]
    pub const fn dirt(self) -> u8 {
        match self {
            Self::Free(dirt) => dirt,
            _ => 0,
        }
    }
}

/// The controller's private map.
///
/// Absent cells are unknown. The frontier holds every unclassified cell next
/// to a free cell that is not known to be a wall.
#[derive(Clone, Debug)]
pub struct GridKnowledge {
    cells: HashMap<Position, CellStatus>,
    frontier: BTreeSet<Position>,
    dock: Position,
    total_dirt: u32,
    revision: u64,
}

impl GridKnowledge {
    /// Creates a map that only knows the dock.
    #[must_use]
    pub fn new(dock: Position) -> Self {
        let mut cells = HashMap::new();
        cells.insert(dock, CellStatus::Dock);
        Self {
            cells,
            frontier: BTreeSet::new(),
            dock,
            total_dirt: 0,
            revision: 0,
        }
    }

    #[must_use]
    pub const fn dock(&self) -> Position {
        self.dock
    }

    /// Records the dirt sensed at `pos` while standing on it.
    ///
    /// An unknown or frontier cell becomes free; a known free cell has its dirt
    /// overwritten. Unclassified neighbours join the frontier. Walls must be
    /// reported before the observation so they never enter it.
    pub fn observe(&mut self, pos: Position, dirt_level: u8) {
        let dirt_level = dirt_level.min(MAX_DIRT);
        match self.status(pos) {
            CellStatus::Wall => {
                debug_assert!(false, "observed a cell already classified as wall: {pos}");
                tracing::warn!(%pos, "ignoring observation of a known wall");
                return;
            }
            CellStatus::Unknown => {
                self.cells.insert(pos, CellStatus::Free(dirt_level));
                self.frontier.remove(&pos);
                self.total_dirt += u32::from(dirt_level);
                self.revision += 1;
            }
            CellStatus::Free(previous) => {
                if previous != dirt_level {
                    self.cells.insert(pos, CellStatus::Free(dirt_level));
                    self.total_dirt = self.total_dirt - u32::from(previous) + u32::from(dirt_level);
                }
            }
            CellStatus::Dock => {}
        }

        for (_, neighbor) in pos.neighbors() {
            if !self.cells.contains_key(&neighbor) && self.frontier.insert(neighbor) {
                self.revision += 1;
            }
        }
    }

    /// Classifies the neighbour of `pos` in `direction` as a wall.
    ///
    /// No-op if that cell is already classified.
    pub fn report_wall(&mut self, pos: Position, direction: Direction) {
        let target = pos.step(direction);
        if self.cells.contains_key(&target) {
            return;
        }
        self.cells.insert(target, CellStatus::Wall);
        self.frontier.remove(&target);
        self.revision += 1;
    }

    /// Removes one unit of dirt from a free cell.
    pub fn clean(&mut self, pos: Position) {
        match self.status(pos) {
            CellStatus::Free(dirt) if dirt > 0 => {
                self.cells.insert(pos, CellStatus::Free(dirt - 1));
                self.total_dirt -= 1;
            }
            status => {
                debug_assert!(false, "clean() on {pos} with status {status:?}");
                tracing::warn!(%pos, ?status, "clean requested on a cell with nothing to clean");
            }
        }
    }

    #[must_use]
    pub fn status(&self, pos: Position) -> CellStatus {
        self.cells.get(&pos).copied().unwrap_or(CellStatus::Unknown)
    }

    /// Dirt remembered at an observed cell.
    ///
    /// Querying a cell that was never observed is a controller bug.
    #[must_use]
    pub fn dirt_at(&self, pos: Position) -> u8 {
        let status = self.status(pos);
        debug_assert!(status.is_passable(), "dirt queried at unobserved cell {pos}");
        status.dirt()
    }

    #[must_use]
    pub fn is_frontier(&self, pos: Position) -> bool {
        self.frontier.contains(&pos)
    }

    /// True for free cells and the dock.
    #[must_use]
    pub fn is_known_free(&self, pos: Position) -> bool {
        self.status(pos).is_passable()
    }

    #[must_use]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.status(pos) == CellStatus::Wall
    }

    /// True if `pos` is worth travelling to: unexplored or still dirty.
    #[must_use]
    pub fn is_frontier_or_dirty(&self, pos: Position) -> bool {
        self.is_frontier(pos) || self.status(pos).dirt() > 0
    }

    #[must_use]
    pub const fn has_remaining_dirt(&self) -> bool {
        self.total_dirt > 0
    }

    #[must_use]
    pub const fn total_dirt(&self) -> u32 {
        self.total_dirt
    }

    /// True once no reachable cell is left unclassified.
    #[must_use]
    pub fn all_known_cells_consistent_with_full_exploration(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Nearest frontier or dirty cell by true path length through known terrain.
    ///
    /// Ties go to the canonical direction of the first step, then to the
    /// smaller position.
    #[must_use]
    pub fn nearest_frontier_or_dirty(&self, from: Position) -> Option<Position> {
        planning::nearest_matching(self, from, |pos| self.is_frontier_or_dirty(pos))
            .map(|(target, _)| target)
    }

    /// Bumped whenever a cell is classified; route caches key on it.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Every classified cell, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, CellStatus)> + '_ {
        self.cells.iter().map(|(&pos, &status)| (pos, status))
    }

    #[must_use]
    pub fn known_cells(&self) -> usize {
        self.cells.len()
    }

    /// Recomputes the dirt total by scanning; only for consistency checks.
    #[must_use]
    pub fn scanned_dirt(&self) -> u32 {
        self.cells.values().map(|s| u32::from(s.dirt())).sum()
    }
}
