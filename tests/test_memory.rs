//! Tests for the agent's grid knowledge.

use vacuum_explorer::simulation::geometry::{Direction, Position};
use vacuum_explorer::simulation::memory::{CellStatus, GridKnowledge};

fn origin() -> Position {
    Position::new(0, 0)
}

#[test]
fn test_observing_dock_opens_four_frontier_cells() {
    let mut grid = GridKnowledge::new(origin());
    grid.observe(origin(), 0);

    assert_eq!(grid.status(origin()), CellStatus::Dock);
    assert_eq!(grid.frontier_len(), 4);
    for direction in Direction::all() {
        assert!(grid.is_frontier(origin().step(direction)));
    }
}

#[test]
fn test_reported_walls_never_join_frontier() {
    let mut grid = GridKnowledge::new(origin());
    grid.report_wall(origin(), Direction::North);
    grid.report_wall(origin(), Direction::West);
    grid.observe(origin(), 0);

    assert_eq!(grid.frontier_len(), 2);
    assert!(grid.is_wall(Position::new(-1, 0)));
    assert!(!grid.is_frontier(Position::new(0, -1)));
}

#[test]
fn test_report_wall_on_known_cell_is_noop() {
    let mut grid = GridKnowledge::new(origin());
    grid.observe(origin(), 0);
    grid.observe(Position::new(0, 1), 4);
    let revision = grid.revision();

    grid.report_wall(origin(), Direction::East);
    assert_eq!(grid.status(Position::new(0, 1)), CellStatus::Free(4));
    assert_eq!(grid.revision(), revision);
}

#[test]
fn test_frontier_cell_becomes_free_when_observed() {
    let mut grid = GridKnowledge::new(origin());
    grid.observe(origin(), 0);
    let east = Position::new(0, 1);
    assert!(grid.is_frontier(east));

    grid.observe(east, 3);
    assert!(!grid.is_frontier(east));
    assert!(grid.is_known_free(east));
    assert_eq!(grid.dirt_at(east), 3);
    // The origin is already known; the other three neighbours are new.
    assert!(grid.is_frontier(Position::new(0, 2)));
    assert!(!grid.is_frontier(origin()));
}

#[test]
fn test_resensing_adjusts_dirt_total() {
    let mut grid = GridKnowledge::new(origin());
    let cell = Position::new(2, 2);
    grid.observe(cell, 5);
    assert_eq!(grid.total_dirt(), 5);

    grid.observe(cell, 2);
    assert_eq!(grid.total_dirt(), 2);
    assert_eq!(grid.total_dirt(), grid.scanned_dirt());

    grid.observe(cell, 0);
    assert!(!grid.has_remaining_dirt());
}

#[test]
fn test_dirt_is_clamped_to_nine() {
    let mut grid = GridKnowledge::new(origin());
    grid.observe(Position::new(0, 1), 42);
    assert_eq!(grid.dirt_at(Position::new(0, 1)), 9);
    assert_eq!(grid.total_dirt(), 9);
}

#[test]
fn test_clean_removes_one_unit() {
    let mut grid = GridKnowledge::new(origin());
    let cell = Position::new(0, 1);
    grid.observe(cell, 2);

    grid.clean(cell);
    assert_eq!(grid.dirt_at(cell), 1);
    assert!(grid.is_frontier_or_dirty(cell));
    grid.clean(cell);
    assert!(!grid.is_frontier_or_dirty(cell));
    assert_eq!(grid.total_dirt(), grid.scanned_dirt());
}

#[test]
fn test_revision_tracks_classification_only() {
    let mut grid = GridKnowledge::new(origin());
    let start = grid.revision();
    grid.observe(origin(), 0);
    let after_frontier = grid.revision();
    assert!(after_frontier > start);

    // Re-observing a known cell with a new dirt level changes no classification.
    let cell = Position::new(0, 1);
    grid.report_wall(origin(), Direction::North);
    grid.observe(cell, 3);
    let before = grid.revision();
    grid.observe(cell, 1);
    assert_eq!(grid.revision(), before);
}

#[test]
fn test_nearest_target_prefers_canonical_direction() {
    let mut grid = GridKnowledge::new(origin());
    grid.observe(origin(), 0);
    // All four neighbours are one step away; North comes first.
    assert_eq!(grid.nearest_frontier_or_dirty(origin()), Some(Position::new(-1, 0)));

    grid.report_wall(origin(), Direction::North);
    assert_eq!(grid.nearest_frontier_or_dirty(origin()), Some(Position::new(0, 1)));
}

#[test]
fn test_nearest_target_prefers_dirty_known_cell_when_closer() {
    let mut grid = GridKnowledge::new(origin());
    grid.report_wall(origin(), Direction::North);
    grid.report_wall(origin(), Direction::South);
    grid.report_wall(origin(), Direction::West);
    grid.observe(origin(), 0);

    let east = Position::new(0, 1);
    grid.report_wall(east, Direction::North);
    grid.report_wall(east, Direction::South);
    grid.report_wall(east, Direction::East);
    grid.observe(east, 6);

    assert!(grid.all_known_cells_consistent_with_full_exploration());
    assert_eq!(grid.nearest_frontier_or_dirty(origin()), Some(east));
    assert_eq!(grid.nearest_frontier_or_dirty(east), Some(east));
}

#[test]
fn test_nothing_left_to_do() {
    let mut grid = GridKnowledge::new(origin());
    for direction in Direction::all() {
        grid.report_wall(origin(), direction);
    }
    grid.observe(origin(), 0);
    assert_eq!(grid.nearest_frontier_or_dirty(origin()), None);
    assert!(grid.all_known_cells_consistent_with_full_exploration());
    assert_eq!(grid.known_cells(), 5);
}
