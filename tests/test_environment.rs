use std::path::Path;

use vacuum_explorer::error::SimError;
use vacuum_explorer::simulation::environment::{House, Tile};
use vacuum_explorer::simulation::geometry::{Action, Direction, Position};
use vacuum_explorer::simulation::sensors::Sensors;
use vacuum_explorer::simulation::vacuum::{Simulator, StepOutcome};

const KITCHEN: &str = "\
Small kitchen
MaxSteps = 100
MaxBattery = 20
Rows = 3
Cols = 5
WWWWW
WD12W
WWWWW
this line is beyond Rows and ignored
";

fn label() -> &'static Path {
    Path::new("kitchen.house")
}

#[test]
fn test_parse_house_file() {
    let house = House::parse(KITCHEN, label()).unwrap();
    assert_eq!(house.name, "Small kitchen");
    assert_eq!(house.max_steps, 100);
    assert_eq!(house.max_battery, 20);
    assert_eq!(house.dimensions(), (5, 7));
    assert_eq!(house.dock(), Position::new(2, 2));
    assert_eq!(house.tile(Position::new(2, 3)), Tile::Floor(1));
    assert_eq!(house.total_dirt(), 3);
}

#[test]
fn test_header_keys_are_case_insensitive() {
    let source = "h\nmaxsteps=7\nMAXBATTERY =  9\nrows= 1\nCOLS =2\nD1\n";
    let house = House::parse(source, label()).unwrap();
    assert_eq!(house.max_steps, 7);
    assert_eq!(house.max_battery, 9);
    assert_eq!(house.total_dirt(), 1);
}

#[test]
fn test_short_rows_are_padded_with_floor() {
    let source = "h\nMaxSteps = 10\nMaxBattery = 10\nRows = 2\nCols = 3\nD\n";
    let house = House::parse(source, label()).unwrap();
    assert_eq!(house.dimensions(), (4, 5));
    assert_eq!(house.tile(Position::new(2, 3)), Tile::Floor(0));
    assert!(house.is_wall(Position::new(3, 1)));
}

#[test]
fn test_header_error_carries_line_number() {
    let source = "h\nMaxSteps = 10\nMaxBatery = 5\nRows = 1\nCols = 1\nD\n";
    match House::parse(source, label()) {
        Err(SimError::HouseParse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a parse error, got {other:?}"),
    }

    let source = "h\nMaxSteps = ten\n";
    match House::parse(source, label()) {
        Err(SimError::HouseParse { line, reason, .. }) => {
            assert_eq!(line, 2);
            assert!(reason.contains("ten"));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_missing_header_line() {
    let err = House::parse("h\nMaxSteps = 10\n", label()).unwrap_err();
    assert!(err.to_string().contains("line 3"));
}

#[test]
fn test_house_without_dock_is_rejected() {
    let source = "h\nMaxSteps = 10\nMaxBattery = 10\nRows = 1\nCols = 3\n 12\n";
    assert!(matches!(House::parse(source, label()), Err(SimError::MissingDock(_))));
}

#[test]
fn test_load_uses_file_stem_as_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hallway.house");
    std::fs::write(&path, KITCHEN).unwrap();

    let house = House::load(&path).unwrap();
    assert_eq!(house.name, "hallway");
    assert_eq!(house.total_dirt(), 3);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        House::load(&dir.path().join("nope.house")),
        Err(SimError::Io(_))
    ));
}

#[test]
fn test_simulator_senses_its_surroundings() {
    let house = House::parse(KITCHEN, label()).unwrap();
    let mut sim = Simulator::new(house);
    assert!(sim.is_wall(Direction::North));
    assert!(sim.is_wall(Direction::West));
    assert!(!sim.is_wall(Direction::East));
    assert_eq!(sim.dirt_level(), 0);

    sim.apply(Action::Move(Direction::East)).unwrap();
    assert_eq!(sim.dirt_level(), 1);
    assert_eq!(sim.battery_remaining(), 19);
    assert_eq!(sim.battery_capacity(), 20);
}

#[test]
fn test_simulator_cleaning_on_clean_floor_still_costs() {
    let house = House::from_layout("h", &["D "], 10, 10).unwrap();
    let mut sim = Simulator::new(house);
    sim.apply(Action::Move(Direction::East)).unwrap();
    assert_eq!(sim.apply(Action::Stay).unwrap(), StepOutcome::Continue);
    assert_eq!(sim.battery(), 8);
    assert_eq!(sim.steps(), 2);
}

#[test]
fn test_simulator_charge_is_capped() {
    let house = House::from_layout("h", &["D "], 10, 40).unwrap();
    let mut sim = Simulator::new(house);
    assert_eq!(sim.charge_per_tick(), 2);
    sim.apply(Action::Move(Direction::East)).unwrap();
    sim.apply(Action::Move(Direction::West)).unwrap();
    sim.apply(Action::Stay).unwrap();
    assert_eq!(sim.battery(), 40);
}

#[test]
fn test_actions_after_finish_are_ignored() {
    let house = House::from_layout("h", &["D "], 10, 10).unwrap();
    let mut sim = Simulator::new(house);
    sim.apply(Action::Finish).unwrap();
    assert_eq!(sim.apply(Action::Move(Direction::East)).unwrap(), StepOutcome::Finished);
    assert!(sim.in_dock());
    assert_eq!(sim.moves(), "F");
}
