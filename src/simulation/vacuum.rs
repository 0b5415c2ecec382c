//! The simulated vacuum unit: position, battery and the house it is cleaning.
//!
//! Owns all battery arithmetic. Controllers only see it through [`Sensors`].

use crate::error::{Result, SimError};
use crate::simulation::environment::House;
use crate::simulation::geometry::{Action, Direction, Position};
use crate::simulation::params::RECHARGE_TICKS;
use crate::simulation::sensors::Sensors;

/// What happened after applying one action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Finished,
    /// The battery ran out away from the dock.
    Dead,
}

/// A vacuum driving through its own copy of a house.
#[derive(Clone, Debug)]
pub struct Simulator {
    house: House,
    position: Position,
    battery: u32,
    steps: usize,
    finished: bool,
    dead: bool,
    moves: String,
}

impl Simulator {
    /// Places a fully charged vacuum on the house's dock.
    #[must_use]
    pub fn new(house: House) -> Self {
        Self {
            position: house.dock(),
            battery: house.max_battery,
            house,
            steps: 0,
            finished: false,
            dead: false,
            moves: String::new(),
        }
    }

    /// Charge gained per tick spent on the dock.
    #[must_use]
    pub fn charge_per_tick(&self) -> u32 {
        self.house.max_battery.div_ceil(RECHARGE_TICKS).max(1)
    }

    /// Applies one action to the vacuum and the house.
    ///
    /// Moves cost one tick of battery; a Stay cleans one unit of dirt for one
    /// tick of battery, or recharges when on the dock. Finish is not a step.
    pub fn apply(&mut self, action: Action) -> Result<StepOutcome> {
        if self.dead {
            return Ok(StepOutcome::Dead);
        }
        if self.finished {
            return Ok(StepOutcome::Finished);
        }

        match action {
            Action::Finish => {
                self.finished = true;
                self.moves.push(action.as_char());
                return Ok(StepOutcome::Finished);
            }
            Action::Stay if self.in_dock() => {
                self.battery = (self.battery + self.charge_per_tick()).min(self.house.max_battery);
            }
            Action::Stay => {
                if self.battery == 0 {
                    return Ok(self.die());
                }
                self.battery -= 1;
                self.house.clean(self.position);
            }
            Action::Move(direction) => {
                let next = self.position.step(direction);
                if self.house.is_wall(next) {
                    return Err(SimError::WallCollision(next));
                }
                if self.battery == 0 {
                    return Ok(self.die());
                }
                self.battery -= 1;
                self.position = next;
            }
        }

        self.steps += 1;
        self.moves.push(action.as_char());
        if self.battery == 0 && !self.in_dock() {
            return Ok(self.die());
        }
        Ok(StepOutcome::Continue)
    }

    fn die(&mut self) -> StepOutcome {
        tracing::warn!(pos = %self.position, steps = self.steps, "battery exhausted away from the dock");
        self.dead = true;
        StepOutcome::Dead
    }

    #[must_use]
    pub const fn house(&self) -> &House {
        &self.house
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn battery(&self) -> u32 {
        self.battery
    }

    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn in_dock(&self) -> bool {
        self.position == self.house.dock()
    }

    #[must_use]
    pub const fn dirt_left(&self) -> u32 {
        self.house.total_dirt()
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Move log so far, one character per action.
    #[must_use]
    pub fn moves(&self) -> &str {
        &self.moves
    }
}

impl Sensors for Simulator {
    fn is_wall(&self, direction: Direction) -> bool {
        self.house.is_wall(self.position.step(direction))
    }

    fn dirt_level(&self) -> u8 {
        self.house.dirt_at(self.position)
    }

    fn battery_remaining(&self) -> u32 {
        self.battery
    }

    fn battery_capacity(&self) -> u32 {
        self.house.max_battery
    }

    fn recharge_ticks(&self) -> u32 {
        self.house.max_battery.div_ceil(self.charge_per_tick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Simulator {
        Simulator::new(House::from_layout("c", &["D 3"], 50, 10).unwrap())
    }

    #[test]
    fn test_starts_docked_and_full() {
        let sim = corridor();
        assert!(sim.in_dock());
        assert_eq!(sim.battery(), 10);
        assert!(sim.is_wall(Direction::North));
        assert!(!sim.is_wall(Direction::East));
    }

    #[test]
    fn test_move_and_clean_cost_battery() {
        let mut sim = corridor();
        assert_eq!(sim.apply(Action::Move(Direction::East)).unwrap(), StepOutcome::Continue);
        assert_eq!(sim.apply(Action::Move(Direction::East)).unwrap(), StepOutcome::Continue);
        assert_eq!(sim.dirt_level(), 3);
        sim.apply(Action::Stay).unwrap();
        assert_eq!(sim.dirt_level(), 2);
        assert_eq!(sim.battery(), 7);
        assert_eq!(sim.steps(), 3);
        assert_eq!(sim.moves(), "EEs");
    }

    #[test]
    fn test_dock_stay_recharges() {
        let mut sim = corridor();
        sim.apply(Action::Move(Direction::East)).unwrap();
        sim.apply(Action::Move(Direction::West)).unwrap();
        assert_eq!(sim.battery(), 8);
        sim.apply(Action::Stay).unwrap();
        assert_eq!(sim.battery(), 9);
        assert_eq!(sim.recharge_ticks(), 10);
    }

    #[test]
    fn test_wall_collision_is_error() {
        let mut sim = corridor();
        assert!(matches!(
            sim.apply(Action::Move(Direction::North)),
            Err(SimError::WallCollision(_))
        ));
    }

    #[test]
    fn test_finish_is_not_a_step() {
        let mut sim = corridor();
        assert_eq!(sim.apply(Action::Finish).unwrap(), StepOutcome::Finished);
        assert_eq!(sim.steps(), 0);
        assert!(sim.is_finished());
    }

    #[test]
    fn test_dies_when_empty_away_from_dock() {
        let house = House::from_layout("c", &["D    "], 50, 1).unwrap();
        let mut sim = Simulator::new(house);
        assert_eq!(sim.apply(Action::Move(Direction::East)).unwrap(), StepOutcome::Dead);
        assert!(sim.is_dead());
    }
}
