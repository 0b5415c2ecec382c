//! What a controller can perceive from where it stands.

use crate::simulation::geometry::Direction;
use crate::simulation::params::RECHARGE_TICKS;

/// Read-only snapshot of the battery, taken once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatteryState {
    /// Ticks of work left.
    pub remaining: u32,
    /// Capacity of a full battery.
    pub capacity: u32,
    /// Ticks on the dock needed to go from empty to full.
    pub ticks_to_full: u32,
}

impl BatteryState {
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.remaining >= self.capacity
    }
}

/// Local sensing capability set.
///
/// Implemented by the simulator and by test doubles; controllers only ever
/// see this trait.
pub trait Sensors {
    /// True if the adjacent cell in `direction` is impassable.
    fn is_wall(&self, direction: Direction) -> bool;

    /// Dirt level (0..=9) of the cell the vacuum stands on.
    fn dirt_level(&self) -> u8;

    fn battery_remaining(&self) -> u32;

    fn battery_capacity(&self) -> u32;

    fn recharge_ticks(&self) -> u32 {
        RECHARGE_TICKS
    }

    fn battery_state(&self) -> BatteryState {
        BatteryState {
            remaining: self.battery_remaining(),
            capacity: self.battery_capacity(),
            ticks_to_full: self.recharge_ticks(),
        }
    }
}
