//! The cleaning agent's task controller.
//!
//! Each tick the controller folds the latest sensor reading into its map,
//! runs its state machine until one state commits to an action, and
//! dead-reckons its own position from the move it emits. Coordinates are
//! private to the agent: the dock is always the origin.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::error::{Result, SimError};
use crate::simulation::geometry::{Action, Direction, Position};
use crate::simulation::memory::GridKnowledge;
use crate::simulation::params::{DEFAULT_SAFETY_MARGIN, MAX_TRANSITIONS_PER_TICK};
use crate::simulation::planning::{self, PathPlanner};
use crate::simulation::sensors::{BatteryState, Sensors};

/// Interface between the harness and any cleaning algorithm.
pub trait Algorithm: Send {
    /// Called once before the first tick.
    fn set_max_steps(&mut self, max_steps: usize);

    /// Reads the sensors and returns exactly one action.
    fn advance_one_tick(&mut self, sensors: &dyn Sensors) -> Action;

    /// True once the algorithm will only ever emit `Finish`.
    fn has_terminated(&self) -> bool;
}

/// Behavioural mode of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Head for the nearest frontier or dirty cell
    Explore,
    /// Stay and clean the current cell
    Clean,
    /// Follow the shortest known route home
    ReturnToDock,
    /// Stay on the dock until the battery is full
    Charge,
    /// Go back to the cell a forced dock return interrupted
    ResumeToTarget,
    /// Terminal; emits `Finish` forever
    Done,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explore => "EXPLORE",
            Self::Clean => "CLEANING",
            Self::ReturnToDock => "TO_DOCK",
            Self::Charge => "CHARGING",
            Self::ResumeToTarget => "TO_POS",
            Self::Done => "FINISH",
        };
        f.write_str(name)
    }
}

/// Runtime knobs of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    safety_margin: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}

impl ControllerConfig {
    /// Creates a config with a fixed battery safety margin.
    ///
    /// The margin must be at least one tick: cleaning spends a tick before the
    /// next check gets a chance to send the vacuum home.
    pub fn new(safety_margin: u32) -> Result<Self> {
        if safety_margin == 0 {
            return Err(SimError::InvalidConfig(
                "safety margin must be at least 1 tick".into(),
            ));
        }
        Ok(Self { safety_margin })
    }

    #[must_use]
    pub const fn safety_margin(&self) -> u32 {
        self.safety_margin
    }
}

/// Why a round trip to a target was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortfall {
    /// Not enough charge to get there and back with the margin.
    Battery,
    /// Not enough step budget left to get there and back and still finish.
    Steps,
    /// No route through known terrain.
    Unreachable,
}

/// Outcome of one state handler.
enum Transition {
    Emit(Action),
    Goto(ControllerState),
}

/// Map-learning, battery-aware cleaning controller.
#[derive(Clone, Debug)]
pub struct TaskController {
    knowledge: GridKnowledge,
    planner: PathPlanner,
    config: ControllerConfig,
    state: ControllerState,
    position: Position,
    pending_target: Option<Position>,
    battery: BatteryState,
    max_steps: usize,
    steps_taken: usize,
    dock_route: VecDeque<Direction>,
    dock_route_key: Option<(u64, Position)>,
    dock_distances: HashMap<Position, u32>,
    dock_distances_revision: Option<u64>,
}

impl Default for TaskController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl TaskController {
    /// Creates a controller standing on its dock.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        let dock = Position::new(0, 0);
        Self {
            knowledge: GridKnowledge::new(dock),
            planner: PathPlanner::new(),
            config,
            state: ControllerState::Explore,
            position: dock,
            pending_target: None,
            battery: BatteryState {
                remaining: 0,
                capacity: 0,
                ticks_to_full: 0,
            },
            max_steps: usize::MAX,
            steps_taken: 0,
            dock_route: VecDeque::new(),
            dock_route_key: None,
            dock_distances: HashMap::new(),
            dock_distances_revision: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Position relative to the dock.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn knowledge(&self) -> &GridKnowledge {
        &self.knowledge
    }

    #[must_use]
    pub const fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    #[must_use]
    pub const fn config(&self) -> ControllerConfig {
        self.config
    }

    #[must_use]
    pub const fn pending_target(&self) -> Option<Position> {
        self.pending_target
    }

    #[must_use]
    pub const fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Battery as read at the start of the last tick.
    #[must_use]
    pub const fn battery(&self) -> BatteryState {
        self.battery
    }

    #[must_use]
    pub const fn steps_remaining(&self) -> usize {
        self.max_steps.saturating_sub(self.steps_taken)
    }

    fn at_dock(&self) -> bool {
        self.position == self.knowledge.dock()
    }

    fn sense(&mut self, sensors: &dyn Sensors) {
        self.battery = sensors.battery_state();
        // Walls first, so observe() never pushes them onto the frontier.
        for direction in Direction::all() {
            if sensors.is_wall(direction) {
                self.knowledge.report_wall(self.position, direction);
            }
        }
        self.knowledge.observe(self.position, sensors.dirt_level());
    }

    fn decide(&mut self) -> Action {
        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let transition = match self.state {
                ControllerState::Explore => self.explore(),
                ControllerState::Clean => self.clean(),
                ControllerState::ReturnToDock => self.return_to_dock(),
                ControllerState::Charge => self.charge(),
                ControllerState::ResumeToTarget => self.resume_to_target(),
                ControllerState::Done => Transition::Emit(Action::Finish),
            };
            match transition {
                Transition::Emit(action) => return action,
                Transition::Goto(next) => {
                    tracing::debug!(
                        from = %self.state,
                        to = %next,
                        pos = %self.position,
                        battery = self.battery.remaining,
                        steps = self.steps_taken,
                        "state transition"
                    );
                    self.state = next;
                }
            }
        }
        tracing::warn!(state = %self.state, pos = %self.position, "state machine did not settle this tick");
        Action::Stay
    }

    fn explore(&mut self) -> Transition {
        let here = self.position;
        if self.knowledge.dirt_at(here) > 0 {
            return Transition::Goto(ControllerState::Clean);
        }
        let Some(target) = self.knowledge.nearest_frontier_or_dirty(here) else {
            tracing::trace!(pos = %here, "nothing reachable left to explore or clean");
            return Transition::Goto(ControllerState::ReturnToDock);
        };
        match self.round_trip(target) {
            Ok(path) => match path.first() {
                Some(&direction) => Transition::Emit(Action::Move(direction)),
                None => Transition::Goto(ControllerState::ReturnToDock),
            },
            Err(shortfall) => self.refuse_target(target, shortfall),
        }
    }

    fn clean(&mut self) -> Transition {
        let here = self.position;
        if self.knowledge.dirt_at(here) == 0 {
            return Transition::Goto(ControllerState::Explore);
        }
        match self.round_trip(here) {
            Ok(_) => {
                self.knowledge.clean(here);
                Transition::Emit(Action::Stay)
            }
            Err(shortfall) => self.refuse_target(here, shortfall),
        }
    }

    fn return_to_dock(&mut self) -> Transition {
        if self.at_dock() {
            return self.arrive_at_dock();
        }
        match self.next_step_home() {
            Some(direction) => Transition::Emit(Action::Move(direction)),
            None => {
                tracing::warn!(pos = %self.position, "no known route to the dock");
                Transition::Goto(ControllerState::Done)
            }
        }
    }

    fn arrive_at_dock(&mut self) -> Transition {
        let Some(target) = self.knowledge.nearest_frontier_or_dirty(self.position) else {
            tracing::debug!(steps = self.steps_taken, "house explored and clean");
            return Transition::Goto(ControllerState::Done);
        };
        match self.round_trip(target) {
            Err(Shortfall::Steps | Shortfall::Unreachable) => Transition::Goto(ControllerState::Done),
            Err(Shortfall::Battery) if self.battery.is_full() => Transition::Goto(ControllerState::Done),
            _ if !self.battery.is_full() => Transition::Goto(ControllerState::Charge),
            _ if self.pending_target.is_some() => Transition::Goto(ControllerState::ResumeToTarget),
            _ => Transition::Goto(ControllerState::Explore),
        }
    }

    fn charge(&mut self) -> Transition {
        if !self.at_dock() {
            return Transition::Goto(ControllerState::ReturnToDock);
        }
        // A Stay that uses the last budget step would end the run undocked-finished.
        if self.steps_remaining() <= 1 {
            return Transition::Goto(ControllerState::Done);
        }
        if self.battery.is_full() {
            return if self.pending_target.is_some() {
                Transition::Goto(ControllerState::ResumeToTarget)
            } else {
                Transition::Goto(ControllerState::Explore)
            };
        }
        Transition::Emit(Action::Stay)
    }

    fn resume_to_target(&mut self) -> Transition {
        let Some(target) = self.pending_target else {
            return Transition::Goto(ControllerState::Explore);
        };
        let here = self.position;
        if here == target {
            self.pending_target = None;
            return if self.knowledge.dirt_at(here) > 0 {
                Transition::Goto(ControllerState::Clean)
            } else {
                Transition::Goto(ControllerState::Explore)
            };
        }
        if !self.knowledge.is_frontier_or_dirty(target) {
            self.pending_target = None;
            return Transition::Goto(ControllerState::Explore);
        }

        match self.round_trip(target) {
            Ok(path) => match path.first() {
                Some(&direction) => Transition::Emit(Action::Move(direction)),
                None => Transition::Goto(ControllerState::Explore),
            },
            Err(Shortfall::Battery) if self.at_dock() && !self.battery.is_full() => {
                Transition::Goto(ControllerState::Charge)
            }
            Err(shortfall) if self.at_dock() || shortfall == Shortfall::Unreachable => {
                tracing::debug!(%target, ?shortfall, "abandoning pending target");
                self.pending_target = None;
                Transition::Goto(ControllerState::Explore)
            }
            Err(_) => Transition::Goto(ControllerState::ReturnToDock),
        }
    }

    /// Decides what to do about a target the round-trip check rejected.
    ///
    /// On the dock the nearest target has the cheapest round trip of all, so
    /// if charging cannot make it safe nothing can.
    fn refuse_target(&mut self, target: Position, shortfall: Shortfall) -> Transition {
        tracing::debug!(%target, ?shortfall, pos = %self.position, "target refused");
        if shortfall == Shortfall::Unreachable {
            self.pending_target = None;
            return Transition::Goto(ControllerState::ReturnToDock);
        }
        if self.at_dock() {
            if shortfall == Shortfall::Battery && !self.battery.is_full() {
                self.pending_target = Some(target);
                return Transition::Goto(ControllerState::Charge);
            }
            self.pending_target = None;
            return Transition::Goto(ControllerState::Done);
        }
        self.pending_target = Some(target);
        Transition::Goto(ControllerState::ReturnToDock)
    }

    /// Plans the route to `target` and checks it can be followed by a trip home.
    ///
    /// Requires `battery > out + back + margin` and `steps_left > out + back + 1`.
    /// For a frontier target the way back is costed from the cell the route
    /// enters it from, which is the only neighbour known to be connected.
    pub fn round_trip(&mut self, target: Position) -> std::result::Result<Vec<Direction>, Shortfall> {
        let here = self.position;
        let path = if target == here {
            Vec::new()
        } else {
            let path = self.planner.shortest_path(&self.knowledge, here, target);
            if path.is_empty() {
                return Err(Shortfall::Unreachable);
            }
            path
        };

        let back = if self.knowledge.is_known_free(target) {
            self.dock_distance(target)
        } else {
            let entry = here.follow(&path[..path.len() - 1]);
            self.dock_distance(entry).map(|d| d + 1)
        };
        let Some(back) = back else {
            return Err(Shortfall::Unreachable);
        };

        let out = u32::try_from(path.len()).unwrap_or(u32::MAX);
        let trip = out.saturating_add(back);
        if self.battery.remaining <= trip.saturating_add(self.config.safety_margin) {
            return Err(Shortfall::Battery);
        }
        if self.steps_remaining() <= trip as usize + 1 {
            return Err(Shortfall::Steps);
        }
        Ok(path)
    }

    fn dock_distance(&mut self, pos: Position) -> Option<u32> {
        let revision = self.knowledge.revision();
        if self.dock_distances_revision != Some(revision) {
            self.dock_distances = planning::distance_field(&self.knowledge, self.knowledge.dock());
            self.dock_distances_revision = Some(revision);
        }
        self.dock_distances.get(&pos).copied()
    }

    /// Next move of the cached dock route, replanning when the map changed.
    fn next_step_home(&mut self) -> Option<Direction> {
        let key = (self.knowledge.revision(), self.position);
        if self.dock_route_key != Some(key) || self.dock_route.is_empty() {
            let dock = self.knowledge.dock();
            self.dock_route = self
                .planner
                .shortest_path(&self.knowledge, self.position, dock)
                .into();
        }
        let direction = self.dock_route.pop_front()?;
        self.dock_route_key = Some((key.0, self.position.step(direction)));
        Some(direction)
    }
}

impl Algorithm for TaskController {
    fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }

    fn advance_one_tick(&mut self, sensors: &dyn Sensors) -> Action {
        if self.state == ControllerState::Done {
            return Action::Finish;
        }
        self.sense(sensors);
        let action = self.decide();
        tracing::trace!(
            state = %self.state,
            pos = %self.position,
            action = %action.as_char(),
            "tick"
        );

        match action {
            Action::Move(direction) => {
                self.position = self.position.step(direction);
                self.steps_taken += 1;
            }
            Action::Stay => self.steps_taken += 1,
            Action::Finish => {}
        }
        action
    }

    fn has_terminated(&self) -> bool {
        self.state == ControllerState::Done
    }
}
