//! Drives (house, agent) runs, alone or as a parallel batch.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::Result;
use crate::harness::report::{RunResult, RunStatus, ScoreTable};
use crate::simulation::agent::Algorithm;
use crate::simulation::environment::House;
use crate::simulation::params::{DEFAULT_THREADS, TIMEOUT_MS_PER_STEP};
use crate::simulation::registry::AgentRegistry;
use crate::simulation::scoring::score;
use crate::simulation::vacuum::{Simulator, StepOutcome};

/// Settings of one batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Worker threads in the pool.
    pub threads: usize,
    /// Wall-clock limit of a single run; `None` scales it with the house budget.
    pub timeout: Option<Duration>,
    /// Where per-run reports go; `None` skips them.
    pub report_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            timeout: None,
            report_dir: None,
        }
    }
}

/// Wall-clock limit for a run with `max_steps` budget when none is configured.
#[must_use]
pub fn default_timeout(max_steps: usize) -> Duration {
    let steps = u64::try_from(max_steps).unwrap_or(u64::MAX);
    Duration::from_millis(TIMEOUT_MS_PER_STEP.saturating_mul(steps))
}

/// Runs one agent on its own copy of `house`.
///
/// The run stops at the first of: Finish, a dead battery, the step budget or
/// the wall-clock `timeout` (by default [`default_timeout`] of the budget). A
/// timed-out run is recorded as if it used the whole budget without cleaning
/// anything; a dead run as if it used the whole budget. The recorded steps,
/// dirt and dock flag are the ones the score is computed from.
pub fn run_single(
    house: &House,
    agent_name: &str,
    mut agent: Box<dyn Algorithm>,
    timeout: Option<Duration>,
) -> Result<RunResult> {
    let started = Instant::now();
    let budget = house.max_steps;
    let timeout = timeout.unwrap_or_else(|| default_timeout(budget));
    let initial_dirt = house.total_dirt();
    let mut sim = Simulator::new(house.clone());
    agent.set_max_steps(budget);
    tracing::info!(house = %house.name, agent = agent_name, budget, "run started");

    let mut timed_out = false;
    while sim.steps() < budget {
        if started.elapsed() > timeout {
            timed_out = true;
            break;
        }
        let action = agent.advance_one_tick(&sim);
        match sim.apply(action)? {
            StepOutcome::Continue => {}
            StepOutcome::Finished | StepOutcome::Dead => break,
        }
    }

    let status = if sim.is_dead() {
        RunStatus::Dead
    } else if sim.is_finished() {
        RunStatus::Finished
    } else {
        RunStatus::Working
    };
    let (steps, dirt_left, in_dock) = if timed_out {
        tracing::warn!(house = %house.name, agent = agent_name, ?timeout, "run timed out");
        (budget, initial_dirt, false)
    } else if status == RunStatus::Dead {
        (budget, sim.dirt_left(), false)
    } else {
        (sim.steps(), sim.dirt_left(), sim.in_dock())
    };
    let score = score(steps, dirt_left, status == RunStatus::Finished, in_dock, budget);

    let result = RunResult {
        house: house.name.clone(),
        agent: agent_name.to_owned(),
        steps,
        dirt_left,
        status,
        in_dock,
        timed_out,
        score,
        moves: sim.moves().to_owned(),
    };
    tracing::info!(
        house = %result.house,
        agent = %result.agent,
        steps = result.steps,
        dirt_left = result.dirt_left,
        status = %result.status,
        score = result.score,
        "run finished"
    );
    Ok(result)
}

/// Runs every registered agent on every house, in parallel.
///
/// Failed runs and unwritable reports are logged and leave their cell empty.
pub fn run_all(houses: &[House], registry: &AgentRegistry, config: &BatchConfig) -> Result<ScoreTable> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.max(1))
        .build()?;

    let house_names = houses.iter().map(|h| h.name.clone()).collect();
    let agent_names: Vec<String> = registry.names().map(str::to_owned).collect();
    let pairs: Vec<(&House, &str)> = houses
        .iter()
        .flat_map(|house| agent_names.iter().map(move |agent| (house, agent.as_str())))
        .collect();
    let table = Mutex::new(ScoreTable::new(house_names, agent_names.clone()));

    pool.install(|| {
        pairs.par_iter().for_each(|&(house, agent_name)| {
            let outcome = registry
                .create(agent_name)
                .and_then(|agent| run_single(house, agent_name, agent, config.timeout));
            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(house = %house.name, agent = agent_name, %err, "run failed");
                    return;
                }
            };
            if let Some(dir) = &config.report_dir {
                if let Err(err) = result.write_report(dir) {
                    tracing::warn!(report = %result.report_name(), %err, "could not write report");
                    return;
                }
            }
            table
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(agent_name, &house.name, result.score);
        });
    });

    Ok(table.into_inner().unwrap_or_else(PoisonError::into_inner))
}
