//! Per-run reports and the cross-tabulated score table.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::simulation::params::SUMMARY_FILE;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// The agent emitted Finish.
    Finished,
    /// Stopped by the step budget or the wall clock while still working.
    Working,
    /// The battery ran out away from the dock.
    Dead,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Finished => "FINISHED",
            Self::Working => "WORKING",
            Self::Dead => "DEAD",
        })
    }
}

/// Everything recorded about one (house, agent) run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    pub house: String,
    pub agent: String,
    pub steps: usize,
    pub dirt_left: u32,
    pub status: RunStatus,
    pub in_dock: bool,
    pub timed_out: bool,
    pub score: u64,
    /// One character per action: `N E S W` moves, `s` stay, `F` finish.
    pub moves: String,
}

impl RunResult {
    /// File name of this run's report.
    #[must_use]
    pub fn report_name(&self) -> String {
        format!("{}-{}.txt", self.house, self.agent)
    }

    #[must_use]
    pub fn to_report(&self) -> String {
        format!(
            "NumSteps = {}\nDirtLeft = {}\nStatus = {}\nInDock = {}\nScore = {}\n\nSteps:\n{}\n",
            self.steps,
            self.dirt_left,
            self.status,
            if self.in_dock { "TRUE" } else { "FALSE" },
            self.score,
            self.moves,
        )
    }

    /// Writes the report into `dir` and returns its path.
    pub fn write_report(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.report_name());
        fs::write(&path, self.to_report())?;
        Ok(path)
    }
}

/// Scores of every (agent, house) pair, laid out in a fixed order.
#[derive(Clone, Debug, Default)]
pub struct ScoreTable {
    houses: Vec<String>,
    agents: Vec<String>,
    scores: HashMap<(String, String), u64>,
}

impl ScoreTable {
    #[must_use]
    pub fn new(houses: Vec<String>, agents: Vec<String>) -> Self {
        Self {
            houses,
            agents,
            scores: HashMap::new(),
        }
    }

    pub fn insert(&mut self, agent: &str, house: &str, score: u64) {
        self.scores.insert((agent.to_owned(), house.to_owned()), score);
    }

    #[must_use]
    pub fn get(&self, agent: &str, house: &str) -> Option<u64> {
        self.scores.get(&(agent.to_owned(), house.to_owned())).copied()
    }

    /// Number of recorded scores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// One row per agent, one column per house, `N/A` where no score exists.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Algorithm/House");
        for house in &self.houses {
            out.push(',');
            out.push_str(house);
        }
        out.push('\n');
        for agent in &self.agents {
            out.push_str(agent);
            for house in &self.houses {
                match self.get(agent, house) {
                    Some(score) => out.push_str(&format!(",{score}")),
                    None => out.push_str(",N/A"),
                }
            }
            out.push('\n');
        }
        out
    }

    /// Writes `summary.csv` into `dir` and returns its path.
    pub fn write_summary(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(SUMMARY_FILE);
        fs::write(&path, self.to_csv())?;
        Ok(path)
    }
}
