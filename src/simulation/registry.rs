//! Named agent factories.
//!
//! The harness asks the registry for a fresh agent per run, so every run owns
//! its own map and state. Registries are plain values: tests can build as many
//! independent ones as they like.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SimError};
use crate::simulation::agent::{Algorithm, ControllerConfig, TaskController};
use crate::simulation::params::CAUTIOUS_SAFETY_MARGIN;

/// Builds a fresh agent for one run.
pub type AgentFactory = Box<dyn Fn() -> Box<dyn Algorithm> + Send + Sync>;

/// Mapping from agent name to factory, iterated in name order.
#[derive(Default)]
pub struct AgentRegistry {
    factories: BTreeMap<String, AgentFactory>,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

impl AgentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in controllers:
    /// `astar` (default margin) and `astar-cautious` (wide margin).
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("astar", || Box::new(TaskController::default()));
        let cautious = ControllerConfig::new(CAUTIOUS_SAFETY_MARGIN).unwrap_or_default();
        registry.register("astar-cautious", move || Box::new(TaskController::new(cautious)));
        registry
    }

    /// Adds or replaces the factory registered under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Algorithm> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            tracing::warn!(%name, "agent registered twice, keeping the latest");
        }
    }

    /// Creates a new agent instance.
    pub fn create(&self, name: &str) -> Result<Box<dyn Algorithm>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SimError::UnknownAgent(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Keeps only the agents named in `names`; errors on an unknown name.
    pub fn retain_named(&mut self, names: &[String]) -> Result<()> {
        if let Some(missing) = names.iter().find(|n| !self.contains(n)) {
            return Err(SimError::UnknownAgent(missing.clone()));
        }
        self.factories.retain(|name, _| names.contains(name));
        Ok(())
    }
}
