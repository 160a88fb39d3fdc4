//! Obstacle scenario files.
//!
//! A scenario declares the obstacle batches a session should place: which
//! model each obstacle uses, where it starts, and (for dynamic obstacles)
//! the patrol waypoints. Resolving model names to content is up to the
//! caller; the scenario only carries the declarative side.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::shared::{Pose, Waypoint};

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObstacleScenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub static_obstacles: Vec<StaticEntry>,
    #[serde(default)]
    pub dynamic_obstacles: Vec<DynamicEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticEntry {
    /// Namespace prefix the spawned obstacles are named under.
    pub prefix: String,
    /// Model file stem, resolved against the model directory.
    pub model: String,
    pub pose: Pose,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DynamicEntry {
    pub prefix: String,
    pub model: String,
    pub pose: Pose,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default = "default_count")]
    pub count: u32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<ObstacleScenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: ObstacleScenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}
