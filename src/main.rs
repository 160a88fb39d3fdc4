use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use scenery::scenario::{DynamicEntry, StaticEntry};
use scenery::{
    DynamicObstacleSetup, Model, ModelType, Obstacle, ObstacleManager, ObstacleSetup,
    RespawnFlags, ScenarioLoader, SimulationBackend,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Obstacle lifecycle dry-run driver")]
struct Cli {
    /// Path to the obstacle scenario YAML file
    #[arg(long, default_value = "scenarios/warehouse.yaml")]
    scenario: PathBuf,

    /// Directory containing model description files
    #[arg(long, default_value = "models")]
    models: PathBuf,

    /// Leave the spawned obstacles registered instead of removing them
    #[arg(long)]
    keep: bool,
}

/// Backend that only logs what a real simulator would be asked to do.
struct ConsoleBackend {
    model_types: Vec<ModelType>,
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self {
            model_types: vec![ModelType::Sdf, ModelType::Urdf, ModelType::Yaml],
        }
    }
}

impl SimulationBackend for ConsoleBackend {
    fn model_types(&self) -> &[ModelType] {
        &self.model_types
    }

    fn spawn_obstacle(&mut self, obstacle: &Obstacle) -> Result<()> {
        info!(
            name = %obstacle.name,
            x = obstacle.pose.x,
            y = obstacle.pose.y,
            "spawn ({} bytes of description)",
            obstacle.model.description.len()
        );
        Ok(())
    }

    fn delete_obstacle(&mut self, name: &str) -> Result<()> {
        info!(name = %name, "delete");
        Ok(())
    }
}

fn load_model(models_dir: &Path, stem: &str) -> Result<Model> {
    let path = models_dir.join(format!("{stem}.xml"));
    let description = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read model file {}", path.display()))?;
    Ok(Model {
        kind: ModelType::Sdf,
        name: stem.to_string(),
        description,
    })
}

fn static_setups(entries: &[StaticEntry], models_dir: &Path) -> Result<Vec<ObstacleSetup>> {
    let mut setups = Vec::new();
    for entry in entries {
        let model = load_model(models_dir, &entry.model)?;
        for _ in 0..entry.count {
            let model = model.clone();
            setups.push(ObstacleSetup {
                prefix: entry.prefix.clone(),
                pose: entry.pose,
                model: Box::new(move |_: &[ModelType]| model.clone()),
            });
        }
    }
    Ok(setups)
}

fn dynamic_setups(entries: &[DynamicEntry], models_dir: &Path) -> Result<Vec<DynamicObstacleSetup>> {
    let mut setups = Vec::new();
    for entry in entries {
        let model = load_model(models_dir, &entry.model)?;
        for _ in 0..entry.count {
            let model = model.clone();
            setups.push(DynamicObstacleSetup {
                prefix: entry.prefix.clone(),
                pose: entry.pose,
                model: Box::new(move |_: &[ModelType]| model.clone()),
                waypoints: entry.waypoints.clone(),
            });
        }
    }
    Ok(setups)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let mut manager = ObstacleManager::new(Box::new(ConsoleBackend::default()));
    let mut flags = RespawnFlags::new();

    manager.spawn_obstacles(static_setups(&scenario.static_obstacles, &cli.models)?)?;
    manager.spawn_dynamic_obstacles(
        dynamic_setups(&scenario.dynamic_obstacles, &cli.models)?,
        &mut flags,
    )?;

    println!(
        "Scenario '{}' placed {} obstacles: {}",
        scenario.name,
        manager.active_count(),
        manager.active_names().collect::<Vec<_>>().join(", ")
    );

    if !cli.keep {
        let report = manager.remove_all();
        println!(
            "Removed {} obstacles ({} deletion failures)",
            report.removed,
            report.failures.len()
        );
    }
    Ok(())
}
