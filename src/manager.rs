//! Obstacle lifecycle orchestration.
//!
//! The manager ties the namespace allocator and the actor templater to an
//! external simulation backend: it assigns each requested obstacle a unique
//! name, builds its resolved record, delegates the actual spawn, and keeps a
//! registry of what is active so everything can be torn down again.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::actor::{self, TemplateError};
use crate::namespace::{AllocationError, NameHandle, NamespaceIndexer};
use crate::shared::{
    DynamicObstacleSetup, Model, ModelType, Obstacle, ObstacleClass, ObstacleSetup, Pose,
    RespawnFlags,
};

/// External simulation the obstacles live in. Implementations perform the
/// actual entity creation and deletion; the manager never retains a record
/// after handing it over.
pub trait SimulationBackend {
    /// Model formats this backend accepts, passed to each setup's resolver.
    fn model_types(&self) -> &[ModelType];
    fn spawn_obstacle(&mut self, obstacle: &Obstacle) -> anyhow::Result<()>;
    fn delete_obstacle(&mut self, name: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("backend failed to spawn {name}: {source}")]
    Backend {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("line obstacles are not supported")]
    LineObstaclesUnsupported,
}

/// One failed backend deletion during [`ObstacleManager::remove_all`].
/// Non-fatal: the slot is released regardless.
#[derive(Debug)]
pub struct DeletionFailure {
    pub name: String,
    pub source: anyhow::Error,
}

/// Outcome of a removal pass. Deletion failures are surfaced here as data
/// rather than as an error so a partially failing pass still clears the
/// registry and frees every slot.
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// Entries the backend confirmed deleted.
    pub removed: usize,
    pub failures: Vec<DeletionFailure>,
}

impl RemovalReport {
    pub fn fully_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct ActiveEntry {
    name: String,
    handle: NameHandle,
}

pub struct ObstacleManager {
    backend: Box<dyn SimulationBackend>,
    namespaces: HashMap<String, NamespaceIndexer>,
    active: Vec<ActiveEntry>,
}

impl ObstacleManager {
    pub fn new(backend: Box<dyn SimulationBackend>) -> Self {
        Self {
            backend,
            namespaces: HashMap::new(),
            active: Vec::new(),
        }
    }

    /// Spawns a batch of static obstacles.
    ///
    /// Fails fast: the first allocation or backend failure aborts the batch,
    /// releasing the failing setup's slot. Obstacles spawned earlier in the
    /// batch stay registered.
    pub fn spawn_obstacles(&mut self, setups: Vec<ObstacleSetup>) -> Result<(), SpawnError> {
        for setup in setups {
            let (name, handle) = self.allocate(&setup.prefix)?;
            let model = setup.model.resolve(self.backend.model_types());
            let obstacle = Obstacle::new_static(name, setup.pose, model);
            self.spawn_one(obstacle, handle)?;
        }
        Ok(())
    }

    /// Spawns a batch of dynamic (actor) obstacles, templating each setup's
    /// resolved description with its name, pose and waypoints.
    ///
    /// After a non-empty batch the caller-owned dynamic respawn flag is
    /// cleared; an empty batch leaves the flags untouched.
    pub fn spawn_dynamic_obstacles(
        &mut self,
        setups: Vec<DynamicObstacleSetup>,
        flags: &mut RespawnFlags,
    ) -> Result<(), SpawnError> {
        let spawned_any = !setups.is_empty();
        for setup in setups {
            let (name, handle) = self.allocate(&setup.prefix)?;
            info!(actor_id = %name, "spawning actor");

            let model = setup.model.resolve(self.backend.model_types());
            let description =
                match actor::fill_actor(&model.description, &name, setup.pose, &setup.waypoints) {
                    Ok(description) => description,
                    Err(err) => {
                        self.release(handle);
                        return Err(err.into());
                    }
                };
            let model = Model {
                kind: model.kind,
                name: name.clone(),
                description,
            };
            let obstacle = Obstacle::new_dynamic(name, setup.pose, model, setup.waypoints);
            self.spawn_one(obstacle, handle)?;
        }
        if spawned_any {
            flags.clear(ObstacleClass::Dynamic);
        }
        Ok(())
    }

    /// Line obstacles have no specified contract yet; failing loudly here
    /// keeps a caller's wiring mistake from passing silently.
    pub fn spawn_line_obstacle(
        &mut self,
        _name: &str,
        _from: Pose,
        _to: Pose,
    ) -> Result<(), SpawnError> {
        Err(SpawnError::LineObstaclesUnsupported)
    }

    /// Removes every active obstacle in insertion order and clears the
    /// registry. A no-op on an empty registry.
    ///
    /// A failed backend deletion is logged and recorded in the report, and
    /// the entry's slot is released anyway: leaking a namespace slot on a
    /// transient delete failure would poison every later spawn, while a
    /// stray entity in the backend is recoverable.
    pub fn remove_all(&mut self) -> RemovalReport {
        let mut report = RemovalReport::default();
        let entries = std::mem::take(&mut self.active);
        for entry in entries {
            match self.backend.delete_obstacle(&entry.name) {
                Ok(()) => report.removed += 1,
                Err(source) => {
                    warn!(name = %entry.name, "failed to delete obstacle: {source}");
                    report.failures.push(DeletionFailure {
                        name: entry.name,
                        source,
                    });
                }
            }
            self.release(entry.handle);
        }
        report
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Names of active obstacles, in spawn order.
    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(|entry| entry.name.as_str())
    }

    fn allocate(&mut self, prefix: &str) -> Result<(String, NameHandle), AllocationError> {
        let indexer = match self.namespaces.entry(prefix.to_string()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(NamespaceIndexer::new(prefix)?),
        };
        Ok(indexer.allocate())
    }

    fn release(&mut self, handle: NameHandle) {
        if let Some(indexer) = self.namespaces.get_mut(handle.prefix()) {
            indexer.release(handle);
        }
    }

    fn spawn_one(&mut self, obstacle: Obstacle, handle: NameHandle) -> Result<(), SpawnError> {
        if let Err(source) = self.backend.spawn_obstacle(&obstacle) {
            self.release(handle);
            return Err(SpawnError::Backend {
                name: obstacle.name,
                source,
            });
        }
        self.active.push(ActiveEntry {
            name: obstacle.name,
            handle,
        });
        Ok(())
    }
}
