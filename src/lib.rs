pub mod actor;
pub mod manager;
pub mod namespace;
pub mod scenario;
pub mod shared;

pub use actor::{fill_actor, TemplateError, SFM_PLUGIN_FILENAME, WAYPOINTS_TOKEN};
pub use manager::{DeletionFailure, ObstacleManager, RemovalReport, SimulationBackend, SpawnError};
pub use namespace::{AllocationError, NameHandle, NamespaceIndexer};
pub use scenario::{ObstacleScenario, ScenarioLoader};
pub use shared::{
    DynamicObstacleSetup, Model, ModelResolver, ModelType, Obstacle, ObstacleClass, ObstacleKind,
    ObstacleSetup, Pose, RespawnFlags, Waypoint,
};
