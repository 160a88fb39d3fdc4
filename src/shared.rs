//! Shared data model for the obstacle lifecycle subsystem.

use serde::Deserialize;

/// Planar pose: position on the ground plane plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

/// A patrol target on an obstacle's trajectory. Same shape as [`Pose`].
pub type Waypoint = Pose;

/// Content format of a resolved model payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Sdf,
    Urdf,
    Yaml,
}

/// Resolved model content: a format tag plus the payload text.
///
/// For dynamic obstacles the description is actor markup that still has to
/// go through [`crate::actor::fill_actor`].
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    pub kind: ModelType,
    pub name: String,
    pub description: String,
}

/// Maps an obstacle's declared model to concrete content, given the set of
/// formats the simulation backend accepts.
pub trait ModelResolver {
    fn resolve(&self, model_types: &[ModelType]) -> Model;
}

impl<F> ModelResolver for F
where
    F: Fn(&[ModelType]) -> Model,
{
    fn resolve(&self, model_types: &[ModelType]) -> Model {
        self(model_types)
    }
}

/// Caller-supplied request for one static obstacle. Consumed by a single
/// spawn call; the manager keeps nothing of it afterwards.
pub struct ObstacleSetup {
    /// Namespace prefix the obstacle's unique name is drawn from.
    pub prefix: String,
    pub pose: Pose,
    pub model: Box<dyn ModelResolver>,
}

/// Caller-supplied request for one dynamic (actor) obstacle.
pub struct DynamicObstacleSetup {
    pub prefix: String,
    pub pose: Pose,
    pub model: Box<dyn ModelResolver>,
    pub waypoints: Vec<Waypoint>,
}

/// What makes an obstacle move, if anything.
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleKind {
    Static,
    Dynamic { waypoints: Vec<Waypoint> },
}

/// Fully resolved obstacle, ready to hand to the simulation backend.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub name: String,
    pub pose: Pose,
    pub model: Model,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new_static(name: String, pose: Pose, model: Model) -> Self {
        Self {
            name,
            pose,
            model,
            kind: ObstacleKind::Static,
        }
    }

    pub fn new_dynamic(name: String, pose: Pose, model: Model, waypoints: Vec<Waypoint>) -> Self {
        Self {
            name,
            pose,
            model,
            kind: ObstacleKind::Dynamic { waypoints },
        }
    }
}

/// Obstacle classes tracked by the respawn flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleClass {
    Static,
    Dynamic,
    Interactive,
}

/// Caller-owned tri-state respawn flags. All three start raised; the
/// lifecycle manager only ever clears [`ObstacleClass::Dynamic`], after it
/// has processed a non-empty dynamic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespawnFlags {
    needed: [bool; 3],
}

impl RespawnFlags {
    pub fn new() -> Self {
        Self { needed: [true; 3] }
    }

    pub fn needs(&self, class: ObstacleClass) -> bool {
        self.needed[class as usize]
    }

    pub fn clear(&mut self, class: ObstacleClass) {
        self.needed[class as usize] = false;
    }

    pub fn mark(&mut self, class: ObstacleClass) {
        self.needed[class as usize] = true;
    }
}

impl Default for RespawnFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respawn_flags_start_raised() {
        let flags = RespawnFlags::new();
        assert!(flags.needs(ObstacleClass::Static));
        assert!(flags.needs(ObstacleClass::Dynamic));
        assert!(flags.needs(ObstacleClass::Interactive));
    }

    #[test]
    fn clearing_one_class_leaves_the_others() {
        let mut flags = RespawnFlags::new();
        flags.clear(ObstacleClass::Dynamic);
        assert!(!flags.needs(ObstacleClass::Dynamic));
        assert!(flags.needs(ObstacleClass::Static));
        assert!(flags.needs(ObstacleClass::Interactive));

        flags.mark(ObstacleClass::Dynamic);
        assert!(flags.needs(ObstacleClass::Dynamic));
    }
}
