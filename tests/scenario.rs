use scenery::ScenarioLoader;

const SCENARIO_YAML: &str = r#"
name: crossing
description: One shelf row and a pedestrian loop.

static_obstacles:
  - prefix: shelf
    model: shelf
    pose: { x: 2.0, y: 1.0, theta: 0.0 }
    count: 3

dynamic_obstacles:
  - prefix: pedestrian
    model: pedestrian_sfm
    pose: { x: 0.0, y: -2.0, theta: 0.0 }
    waypoints:
      - { x: 0.0, y: -2.0, theta: 0.0 }
      - { x: 4.0, y: -2.0, theta: 0.0 }
"#;

#[test]
fn loads_a_scenario_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("crossing.yaml"), SCENARIO_YAML).unwrap();

    let loader = ScenarioLoader::new(dir.path());
    let scenario = loader.load("crossing.yaml").unwrap();

    assert_eq!(scenario.name, "crossing");
    assert_eq!(scenario.static_obstacles.len(), 1);
    assert_eq!(scenario.static_obstacles[0].count, 3);
    assert_eq!(scenario.dynamic_obstacles.len(), 1);

    let pedestrian = &scenario.dynamic_obstacles[0];
    // count defaults to 1 when omitted
    assert_eq!(pedestrian.count, 1);
    assert_eq!(pedestrian.waypoints.len(), 2);
    assert_eq!(pedestrian.waypoints[1].x, 4.0);
}

#[test]
fn missing_scenario_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ScenarioLoader::new(dir.path());
    assert!(loader.load("nonexistent.yaml").is_err());
}

#[test]
fn shipped_warehouse_scenario_parses() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader.load("scenarios/warehouse.yaml").unwrap();
    assert_eq!(scenario.name, "warehouse");
    assert!(!scenario.dynamic_obstacles.is_empty());
}
