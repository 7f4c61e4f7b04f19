mod common;

use bevy::prelude::*;
use serde_json::json;

use common::*;
use traffic_render_engine::client::snapshot::{EntityCategory, Snapshot, SnapshotRecord};
use traffic_render_engine::engine::scene::entity::{ObjectKey, ObjectKind, SurfaceMaterial};
use traffic_render_engine::engine::scene::factory::ObjectFactory;
use traffic_render_engine::engine::scene::scene_graph::SceneGraph;
use traffic_render_engine::engine::scene::variants::VariantPicker;
use traffic_render_engine::engine::sync::reconcile::{
    ReconcileReport, StaticLayers, apply_interpolation, apply_snapshot,
};

struct Harness {
    scene: SceneGraph,
    cache: traffic_render_engine::engine::assets::cache::AssetCache,
    picker: VariantPicker,
    layers: StaticLayers,
    config: traffic_render_engine::engine::assets::scene_config::SceneConfig,
}

impl Harness {
    fn new() -> Self {
        let config = flat_config();
        Self {
            scene: SceneGraph::default(),
            cache: memory_cache(),
            picker: VariantPicker::new(config.rng_seed),
            layers: StaticLayers::default(),
            config,
        }
    }

    fn apply(&mut self, snapshot: &Snapshot) -> Option<ReconcileReport> {
        let mut factory = ObjectFactory::new(&mut self.cache, &mut self.picker, &self.config);
        apply_snapshot(&mut self.scene, snapshot, &mut factory, &mut self.layers)
    }
}

fn car_key(id: &str) -> ObjectKey {
    ObjectKey::new(EntityCategory::Car, id)
}

#[test]
fn reapplying_a_snapshot_changes_nothing() {
    let mut harness = Harness::new();
    let snapshot = cars([car("a", 1.0, 2.0), car("b", 3.0, 4.0)]);

    let first = harness.apply(&snapshot).expect("dynamic");
    assert_eq!(first.created, 2);

    let second = harness.apply(&snapshot).expect("dynamic");
    assert!(second.is_unchanged_membership());
    assert_eq!(second.updated, 2);
    assert_eq!(harness.scene.count(EntityCategory::Car), 2);

    apply_interpolation(&mut harness.scene, 0.5);
    let a = harness.scene.get(&car_key("a")).expect("a tracked");
    assert!(approx_vec(a.transform.position, Vec3::new(1.0, 0.0, 2.0)));
}

#[test]
fn absent_ids_are_retired_and_new_ids_created() {
    let mut harness = Harness::new();
    harness.apply(&cars([car("a", 0.0, 0.0), car("b", 1.0, 0.0)]));

    let report = harness
        .apply(&cars([car("b", 2.0, 0.0), car("c", 5.0, 5.0)]))
        .expect("dynamic");

    assert_eq!(
        report,
        ReconcileReport {
            created: 1,
            updated: 1,
            retired: 1
        }
    );
    assert!(!harness.scene.contains(&car_key("a")));
    assert!(harness.scene.contains(&car_key("b")));
    assert!(harness.scene.contains(&car_key("c")));
}

#[test]
fn new_car_faces_its_lookahead_point() {
    let mut harness = Harness::new();
    let record = car("a", 2.0, 2.0).with_lookahead(Vec3::new(1.0, 0.0, 2.0));
    harness.apply(&cars([record]));

    let a = harness.scene.get(&car_key("a")).expect("a tracked");
    assert!(approx_eq(a.transform.rotation.y, -std::f32::consts::FRAC_PI_2));

    // Standing still without a hint keeps the facing.
    harness.apply(&cars([car("a", 2.0, 2.0)]));
    apply_interpolation(&mut harness.scene, 1.0);
    let a = harness.scene.get(&car_key("a")).expect("a tracked");
    assert!(approx_eq(a.transform.rotation.y, -std::f32::consts::FRAC_PI_2));
}

#[test]
fn matching_is_by_id_not_position() {
    let mut harness = Harness::new();
    harness.apply(&cars([car("a", 0.0, 0.0)]));
    // A different id at the same spot is a new car.
    let report = harness.apply(&cars([car("z", 0.0, 0.0)])).expect("dynamic");
    assert_eq!(report.created, 1);
    assert_eq!(report.retired, 1);
}

#[test]
fn duplicate_ids_keep_the_later_entry() {
    let payload = json!({
        "positions": [
            {"id": "c1", "x": 0.0, "y": 0.0, "z": 0.0},
            {"id": "c2", "x": 1.0, "y": 0.0, "z": 1.0},
            {"id": "c1", "x": 9.0, "y": 0.0, "z": 9.0},
            {"id": "broken", "x": "left", "y": 0.0, "z": 0.0}
        ]
    });
    let snapshot = Snapshot::from_json(EntityCategory::Car, &payload).expect("valid payload");
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.duplicates, 1);
    assert_eq!(snapshot.skipped, 1);

    let mut harness = Harness::new();
    harness.apply(&snapshot);
    assert_eq!(harness.scene.count(EntityCategory::Car), 2);
    let c1 = harness.scene.get(&car_key("c1")).expect("c1 tracked");
    assert!(approx_vec(c1.transform.position, Vec3::new(9.0, 0.0, 9.0)));
}

#[test]
fn empty_snapshot_clears_the_category_only() {
    let mut harness = Harness::new();
    harness.apply(&Snapshot::from_records(
        EntityCategory::Obstacle,
        [SnapshotRecord::new("house", Vec3::new(3.0, 0.0, 3.0))],
    ));
    harness.apply(&cars([car("a", 0.0, 0.0)]));

    let report = harness
        .apply(&Snapshot::new(EntityCategory::Car))
        .expect("dynamic");
    assert_eq!(report.retired, 1);
    assert_eq!(harness.scene.count(EntityCategory::Car), 0);
    assert_eq!(harness.scene.count(EntityCategory::Obstacle), 1);
}

#[test]
fn static_layers_are_placed_once() {
    let mut harness = Harness::new();
    let roads = Snapshot::from_records(
        EntityCategory::Road,
        [
            SnapshotRecord::new("r1", Vec3::ZERO)
                .with_heading(traffic_render_engine::client::snapshot::Heading::Right),
            SnapshotRecord::new("r2", Vec3::X),
        ],
    );

    let first = harness.apply(&roads).expect("first placement");
    assert_eq!(first.created, 2);
    assert!(harness.layers.is_loaded(EntityCategory::Road));

    assert!(harness.apply(&roads).is_none());
    assert_eq!(harness.scene.count(EntityCategory::Road), 2);

    let r1 = harness
        .scene
        .get(&ObjectKey::new(EntityCategory::Road, "r1"))
        .expect("r1 placed");
    assert!(approx_eq(r1.transform.rotation.y, std::f32::consts::FRAC_PI_2));
}

#[test]
fn lights_map_state_to_configured_surfaces() {
    let mut harness = Harness::new();
    let on = SurfaceMaterial::from_params(&harness.config.traffic_light_colors.on, false);
    let off = SurfaceMaterial::from_params(&harness.config.traffic_light_colors.off, false);
    let light = |state: bool| {
        Snapshot::from_records(
            EntityCategory::TrafficLight,
            [SnapshotRecord::new("l1", Vec3::new(4.0, 0.0, 4.0)).with_state(state)],
        )
    };
    let key = ObjectKey::new(EntityCategory::TrafficLight, "l1");

    harness.apply(&light(true));
    assert_eq!(harness.scene.get(&key).expect("light").surface, on);

    let report = harness.apply(&light(false)).expect("dynamic");
    assert_eq!(report.created, 0);
    assert_eq!(harness.scene.count(EntityCategory::TrafficLight), 1);

    apply_interpolation(&mut harness.scene, 0.0);
    assert_eq!(harness.scene.get(&key).expect("light").surface, on);
    apply_interpolation(&mut harness.scene, 0.25);
    let midway = harness.scene.get(&key).expect("light").surface;
    assert_ne!(midway, on);
    assert_ne!(midway, off);
    apply_interpolation(&mut harness.scene, 0.5);
    assert_eq!(harness.scene.get(&key).expect("light").surface, off);

    let object = harness.scene.get(&key).expect("light");
    assert!(matches!(&object.kind, ObjectKind::TrafficLight(signal) if !signal.on));
}
