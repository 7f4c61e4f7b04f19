#![allow(dead_code)]

use bevy::prelude::*;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use traffic_render_engine::client::backend::SimulationBackend;
use traffic_render_engine::client::error::ClientError;
use traffic_render_engine::client::snapshot::{
    EntityCategory, SimulationMetrics, Snapshot, SnapshotRecord,
};
use traffic_render_engine::engine::assets::cache::AssetCache;
use traffic_render_engine::engine::assets::scene_config::{CategoryStyle, SceneConfig};
use traffic_render_engine::engine::assets::source::MemoryAssetSource;

pub const BOX_OBJ: &str = "\
mtllib box.mtl
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
usemtl paint
f 1 2 3 4
";

pub const BOX_MTL: &str = "\
newmtl paint
Ka 0.1 0.1 0.1
Kd 0.5 0.25 1.0
Ks 0.2 0.2 0.2
Ns 20
";

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

pub fn approx_vec(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, 1e-4)
}

pub fn memory_source() -> MemoryAssetSource {
    MemoryAssetSource::new()
        .with_file("models/box.obj", BOX_OBJ)
        .with_file("models/box.mtl", BOX_MTL)
}

pub fn memory_cache() -> AssetCache {
    AssetCache::new(Arc::new(memory_source()), "models")
}

fn box_style() -> CategoryStyle {
    CategoryStyle {
        models: vec!["box".to_string()],
        ..default()
    }
}

/// Every category drawn with the one in-memory box, no height offsets.
pub fn flat_config() -> SceneConfig {
    SceneConfig {
        rng_seed: Some(7),
        cars: box_style(),
        obstacles: box_style(),
        traffic_lights: box_style(),
        roads: box_style(),
        destinations: box_style(),
        ..default()
    }
}

pub fn car(id: &str, x: f32, z: f32) -> SnapshotRecord {
    SnapshotRecord::new(id, Vec3::new(x, 0.0, z))
}

pub fn cars(records: impl IntoIterator<Item = SnapshotRecord>) -> Snapshot {
    Snapshot::from_records(EntityCategory::Car, records)
}

/// Serves queued car snapshots, one per fetch; the last one repeats.
pub struct ScriptedBackend {
    car_frames: Mutex<VecDeque<Snapshot>>,
    last_cars: Mutex<Option<Snapshot>>,
    statics: Vec<Snapshot>,
    step: Mutex<u64>,
    init_failures: Mutex<u32>,
    car_fetches: Mutex<u32>,
    failed_car_fetches: HashSet<u32>,
}

impl ScriptedBackend {
    pub fn new(frames: impl IntoIterator<Item = Snapshot>) -> Self {
        Self {
            car_frames: Mutex::new(frames.into_iter().collect()),
            last_cars: Mutex::new(None),
            statics: Vec::new(),
            step: Mutex::new(0),
            init_failures: Mutex::new(0),
            car_fetches: Mutex::new(0),
            failed_car_fetches: HashSet::new(),
        }
    }

    pub fn with_static(mut self, snapshot: Snapshot) -> Self {
        self.statics.push(snapshot);
        self
    }

    pub fn failing_init(self, times: u32) -> Self {
        *self.init_failures.lock().expect("lock") = times;
        self
    }

    /// Fail the `nth` car fetch (1-based, the bootstrap fetch counts) without
    /// consuming a queued frame.
    pub fn failing_car_fetch(mut self, nth: u32) -> Self {
        self.failed_car_fetches.insert(nth);
        self
    }
}

fn unavailable(endpoint: &str) -> ClientError {
    ClientError::Decode {
        endpoint: endpoint.to_string(),
        source: std::io::Error::other("scripted failure"),
    }
}

impl SimulationBackend for ScriptedBackend {
    fn init(&self, agent_count: u32) -> Result<String, ClientError> {
        let mut failures = self.init_failures.lock().expect("lock");
        if *failures > 0 {
            *failures -= 1;
            return Err(unavailable("/init"));
        }
        Ok(format!("{agent_count} agents"))
    }

    fn fetch(&self, category: EntityCategory) -> Result<Snapshot, ClientError> {
        if category == EntityCategory::Car {
            let mut fetches = self.car_fetches.lock().expect("lock");
            *fetches += 1;
            if self.failed_car_fetches.contains(&*fetches) {
                return Err(unavailable("/getAgents"));
            }
            let mut last = self.last_cars.lock().expect("lock");
            if let Some(next) = self.car_frames.lock().expect("lock").pop_front() {
                *last = Some(next);
            }
            return Ok(last
                .clone()
                .unwrap_or_else(|| Snapshot::new(EntityCategory::Car)));
        }
        Ok(self
            .statics
            .iter()
            .find(|snapshot| snapshot.category == category)
            .cloned()
            .unwrap_or_else(|| Snapshot::new(category)))
    }

    fn advance(&self) -> Result<Option<u64>, ClientError> {
        let mut step = self.step.lock().expect("lock");
        *step += 1;
        Ok(Some(*step))
    }

    fn metrics(&self) -> Result<SimulationMetrics, ClientError> {
        Err(unavailable("/getMetrics"))
    }
}
