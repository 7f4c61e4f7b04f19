use bevy::prelude::*;
use std::collections::HashSet;

use super::motion::interpolation_fraction;
use crate::client::snapshot::{EntityCategory, Snapshot, SnapshotRecord};
use crate::engine::scene::entity::{ObjectKey, ObjectKind, SceneObject};
use crate::engine::scene::factory::ObjectFactory;
use crate::engine::scene::scene_graph::SceneGraph;

/// What one reconciliation pass changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub retired: usize,
}

impl ReconcileReport {
    pub fn is_unchanged_membership(&self) -> bool {
        self.created == 0 && self.retired == 0
    }
}

/// Static categories already placed this session.
#[derive(Resource, Default, Debug)]
pub struct StaticLayers {
    loaded: HashSet<EntityCategory>,
}

impl StaticLayers {
    pub fn is_loaded(&self, category: EntityCategory) -> bool {
        self.loaded.contains(&category)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Single entry point for applying a snapshot to the scene.
///
/// Dynamic categories are diffed every time. Static categories are placed
/// once; later snapshots for them return `None`.
pub fn apply_snapshot(
    scene: &mut SceneGraph,
    snapshot: &Snapshot,
    factory: &mut ObjectFactory,
    layers: &mut StaticLayers,
) -> Option<ReconcileReport> {
    if snapshot.category.is_dynamic() {
        return Some(reconcile_dynamic(scene, snapshot, factory));
    }
    if !layers.loaded.insert(snapshot.category) {
        debug!(
            "Ignoring repeated {} layer",
            snapshot.category.label()
        );
        return None;
    }
    let mut report = ReconcileReport::default();
    for record in snapshot.records() {
        if scene.add_object(factory.create(snapshot.category, record)) {
            report.created += 1;
        }
    }
    info!(
        "Placed {} {} objects",
        report.created,
        snapshot.category.label()
    );
    Some(report)
}

/// Diff a dynamic snapshot against the tracked objects of its category.
///
/// Objects whose id is absent are retired, present ones get the new sample
/// shifted in and new ids are created with a zero-length motion buffer.
/// Ids are matched exactly, never by position.
pub fn reconcile_dynamic(
    scene: &mut SceneGraph,
    snapshot: &Snapshot,
    factory: &mut ObjectFactory,
) -> ReconcileReport {
    let category = snapshot.category;
    let mut report = ReconcileReport::default();

    for key in scene.keys_in(category) {
        if !snapshot.contains(&key.id) && scene.remove_object(&key).is_some() {
            report.retired += 1;
        }
    }

    for record in snapshot.records() {
        let key = ObjectKey::new(category, record.id.clone());
        match scene.get_mut(&key) {
            Some(object) => {
                update_object(object, record);
                report.updated += 1;
            }
            None => {
                scene.add_object(factory.create(category, record));
                report.created += 1;
            }
        }
    }

    debug!(
        "Reconciled {}: +{} ~{} -{}",
        category.label(),
        report.created,
        report.updated,
        report.retired
    );
    report
}

fn update_object(object: &mut SceneObject, record: &SnapshotRecord) {
    let lift = Vec3::Y * object.y_offset;
    let position = record.position + lift;
    match &mut object.kind {
        ObjectKind::Car(motion) => {
            motion.observe(
                position,
                record.heading.map(|heading| heading.yaw()),
                record.lookahead.map(|ahead| ahead + lift),
            );
        }
        ObjectKind::TrafficLight(signal) => {
            signal.observe(record.state);
            object.transform.position = position;
        }
        ObjectKind::Static => object.transform.position = position,
    }
}

/// Freeze the objects of `category` at what is drawn at fraction `f`.
///
/// Used when a poll applied other dynamic categories but brought nothing
/// for this one: the interpolation clock restarts for everybody, and a held
/// object must not replay its last step.
pub fn hold_category(scene: &mut SceneGraph, category: EntityCategory, f: f32) {
    for object in scene.iter_mut() {
        if object.key.category != category {
            continue;
        }
        match &mut object.kind {
            ObjectKind::Car(motion) => motion.hold(f),
            ObjectKind::TrafficLight(signal) => signal.hold(),
            ObjectKind::Static => {}
        }
    }
}

/// Write interpolated render state for every dynamic object at fraction `f`.
pub fn apply_interpolation(scene: &mut SceneGraph, f: f32) {
    for object in scene.iter_mut() {
        match &object.kind {
            ObjectKind::Car(motion) => {
                let (position, yaw) = motion.sample(f);
                object.transform.position = position;
                object.transform.rotation.y = yaw;
            }
            ObjectKind::TrafficLight(signal) => object.surface = signal.sample(f),
            ObjectKind::Static => {}
        }
    }
}

/// Frame-time accumulators for polling and interpolation.
///
/// The poll accumulator decides when to request the next snapshot. The
/// interpolation accumulator restarts only when a dynamic snapshot is
/// applied, so a slow response never rewinds motion already shown.
#[derive(Resource, Debug, Clone)]
pub struct SyncClock {
    poll_interval: f32,
    since_poll: f32,
    since_snapshot: f32,
}

impl SyncClock {
    pub fn new(poll_interval: f32) -> Self {
        Self {
            poll_interval,
            since_poll: 0.0,
            since_snapshot: poll_interval,
        }
    }

    pub fn poll_interval(&self) -> f32 {
        self.poll_interval
    }

    /// Advance by `dt`. Returns true when a poll is due; the accumulator is reset then.
    pub fn tick(&mut self, dt: f32) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.since_poll += dt;
        self.since_snapshot += dt;
        if self.since_poll >= self.poll_interval {
            self.since_poll = 0.0;
            return true;
        }
        false
    }

    pub fn snapshot_applied(&mut self) {
        self.since_snapshot = 0.0;
    }

    pub fn fraction(&self) -> f32 {
        interpolation_fraction(self.since_snapshot, self.poll_interval)
    }
}

impl Default for SyncClock {
    fn default() -> Self {
        Self::new(constants::timing::DEFAULT_POLL_INTERVAL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_requests_poll_once_per_interval() {
        let mut clock = SyncClock::new(0.5);
        let due: Vec<bool> = (0..8).map(|_| clock.tick(0.125)).collect();
        assert_eq!(due.iter().filter(|&&d| d).count(), 2);
        assert!(due[3] && due[7]);
    }

    #[test]
    fn fraction_restarts_on_applied_snapshot() {
        let mut clock = SyncClock::new(0.5);
        assert_eq!(clock.fraction(), 1.0);
        clock.snapshot_applied();
        assert_eq!(clock.fraction(), 0.0);
        clock.tick(0.25);
        assert!((clock.fraction() - 0.5).abs() < 1e-6);
        clock.tick(10.0);
        assert_eq!(clock.fraction(), 1.0);
    }
}
