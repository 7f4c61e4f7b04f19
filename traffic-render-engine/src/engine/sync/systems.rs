use bevy::prelude::*;

use super::reconcile::{
    StaticLayers, SyncClock, apply_interpolation, apply_snapshot, hold_category,
};
use crate::client::poller::{LinkMessage, SimulationLink};
use crate::client::snapshot::{EntityCategory, SimulationMetrics, Snapshot};
use crate::engine::assets::cache::AssetCache;
use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::SessionProgress;
use crate::engine::scene::factory::ObjectFactory;
use crate::engine::scene::scene_graph::SceneGraph;
use crate::engine::scene::variants::VariantPicker;

/// Accumulate frame time and request the next poll when the interval elapses.
pub fn tick_sync_clock(
    time: Res<Time>,
    mut clock: ResMut<SyncClock>,
    mut link: ResMut<SimulationLink>,
) {
    if clock.tick(time.delta_secs()) {
        let sequence = link.request_poll();
        debug!("Poll {} requested ({} in flight)", sequence, link.in_flight());
    }
}

/// Apply every finished request. Stale poll results are discarded.
#[allow(clippy::too_many_arguments)]
pub fn receive_simulation_updates(
    mut link: ResMut<SimulationLink>,
    mut scene: ResMut<SceneGraph>,
    mut cache: ResMut<AssetCache>,
    mut picker: ResMut<VariantPicker>,
    mut layers: ResMut<StaticLayers>,
    mut clock: ResMut<SyncClock>,
    mut metrics: ResMut<SimulationMetrics>,
    mut progress: ResMut<SessionProgress>,
    config: Res<SceneConfig>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for message in link.drain() {
        let mut factory = ObjectFactory::new(&mut cache, &mut picker, &config);
        match message {
            LinkMessage::Bootstrap(outcome) => {
                progress.bootstrap_pending = false;
                if *state.get() != AppState::Connecting {
                    debug!("Ignoring late bootstrap {}", outcome.sequence);
                    continue;
                }
                if !outcome.initialised {
                    progress.retry_in = config.bootstrap_retry_secs;
                    warn!(
                        "Simulation not reachable at {}, retrying in {}s",
                        config.server_url, config.bootstrap_retry_secs
                    );
                    continue;
                }
                if !link.accept(outcome.sequence) {
                    continue;
                }

                for snapshot in &outcome.statics {
                    apply_snapshot(&mut scene, snapshot, &mut factory, &mut layers);
                }
                let dynamic: Vec<Snapshot> =
                    outcome.cars.into_iter().chain(outcome.lights).collect();
                apply_dynamic(&mut scene, &dynamic, &mut factory, &mut layers, &mut clock);
                if let Some(latest) = outcome.metrics {
                    *metrics = latest;
                }

                progress.static_layers = layers.loaded_count();
                info!(
                    "Connected: {} objects in scene after {} attempt(s)",
                    scene.len(),
                    progress.bootstrap_attempts
                );
                next_state.set(AppState::Running);
            }
            LinkMessage::Poll(outcome) => {
                if !link.accept(outcome.sequence) {
                    continue;
                }
                let step = outcome.step;
                let latest = outcome.metrics.clone();
                let dynamic: Vec<Snapshot> = outcome.dynamic_snapshots().collect();
                apply_dynamic(&mut scene, &dynamic, &mut factory, &mut layers, &mut clock);
                if let Some(latest) = latest {
                    *metrics = latest;
                }
                if let Some(step) = step {
                    metrics.current_step = step;
                }
            }
        }
    }
}

/// Apply the dynamic snapshots of one response and restart interpolation.
///
/// A dynamic category the response has no snapshot for keeps its last known
/// state: it is held where it is drawn before the clock restarts.
fn apply_dynamic(
    scene: &mut SceneGraph,
    snapshots: &[Snapshot],
    factory: &mut ObjectFactory,
    layers: &mut StaticLayers,
    clock: &mut SyncClock,
) {
    if snapshots.is_empty() {
        return;
    }
    let f = clock.fraction();
    for category in EntityCategory::DYNAMIC {
        if !snapshots.iter().any(|snapshot| snapshot.category == category) {
            debug!("No {} snapshot this poll, holding", category.label());
            hold_category(scene, category, f);
        }
    }
    for snapshot in snapshots {
        apply_snapshot(scene, snapshot, factory, layers);
    }
    clock.snapshot_applied();
}

/// Write interpolated render state for the current frame.
pub fn interpolate_scene(clock: Res<SyncClock>, mut scene: ResMut<SceneGraph>) {
    apply_interpolation(&mut scene, clock.fraction());
}
