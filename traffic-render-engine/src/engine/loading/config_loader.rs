use bevy::asset::LoadState;
use bevy::asset::io::file::FileAssetReader;
use bevy::prelude::*;
use constants::models::SCENE_CONFIG_PATH;
use std::sync::Arc;

use crate::client::backend::{HttpBackend, SimulationBackend};
use crate::client::poller::SimulationLink;
use crate::client::snapshot::SimulationMetrics;
use crate::engine::assets::cache::AssetCache;
use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::assets::source::FsAssetSource;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::SessionProgress;
use crate::engine::render::lighting::SceneLighting;
use crate::engine::scene::scene_graph::SceneGraph;
use crate::engine::scene::variants::VariantPicker;
use crate::engine::sync::reconcile::{StaticLayers, SyncClock};

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<SceneConfig>>,
}

pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    config_loader.handle = Some(asset_server.load(SCENE_CONFIG_PATH));
}

/// Wait for the scene config, falling back to defaults if it cannot be loaded.
pub fn load_config_system(
    mut commands: Commands,
    mut progress: ResMut<SessionProgress>,
    config_loader: Res<ConfigLoader>,
    configs: Res<Assets<SceneConfig>>,
    asset_server: Res<AssetServer>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if progress.config_loaded {
        return;
    }
    let Some(handle) = &config_loader.handle else {
        return;
    };

    let config = if let Some(config) = configs.get(handle) {
        info!("✓ Scene config loaded");
        config.clone()
    } else if matches!(asset_server.get_load_state(handle), Some(LoadState::Failed(_))) {
        warn!("{} unavailable, using default scene config", SCENE_CONFIG_PATH);
        SceneConfig::default()
    } else {
        return;
    };

    let backend = Arc::new(HttpBackend::new(
        &config.server_url,
        config.request_timeout_secs,
    ));
    info!("Simulation server: {}", backend.base_url());
    insert_session_resources(&mut commands, &config, backend);
    commands.insert_resource(config);

    progress.config_loaded = true;
    info!("→ Transitioning to Connecting state");
    next_state.set(AppState::Connecting);
}

/// Install everything a session needs, built from `config`.
pub fn insert_session_resources(
    commands: &mut Commands,
    config: &SceneConfig,
    backend: Arc<dyn SimulationBackend>,
) {
    let assets_root = FileAssetReader::get_base_path().join(&config.assets_root);
    let source = Arc::new(FsAssetSource::new(assets_root));

    commands.insert_resource(AssetCache::new(source, &config.models_dir));
    commands.insert_resource(SimulationLink::new(backend));
    commands.insert_resource(VariantPicker::new(config.rng_seed));
    commands.insert_resource(SceneLighting::from_config(&config.lighting));
    commands.insert_resource(SyncClock::new(config.poll_interval()));
    commands.insert_resource(SceneGraph::new(OrbitCamera::from_config(&config.camera)));
    commands.insert_resource(StaticLayers::default());
    commands.insert_resource(SimulationMetrics::default());
}
