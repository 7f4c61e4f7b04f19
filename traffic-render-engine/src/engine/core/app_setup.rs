// Standard library and external crates
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::CLEAR_COLOUR;

// Crate engine modules
use crate::client::snapshot::SimulationMetrics;
use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::camera::orbit_camera::{
    OrbitCameraRig, apply_orbit_camera, orbit_camera_controller,
};
use crate::engine::core::app_state::{AppState, log_state_transitions};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{ConfigLoader, load_config_system, start_loading};
use crate::engine::loading::progress::SessionProgress;
use crate::engine::loading::session::request_bootstrap_system;
use crate::engine::render::SceneRenderPlugin;
use crate::engine::render::lighting::SceneLighting;
use crate::engine::render::mirror::mirror_scene_graph;
use crate::engine::scene::scene_graph::SceneGraph;
use crate::engine::sync::systems::{
    interpolate_scene, receive_simulation_updates, tick_sync_clock,
};
use crate::engine::systems::fps_tracking::{fps_log_system, fps_text_update_system};
// Crate tools modules
use crate::tools::control_panel::ControlPanelPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SceneConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SceneConfig>::new(&["json"]))
        .add_plugins(SceneRenderPlugin)
        .add_plugins(ControlPanelPlugin);

    // Initialise resources early; the session replaces the scene graph and
    // metrics once the config is known.
    app.init_resource::<ConfigLoader>()
        .init_resource::<SessionProgress>()
        .init_resource::<SceneGraph>()
        .init_resource::<SimulationMetrics>()
        .insert_resource(ClearColor(Color::srgb(
            CLEAR_COLOUR[0],
            CLEAR_COLOUR[1],
            CLEAR_COLOUR[2],
        )));

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            load_config_system.run_if(in_state(AppState::LoadingConfig)),
        )
        .add_systems(
            Update,
            request_bootstrap_system.run_if(in_state(AppState::Connecting)),
        );

    // Per-frame order: poll, apply, interpolate, camera, mirror.
    app.add_systems(
        Update,
        (
            tick_sync_clock.run_if(in_state(AppState::Running)),
            receive_simulation_updates.run_if(not(in_state(AppState::LoadingConfig))),
            interpolate_scene.run_if(in_state(AppState::Running)),
            orbit_camera_controller,
            apply_orbit_camera,
            mirror_scene_graph.run_if(resource_exists::<SceneLighting>),
        )
            .chain()
            .after(request_bootstrap_system),
    );

    app.add_systems(
        Update,
        (fps_text_update_system, fps_log_system, log_state_transitions),
    );

    app
}

// Startup system that only spawns the view camera
fn setup(mut commands: Commands, scene: Res<SceneGraph>) {
    let camera = scene.camera();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_degrees().to_radians(),
            ..default()
        }),
        camera.transform(),
        OrbitCameraRig,
        Name::new("OrbitCamera"),
    ));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
