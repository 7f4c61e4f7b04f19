use bevy::prelude::*;
use constants::{camera, endpoints, models, render_settings, timing};
use serde::{Deserialize, Serialize};

use crate::client::snapshot::EntityCategory;

/// Colour parameters of one surface, as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            ambient: [0.2; 3],
            diffuse: [0.8; 3],
            specular: render_settings::DEFAULT_SPECULAR,
            shininess: render_settings::DEFAULT_SHININESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalColours {
    pub on: MaterialParams,
    pub off: MaterialParams,
}

impl Default for SignalColours {
    fn default() -> Self {
        use render_settings::*;
        Self {
            on: MaterialParams {
                ambient: LIGHT_ON_AMBIENT,
                diffuse: LIGHT_ON_DIFFUSE,
                specular: LIGHT_SPECULAR,
                shininess: LIGHT_SHININESS,
            },
            off: MaterialParams {
                ambient: LIGHT_OFF_AMBIENT,
                diffuse: LIGHT_OFF_DIFFUSE,
                specular: LIGHT_SPECULAR,
                shininess: LIGHT_SHININESS,
            },
        }
    }
}

/// How one entity category is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStyle {
    /// Visual variants; one is picked per entity.
    pub models: Vec<String>,
    pub brightness: f32,
    pub scale: [f32; 3],
    /// Added to the reported height.
    pub y_offset: f32,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            brightness: 1.0,
            scale: [1.0; 3],
            y_offset: 0.0,
        }
    }
}

impl CategoryStyle {
    fn with_models(models: &[&str]) -> Self {
        Self {
            models: models.iter().map(|name| name.to_string()).collect(),
            ..default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightConfig {
    pub position: [f32; 3],
    pub colour: [f32; 3],
    pub intensity: f32,
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self {
            position: render_settings::DEFAULT_SUN_POSITION,
            colour: render_settings::DEFAULT_SUN_COLOUR,
            intensity: render_settings::DEFAULT_SUN_INTENSITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_colour: [f32; 3],
    pub ambient_intensity: f32,
    pub point_lights: Vec<PointLightConfig>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_colour: render_settings::DEFAULT_AMBIENT_COLOUR,
            ambient_intensity: render_settings::DEFAULT_AMBIENT_INTENSITY,
            point_lights: vec![PointLightConfig::default()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: [f32; 3],
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: camera::DEFAULT_DISTANCE,
            azimuth: camera::DEFAULT_AZIMUTH,
            elevation: camera::DEFAULT_ELEVATION,
            target: camera::DEFAULT_TARGET,
            fov_degrees: camera::DEFAULT_FOV_DEGREES,
        }
    }
}

/// Session configuration, loaded from `assets/config/scene.json`.
///
/// Every field has a default, so a partial file is valid.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub server_url: String,
    pub request_timeout_secs: f32,
    pub initial_agents: u32,
    pub poll_interval_secs: f32,
    pub bootstrap_retry_secs: f32,
    /// Fixed seed for cosmetic variant choice. Absent means entropy.
    pub rng_seed: Option<u64>,
    pub assets_root: String,
    pub models_dir: String,
    pub cars: CategoryStyle,
    pub obstacles: CategoryStyle,
    pub traffic_lights: CategoryStyle,
    pub roads: CategoryStyle,
    pub destinations: CategoryStyle,
    pub traffic_light_colors: SignalColours,
    pub lighting: LightingConfig,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            server_url: endpoints::DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: timing::REQUEST_TIMEOUT_SECS,
            initial_agents: 5,
            poll_interval_secs: timing::DEFAULT_POLL_INTERVAL_SECS,
            bootstrap_retry_secs: timing::BOOTSTRAP_RETRY_SECS,
            rng_seed: None,
            assets_root: models::DEFAULT_ASSETS_ROOT.to_string(),
            models_dir: models::DEFAULT_MODELS_DIR.to_string(),
            cars: CategoryStyle::with_models(models::CAR_MODELS),
            obstacles: CategoryStyle::with_models(models::OBSTACLE_MODELS),
            traffic_lights: CategoryStyle::with_models(&[models::TRAFFIC_LIGHT_MODEL]),
            roads: CategoryStyle::with_models(&[models::ROAD_MODEL]),
            destinations: CategoryStyle::with_models(&[models::DESTINATION_MODEL]),
            traffic_light_colors: SignalColours::default(),
            lighting: LightingConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn style(&self, category: EntityCategory) -> &CategoryStyle {
        match category {
            EntityCategory::Car => &self.cars,
            EntityCategory::TrafficLight => &self.traffic_lights,
            EntityCategory::Obstacle => &self.obstacles,
            EntityCategory::Road => &self.roads,
            EntityCategory::Destination => &self.destinations,
        }
    }

    /// Poll interval, floored so a zero or negative value cannot spin the poller.
    pub fn poll_interval(&self) -> f32 {
        self.poll_interval_secs.max(0.05)
    }
}
