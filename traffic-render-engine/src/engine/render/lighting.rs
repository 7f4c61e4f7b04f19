use bevy::prelude::*;
use constants::render_settings::MAX_POINT_LIGHTS;

use super::material::{PointLightUniform, SceneLightingUniform};
use crate::engine::assets::scene_config::LightingConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct ScenePointLight {
    pub position: Vec3,
    pub colour: Vec3,
    pub intensity: f32,
}

/// Ambient light plus up to [`MAX_POINT_LIGHTS`] point lights.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SceneLighting {
    pub ambient_colour: Vec3,
    pub ambient_intensity: f32,
    lights: Vec<ScenePointLight>,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self::from_config(&LightingConfig::default())
    }
}

impl SceneLighting {
    pub fn from_config(config: &LightingConfig) -> Self {
        if config.point_lights.len() > MAX_POINT_LIGHTS {
            warn!(
                "{} point lights configured, only the first {} are used",
                config.point_lights.len(),
                MAX_POINT_LIGHTS
            );
        }
        Self {
            ambient_colour: Vec3::from_array(config.ambient_colour),
            ambient_intensity: config.ambient_intensity,
            lights: config
                .point_lights
                .iter()
                .take(MAX_POINT_LIGHTS)
                .map(|light| ScenePointLight {
                    position: Vec3::from_array(light.position),
                    colour: Vec3::from_array(light.colour),
                    intensity: light.intensity,
                })
                .collect(),
        }
    }

    pub fn lights(&self) -> &[ScenePointLight] {
        &self.lights
    }

    pub fn uniform(&self) -> SceneLightingUniform {
        let mut uniform = SceneLightingUniform {
            ambient: (self.ambient_colour * self.ambient_intensity).extend(1.0),
            ..default()
        };
        for (slot, light) in uniform.lights.iter_mut().zip(&self.lights) {
            *slot = PointLightUniform {
                position: light.position.extend(1.0),
                colour: light.colour.extend(light.intensity),
            };
        }
        uniform.light_count = self.lights.len() as u32;
        uniform
    }
}
