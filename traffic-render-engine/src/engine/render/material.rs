use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use constants::models::PHONG_SHADER_PATH;
use constants::render_settings::MAX_POINT_LIGHTS;

use crate::engine::scene::entity::SurfaceMaterial;

/// Per-object surface block. Layout matches `PhongSurface` in phong.wgsl.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct PhongSurfaceUniform {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
    /// Non-zero selects the mesh vertex colour as base colour.
    pub use_vertex_colour: u32,
}

impl From<&SurfaceMaterial> for PhongSurfaceUniform {
    fn from(surface: &SurfaceMaterial) -> Self {
        Self {
            ambient: surface.ambient.extend(1.0),
            diffuse: surface.diffuse.extend(1.0),
            specular: surface.specular.extend(1.0),
            shininess: surface.shininess.max(1.0),
            use_vertex_colour: surface.use_vertex_colour as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, ShaderType)]
pub struct PointLightUniform {
    /// World position in xyz.
    pub position: Vec4,
    /// Linear colour in rgb, intensity in w.
    pub colour: Vec4,
}

/// Scene-wide lighting block. Layout matches `SceneLighting` in phong.wgsl.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct SceneLightingUniform {
    /// Ambient colour premultiplied by intensity.
    pub ambient: Vec4,
    pub lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub light_count: u32,
}

impl Default for SceneLightingUniform {
    fn default() -> Self {
        Self {
            ambient: Vec4::ZERO,
            lights: [PointLightUniform::default(); MAX_POINT_LIGHTS],
            light_count: 0,
        }
    }
}

/// Ambient + Lambert + Blinn-Phong material used for every scene object.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct PhongMaterial {
    #[uniform(0)]
    pub surface: PhongSurfaceUniform,

    #[uniform(1)]
    pub lighting: SceneLightingUniform,
}

impl Material for PhongMaterial {
    fn fragment_shader() -> ShaderRef {
        PHONG_SHADER_PATH.into()
    }
}
