use bevy::prelude::*;
use std::fmt;
use std::sync::Arc;

use crate::client::snapshot::EntityCategory;
use crate::engine::assets::cache::CachedAsset;
use crate::engine::assets::mtl::MaterialDescription;
use crate::engine::assets::scene_config::MaterialParams;
use crate::engine::sync::motion::{CarMotion, LightSignal};

/// Identity of a scene object: unique among objects of its category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub category: EntityCategory,
    pub id: String,
}

impl ObjectKey {
    pub fn new(category: EntityCategory, id: impl Into<String>) -> Self {
        Self {
            category,
            id: id.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category.label(), self.id)
    }
}

/// Position, Euler rotation (radians) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl ObjectTransform {
    /// Rotation applied X first, then Y, then Z.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_z(self.rotation.z)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_x(self.rotation.x)
    }

    /// `T * Rz * Ry * Rx * S`: scale, rotate X, Y, Z, then translate.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_scale(self.scale)
    }

    pub fn to_bevy(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.orientation(),
            scale: self.scale,
        }
    }
}

/// Per-instance surface parameters, overriding the shared mesh colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    /// Take the base colour from mesh vertex colours instead of `diffuse`.
    pub use_vertex_colour: bool,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self::from_params(&MaterialParams::default(), true)
    }
}

impl SurfaceMaterial {
    pub fn from_params(params: &MaterialParams, use_vertex_colour: bool) -> Self {
        Self {
            ambient: Vec3::from_array(params.ambient),
            diffuse: Vec3::from_array(params.diffuse),
            specular: Vec3::from_array(params.specular),
            shininess: params.shininess,
            use_vertex_colour,
        }
    }

    /// Vertex-coloured surface taking its specular response from the model's material.
    pub fn for_asset(asset: &CachedAsset) -> Self {
        let mut surface = Self::default();
        if let Some(MaterialDescription {
            ambient,
            specular,
            shininess,
            ..
        }) = asset.primary_material()
        {
            surface.ambient = Vec3::from_array(*ambient);
            surface.specular = Vec3::from_array(*specular);
            surface.shininess = *shininess;
        }
        surface
    }

    /// Blend between two surfaces. Exact at both ends; the colour source switches at `t = 1`.
    pub fn lerp(&self, other: &SurfaceMaterial, t: f32) -> SurfaceMaterial {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }
        SurfaceMaterial {
            ambient: self.ambient.lerp(other.ambient, t),
            diffuse: self.diffuse.lerp(other.diffuse, t),
            specular: self.specular.lerp(other.specular, t),
            shininess: self.shininess * (1.0 - t) + other.shininess * t,
            use_vertex_colour: self.use_vertex_colour,
        }
    }
}

/// Kind-specific state carried by a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Static,
    Car(CarMotion),
    TrafficLight(LightSignal),
}

/// A drawable unit of the scene.
///
/// `transform` is the rendered state. For cars it is rewritten every frame
/// from the motion buffer and never read back by reconciliation.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub key: ObjectKey,
    pub transform: ObjectTransform,
    pub asset: Arc<CachedAsset>,
    pub surface: SurfaceMaterial,
    pub kind: ObjectKind,
    /// Added to every reported height.
    pub y_offset: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn world_matrix_scales_before_rotating() {
        let transform = ObjectTransform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
            scale: Vec3::new(2.0, 1.0, 1.0),
        };
        // Scaled to (2,0,0), yawed a quarter turn to (0,0,-2), then translated.
        let point = transform.world_matrix().transform_point3(Vec3::X);
        assert!(point.abs_diff_eq(Vec3::new(10.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        let transform = ObjectTransform {
            rotation: Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0),
            ..default()
        };
        // X turns +Y into +Z; Y then turns +Z into +X.
        let point = transform.world_matrix().transform_point3(Vec3::Y);
        assert!(point.abs_diff_eq(Vec3::X, 1e-5));
        let bevy = transform.to_bevy().transform_point(Vec3::Y);
        assert!(bevy.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn surface_lerp_ends_on_target() {
        let a = SurfaceMaterial::from_params(&MaterialParams::default(), false);
        let b = SurfaceMaterial {
            diffuse: Vec3::new(1.0, 0.0, 0.0),
            ..a
        };
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 3.0), b);
    }
}
