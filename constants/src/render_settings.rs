/// Upper bound on point lights uploaded to the shader; must match `MAX_POINT_LIGHTS` in phong.wgsl.
pub const MAX_POINT_LIGHTS: usize = 8;

/// Vertex colour used when a face has no active material.
pub const NEUTRAL_GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Flat colour of the fallback primitive.
pub const FALLBACK_COLOUR: [f32; 3] = [0.8, 0.2, 0.8];

pub const DEFAULT_AMBIENT_COLOUR: [f32; 3] = [1.0, 1.0, 1.0];
pub const DEFAULT_AMBIENT_INTENSITY: f32 = 0.25;

pub const DEFAULT_SUN_POSITION: [f32; 3] = [12.0, 40.0, 12.0];
pub const DEFAULT_SUN_COLOUR: [f32; 3] = [1.0, 0.96, 0.9];
pub const DEFAULT_SUN_INTENSITY: f32 = 1.0;

pub const DEFAULT_SPECULAR: [f32; 3] = [0.3, 0.3, 0.3];
pub const DEFAULT_SHININESS: f32 = 32.0;

// Traffic light signal colours
pub const LIGHT_ON_AMBIENT: [f32; 3] = [0.0, 0.6, 0.0];
pub const LIGHT_ON_DIFFUSE: [f32; 3] = [0.1, 1.0, 0.1];
pub const LIGHT_OFF_AMBIENT: [f32; 3] = [0.6, 0.0, 0.0];
pub const LIGHT_OFF_DIFFUSE: [f32; 3] = [1.0, 0.1, 0.1];
pub const LIGHT_SPECULAR: [f32; 3] = [0.8, 0.8, 0.8];
pub const LIGHT_SHININESS: f32 = 64.0;

pub const CLEAR_COLOUR: [f32; 3] = [0.55, 0.7, 0.85];
