//! Rendering of the scene graph.
//!
//! Scene objects are mirrored into Bevy entities sharing one mesh per cached
//! asset, each drawn with its own [`material::PhongMaterial`] instance.

/// Scene lighting resource and its uniform packing.
pub mod lighting;

/// Phong material, per-object surface and scene lighting uniforms.
pub mod material;

/// Scene graph to entity synchronisation.
pub mod mirror;

use bevy::prelude::*;

use material::PhongMaterial;
use mirror::SceneMirror;

pub struct SceneRenderPlugin;

impl Plugin for SceneRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<PhongMaterial>::default())
            .init_resource::<SceneMirror>();
    }
}
