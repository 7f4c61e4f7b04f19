use bevy::prelude::*;
use std::collections::HashMap;

use super::lighting::SceneLighting;
use super::material::{PhongMaterial, PhongSurfaceUniform};
use crate::engine::assets::cache::AssetKey;
use crate::engine::scene::entity::ObjectKey;
use crate::engine::scene::scene_graph::SceneGraph;

/// Marks an entity drawn on behalf of a scene object.
#[derive(Component, Debug, Clone)]
pub struct MirroredObject(pub ObjectKey);

struct MirrorEntry {
    entity: Entity,
    material: Handle<PhongMaterial>,
    surface: PhongSurfaceUniform,
}

/// Bevy-side handles of the scene graph.
///
/// One mesh handle per cached asset key, shared by every entity using it;
/// one material per object since surfaces are per instance.
#[derive(Resource, Default)]
pub struct SceneMirror {
    entries: HashMap<ObjectKey, MirrorEntry>,
    meshes: HashMap<AssetKey, Handle<Mesh>>,
}

impl SceneMirror {
    pub fn entity(&self, key: &ObjectKey) -> Option<Entity> {
        self.entries.get(key).map(|entry| entry.entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn uploaded_meshes(&self) -> usize {
        self.meshes.len()
    }
}

/// Spawn, update and despawn entities so they match the scene graph.
pub fn mirror_scene_graph(
    mut commands: Commands,
    scene: Res<SceneGraph>,
    lighting: Res<SceneLighting>,
    mut mirror: ResMut<SceneMirror>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PhongMaterial>>,
    mut transforms: Query<&mut Transform, With<MirroredObject>>,
) {
    let SceneMirror {
        entries,
        meshes: mesh_handles,
    } = &mut *mirror;

    entries.retain(|key, entry| {
        let keep = scene.contains(key);
        if !keep {
            commands.entity(entry.entity).despawn();
        }
        keep
    });

    let lighting_uniform = lighting.uniform();
    if lighting.is_changed() {
        for entry in entries.values() {
            if let Some(material) = materials.get_mut(&entry.material) {
                material.lighting = lighting_uniform;
            }
        }
    }

    for object in scene.iter() {
        let transform = object.transform.to_bevy();
        let surface = PhongSurfaceUniform::from(&object.surface);

        if let Some(entry) = entries.get_mut(&object.key) {
            if let Ok(mut current) = transforms.get_mut(entry.entity) {
                if *current != transform {
                    *current = transform;
                }
            }
            if entry.surface != surface {
                if let Some(material) = materials.get_mut(&entry.material) {
                    material.surface = surface;
                }
                entry.surface = surface;
            }
            continue;
        }

        let mesh = mesh_handles
            .entry(object.asset.key().clone())
            .or_insert_with(|| meshes.add(object.asset.to_mesh()))
            .clone();
        let material = materials.add(PhongMaterial {
            surface,
            lighting: lighting_uniform,
        });
        let entity = commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                transform,
                Name::new(object.key.to_string()),
                MirroredObject(object.key.clone()),
            ))
            .id();
        entries.insert(
            object.key.clone(),
            MirrorEntry {
                entity,
                material,
                surface,
            },
        );
    }
}
