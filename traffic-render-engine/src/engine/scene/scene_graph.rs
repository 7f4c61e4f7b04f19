use bevy::prelude::*;
use std::collections::HashMap;

use super::entity::{ObjectKey, SceneObject};
use crate::client::snapshot::EntityCategory;
use crate::engine::camera::orbit_camera::OrbitCamera;

/// Insertion-ordered set of scene objects plus the active camera.
///
/// Only the render thread mutates it; reconciliation and interpolation both
/// run as systems on the main schedule.
#[derive(Resource, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    index: HashMap<ObjectKey, usize>,
    camera: OrbitCamera,
}

impl SceneGraph {
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            objects: Vec::new(),
            index: HashMap::new(),
            camera,
        }
    }

    /// Append `object` unless its key is already present. Returns whether it was added.
    pub fn add_object(&mut self, object: SceneObject) -> bool {
        if self.index.contains_key(&object.key) {
            return false;
        }
        self.index.insert(object.key.clone(), self.objects.len());
        self.objects.push(object);
        true
    }

    /// Remove by key, keeping the order of the rest.
    pub fn remove_object(&mut self, key: &ObjectKey) -> Option<SceneObject> {
        let slot = self.index.remove(key)?;
        let removed = self.objects.remove(slot);
        for object in &self.objects[slot..] {
            if let Some(position) = self.index.get_mut(&object.key) {
                *position -= 1;
            }
        }
        Some(removed)
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &ObjectKey) -> Option<&SceneObject> {
        self.index.get(key).map(|&slot| &self.objects[slot])
    }

    pub fn get_mut(&mut self, key: &ObjectKey) -> Option<&mut SceneObject> {
        self.index.get(key).map(|&slot| &mut self.objects[slot])
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn keys_in(&self, category: EntityCategory) -> Vec<ObjectKey> {
        self.objects
            .iter()
            .filter(|object| object.key.category == category)
            .map(|object| object.key.clone())
            .collect()
    }

    pub fn count(&self, category: EntityCategory) -> usize {
        self.objects
            .iter()
            .filter(|object| object.key.category == category)
            .count()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Replace the active camera.
    pub fn set_camera(&mut self, camera: OrbitCamera) {
        self.camera = camera;
    }
}
