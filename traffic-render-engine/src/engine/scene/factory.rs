use bevy::prelude::*;
use std::sync::Arc;

use super::entity::{ObjectKey, ObjectKind, ObjectTransform, SceneObject, SurfaceMaterial};
use super::variants::VariantPicker;
use crate::client::snapshot::{EntityCategory, SnapshotRecord};
use crate::engine::assets::cache::{AssetCache, CachedAsset};
use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::sync::motion::{CarMotion, LightSignal};

/// Builds scene objects from snapshot records.
///
/// Borrows the asset cache and variant picker for the duration of one
/// reconciliation pass.
pub struct ObjectFactory<'a> {
    pub cache: &'a mut AssetCache,
    pub picker: &'a mut VariantPicker,
    pub config: &'a SceneConfig,
}

impl<'a> ObjectFactory<'a> {
    pub fn new(
        cache: &'a mut AssetCache,
        picker: &'a mut VariantPicker,
        config: &'a SceneConfig,
    ) -> Self {
        Self {
            cache,
            picker,
            config,
        }
    }

    fn asset_for(&mut self, category: EntityCategory) -> Arc<CachedAsset> {
        let style = self.config.style(category);
        match self.picker.pick(&style.models) {
            Some(model) => self.cache.load_or_fallback(model, style.brightness),
            None => {
                warn!("No models configured for {}", category.label());
                self.cache.fallback()
            }
        }
    }

    /// Reported position lifted by the category's height offset.
    pub fn placed(&self, category: EntityCategory, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.config.style(category).y_offset
    }

    pub fn create(&mut self, category: EntityCategory, record: &SnapshotRecord) -> SceneObject {
        let asset = self.asset_for(category);
        let style = self.config.style(category);
        let y_offset = style.y_offset;
        let position = self.placed(category, record.position);
        let heading_yaw = record.heading.map(|heading| heading.yaw());

        let mut transform = ObjectTransform {
            position,
            scale: Vec3::from_array(style.scale),
            ..default()
        };
        let mut surface = SurfaceMaterial::for_asset(&asset);

        let kind = match category {
            EntityCategory::Car => {
                let lookahead = record.lookahead.map(|ahead| self.placed(category, ahead));
                let motion = CarMotion::new(position, heading_yaw, lookahead);
                transform.rotation.y = motion.target_yaw;
                ObjectKind::Car(motion)
            }
            EntityCategory::TrafficLight => {
                let colours = &self.config.traffic_light_colors;
                let signal = LightSignal::new(
                    record.state,
                    SurfaceMaterial::from_params(&colours.on, false),
                    SurfaceMaterial::from_params(&colours.off, false),
                );
                surface = signal.surface_for(record.state);
                ObjectKind::TrafficLight(signal)
            }
            EntityCategory::Road => {
                transform.rotation.y = heading_yaw.unwrap_or(0.0);
                ObjectKind::Static
            }
            EntityCategory::Obstacle | EntityCategory::Destination => ObjectKind::Static,
        };

        SceneObject {
            key: ObjectKey::new(category, record.id.clone()),
            transform,
            asset,
            surface,
            kind,
            y_offset,
        }
    }
}
