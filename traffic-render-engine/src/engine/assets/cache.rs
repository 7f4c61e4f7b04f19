use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, MeshVertexAttribute, PrimitiveTopology, VertexAttributeValues};
use constants::models::FALLBACK_MODEL;
use constants::render_settings::{FALLBACK_COLOUR, NEUTRAL_GRAY};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::AssetError;
use super::mtl::{MaterialDescription, parse_materials};
use super::obj::parse_mesh;
use super::source::AssetSource;

/// Cache key: model name plus brightness multiplier.
///
/// Brightness is keyed by its bit pattern so the key can be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub name: String,
    brightness_bits: u32,
}

impl AssetKey {
    pub fn new(name: impl Into<String>, brightness: f32) -> Self {
        Self {
            name: name.into(),
            brightness_bits: brightness.to_bits(),
        }
    }

    pub fn brightness(&self) -> f32 {
        f32::from_bits(self.brightness_bits)
    }
}

/// Immutable vertex stream for one `(name, brightness)` pair.
///
/// Faces are fully expanded, three vertices per triangle, so consecutive
/// material ranges can carry different vertex colours.
#[derive(Debug)]
pub struct CachedAsset {
    key: AssetKey,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    colours: Vec<[f32; 4]>,
    primary_material: Option<MaterialDescription>,
}

impl CachedAsset {
    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn colours(&self) -> &[[f32; 4]] {
        &self.colours
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// First material referenced by the mesh, if its library resolved.
    pub fn primary_material(&self) -> Option<&MaterialDescription> {
        self.primary_material.as_ref()
    }

    pub fn is_fallback(&self) -> bool {
        self.key.name == FALLBACK_MODEL
    }

    /// Upload-ready Bevy mesh. Non-indexed triangle list.
    pub fn to_mesh(&self) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, self.colours.clone())
    }

    /// Unit cube centred on the origin, flat-coloured.
    pub fn unit_cube(key: AssetKey, colour: [f32; 3]) -> Self {
        let cube = Mesh::from(Cuboid::new(1.0, 1.0, 1.0));
        let positions = attribute_f32x3(&cube, Mesh::ATTRIBUTE_POSITION);
        let normals = attribute_f32x3(&cube, Mesh::ATTRIBUTE_NORMAL);
        let uvs = match cube.attribute(Mesh::ATTRIBUTE_UV_0) {
            Some(VertexAttributeValues::Float32x2(values)) => values.clone(),
            _ => vec![[0.0; 2]; positions.len()],
        };

        // Expand the shared-vertex cube into the same flat layout as loaded models.
        let order: Vec<usize> = match cube.indices() {
            Some(Indices::U16(indices)) => indices.iter().map(|&i| i as usize).collect(),
            Some(Indices::U32(indices)) => indices.iter().map(|&i| i as usize).collect(),
            None => (0..positions.len()).collect(),
        };

        let colour = [colour[0], colour[1], colour[2], 1.0];
        Self {
            key,
            positions: order.iter().map(|&i| positions[i]).collect(),
            normals: order.iter().map(|&i| normals[i]).collect(),
            uvs: order.iter().map(|&i| uvs[i]).collect(),
            colours: vec![colour; order.len()],
            primary_material: None,
        }
    }
}

fn attribute_f32x3(
    mesh: &Mesh,
    attribute: MeshVertexAttribute,
) -> Vec<[f32; 3]> {
    match mesh.attribute(attribute) {
        Some(VertexAttributeValues::Float32x3(values)) => values.clone(),
        _ => Vec::new(),
    }
}

/// Vertex colour for a face using `material` at `brightness`.
pub fn vertex_colour(material: Option<&MaterialDescription>, brightness: f32) -> [f32; 4] {
    match material {
        Some(material) => {
            let channel = |c: f32| (c * brightness).min(1.0);
            [
                channel(material.diffuse[0]),
                channel(material.diffuse[1]),
                channel(material.diffuse[2]),
                1.0,
            ]
        }
        None => NEUTRAL_GRAY,
    }
}

/// Memoising loader for model meshes.
///
/// Entries are never replaced once inserted, so a handed-out `Arc` stays valid
/// and equal to every later lookup of the same key. Failed keys are remembered
/// and reported only once.
#[derive(Resource)]
pub struct AssetCache {
    source: Arc<dyn AssetSource>,
    models_dir: PathBuf,
    entries: HashMap<AssetKey, Arc<CachedAsset>>,
    failed: HashSet<AssetKey>,
    fallback: Option<Arc<CachedAsset>>,
}

impl AssetCache {
    pub fn new(source: Arc<dyn AssetSource>, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            models_dir: models_dir.into(),
            entries: HashMap::new(),
            failed: HashSet::new(),
            fallback: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str, brightness: f32) -> bool {
        self.entries.contains_key(&AssetKey::new(name, brightness))
    }

    /// Load `name` at `brightness`. `None` means the model could not be built.
    pub fn load(&mut self, name: &str, brightness: f32) -> Option<Arc<CachedAsset>> {
        let key = AssetKey::new(name, brightness);
        if let Some(asset) = self.entries.get(&key) {
            return Some(Arc::clone(asset));
        }
        if self.failed.contains(&key) {
            return None;
        }

        match self.build(&key) {
            Ok(asset) => {
                debug!(
                    "Cached model '{}' x{} ({} vertices)",
                    name,
                    brightness,
                    asset.vertex_count()
                );
                let asset = Arc::new(asset);
                self.entries.insert(key, Arc::clone(&asset));
                Some(asset)
            }
            Err(error) => {
                warn!("Model '{}' unavailable, using fallback: {}", name, error);
                self.failed.insert(key);
                None
            }
        }
    }

    /// Load `name`, substituting the built-in cube when it cannot be built.
    pub fn load_or_fallback(&mut self, name: &str, brightness: f32) -> Arc<CachedAsset> {
        match self.load(name, brightness) {
            Some(asset) => asset,
            None => self.fallback(),
        }
    }

    pub fn fallback(&mut self) -> Arc<CachedAsset> {
        Arc::clone(self.fallback.get_or_insert_with(|| {
            Arc::new(CachedAsset::unit_cube(
                AssetKey::new(FALLBACK_MODEL, 1.0),
                FALLBACK_COLOUR,
            ))
        }))
    }

    fn build(&self, key: &AssetKey) -> Result<CachedAsset, AssetError> {
        let mesh_path = self.models_dir.join(format!("{}.obj", key.name));
        let text = self.source.read_to_string(&mesh_path)?;
        let mesh = parse_mesh(&text, &mesh_path)?;
        if mesh.vertex_count() == 0 {
            return Err(AssetError::malformed(&mesh_path, 0, "mesh has no faces"));
        }

        let materials = self.load_libraries(&mesh.material_libraries, &mesh_path);
        let brightness = key.brightness();

        let capacity = mesh.vertex_count();
        let mut asset = CachedAsset {
            key: key.clone(),
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            uvs: Vec::with_capacity(capacity),
            colours: Vec::with_capacity(capacity),
            primary_material: None,
        };

        for group in &mesh.groups {
            let material = group.material.as_ref().and_then(|name| materials.get(name));
            if asset.primary_material.is_none() {
                asset.primary_material = material.copied();
            }
            let colour = vertex_colour(material, brightness);
            for vertex in &group.vertices {
                asset.positions.push(vertex.position);
                asset.normals.push(vertex.normal);
                asset.uvs.push(vertex.uv);
                asset.colours.push(colour);
            }
        }
        Ok(asset)
    }

    /// Material libraries are optional; a missing one leaves faces grey.
    fn load_libraries(
        &self,
        libraries: &[String],
        mesh_path: &Path,
    ) -> HashMap<String, MaterialDescription> {
        let directory = mesh_path.parent().unwrap_or(Path::new(""));
        let mut materials = HashMap::new();
        for library in libraries {
            let path = directory.join(library);
            let parsed = self
                .source
                .read_to_string(&path)
                .and_then(|text| parse_materials(&text, &path));
            match parsed {
                Ok(found) => materials.extend(found),
                Err(error) => warn!("Material library skipped: {}", error),
            }
        }
        materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::source::MemoryAssetSource;

    const TRIANGLE: &str = "mtllib tri.mtl\nv 0 0 0\nv 1 0 0\nv 0 0 1\nusemtl paint\nf 1 2 3\n";
    const PAINT: &str = "newmtl paint\nKd 0.6 0.3 0.1\n";

    fn cache() -> AssetCache {
        let source = MemoryAssetSource::new()
            .with_file("models/tri.obj", TRIANGLE)
            .with_file("models/tri.mtl", PAINT)
            .with_file("models/plain.obj", "v 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 3\n");
        AssetCache::new(Arc::new(source), "models")
    }

    #[test]
    fn brightness_scales_and_clamps_diffuse() {
        let mut cache = cache();
        let dim = cache.load("tri", 1.0).expect("loads");
        let bright = cache.load("tri", 2.0).expect("loads");
        assert_eq!(dim.colours()[0], [0.6, 0.3, 0.1, 1.0]);
        assert_eq!(bright.colours()[0], [1.0, 0.6, 0.2, 1.0]);
    }

    #[test]
    fn faces_without_material_are_neutral_grey() {
        let mut cache = cache();
        let plain = cache.load("plain", 1.0).expect("loads");
        assert!(plain.colours().iter().all(|c| *c == NEUTRAL_GRAY));
        assert!(plain.primary_material().is_none());
    }

    #[test]
    fn missing_model_falls_back_to_cube() {
        let mut cache = cache();
        assert!(cache.load("ghost", 1.0).is_none());
        let fallback = cache.load_or_fallback("ghost", 1.0);
        assert!(fallback.is_fallback());
        assert_eq!(fallback.vertex_count(), 36);
        assert!(Arc::ptr_eq(&fallback, &cache.fallback()));
        assert!(cache.is_empty());
    }

    #[test]
    fn mesh_attributes_line_up() {
        let mut cache = cache();
        let asset = cache.load("tri", 1.0).expect("loads");
        let mesh = asset.to_mesh();
        assert_eq!(mesh.count_vertices(), 3);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
    }
}
