mod common;

use bevy::prelude::*;

use common::*;
use traffic_render_engine::client::snapshot::{EntityCategory, Snapshot};
use traffic_render_engine::engine::assets::cache::AssetCache;
use traffic_render_engine::engine::assets::scene_config::SceneConfig;
use traffic_render_engine::engine::render::lighting::SceneLighting;
use traffic_render_engine::engine::render::material::{PhongMaterial, PhongSurfaceUniform};
use traffic_render_engine::engine::render::mirror::{
    MirroredObject, SceneMirror, mirror_scene_graph,
};
use traffic_render_engine::engine::scene::entity::ObjectKey;
use traffic_render_engine::engine::scene::factory::ObjectFactory;
use traffic_render_engine::engine::scene::scene_graph::SceneGraph;
use traffic_render_engine::engine::scene::variants::VariantPicker;
use traffic_render_engine::engine::sync::reconcile::{StaticLayers, apply_snapshot};

/// Headless app running only the mirror system, fed by a local factory.
struct MirrorRig {
    app: App,
    cache: AssetCache,
    picker: VariantPicker,
    layers: StaticLayers,
    config: SceneConfig,
}

impl MirrorRig {
    fn new() -> Self {
        let config = flat_config();
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<PhongMaterial>()
            .init_resource::<SceneMirror>()
            .insert_resource(SceneLighting::default())
            .insert_resource(SceneGraph::default())
            .add_systems(Update, mirror_scene_graph);
        Self {
            app,
            cache: memory_cache(),
            picker: VariantPicker::new(config.rng_seed),
            layers: StaticLayers::default(),
            config,
        }
    }

    fn apply(&mut self, snapshot: &Snapshot) {
        let mut scene = self.app.world_mut().resource_mut::<SceneGraph>();
        let mut factory = ObjectFactory::new(&mut self.cache, &mut self.picker, &self.config);
        apply_snapshot(&mut scene, snapshot, &mut factory, &mut self.layers);
        drop(scene);
        self.app.update();
    }

    fn mirror(&self) -> &SceneMirror {
        self.app.world().resource::<SceneMirror>()
    }

    fn entity(&self, id: &str) -> Option<Entity> {
        self.mirror().entity(&ObjectKey::new(EntityCategory::Car, id))
    }
}

#[test]
fn objects_with_the_same_asset_share_one_mesh() {
    let mut rig = MirrorRig::new();
    assert!(rig.mirror().is_empty());

    rig.apply(&cars([car("a", 0.0, 0.0), car("b", 3.0, 0.0)]));
    assert_eq!(rig.mirror().len(), 2);
    assert_eq!(rig.mirror().uploaded_meshes(), 1);

    let a = rig.entity("a").expect("a mirrored");
    let b = rig.entity("b").expect("b mirrored");
    let world = rig.app.world();
    assert_eq!(
        world.get::<Mesh3d>(a).expect("mesh").0,
        world.get::<Mesh3d>(b).expect("mesh").0
    );
    let marker = world.get::<MirroredObject>(a).expect("marker");
    assert_eq!(marker.0, ObjectKey::new(EntityCategory::Car, "a"));
    let transform = world.get::<Transform>(b).expect("transform");
    assert!(approx_vec(transform.translation, Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn retired_objects_are_despawned() {
    let mut rig = MirrorRig::new();
    rig.apply(&cars([car("a", 0.0, 0.0), car("b", 3.0, 0.0)]));
    let a = rig.entity("a").expect("a mirrored");

    rig.apply(&cars([car("b", 4.0, 0.0)]));
    assert!(rig.entity("a").is_none());
    assert!(!rig.app.world().entities().contains(a));
    assert_eq!(rig.mirror().len(), 1);
    assert_eq!(rig.mirror().uploaded_meshes(), 1);
}

#[test]
fn surface_changes_reach_the_material() {
    let mut rig = MirrorRig::new();
    rig.apply(&cars([car("a", 0.0, 0.0)]));
    let a = rig.entity("a").expect("a mirrored");

    let surface = {
        let mut scene = rig.app.world_mut().resource_mut::<SceneGraph>();
        let object = scene
            .get_mut(&ObjectKey::new(EntityCategory::Car, "a"))
            .expect("a tracked");
        object.surface.diffuse = Vec3::new(0.9, 0.1, 0.1);
        object.surface.use_vertex_colour = false;
        object.surface
    };
    rig.app.update();

    let world = rig.app.world();
    let handle = &world
        .get::<MeshMaterial3d<PhongMaterial>>(a)
        .expect("material")
        .0;
    let material = world
        .resource::<Assets<PhongMaterial>>()
        .get(handle)
        .expect("material asset");
    assert_eq!(material.surface, PhongSurfaceUniform::from(&surface));
    assert_eq!(material.surface.use_vertex_colour, 0);
}
