// Host-side tests for glTF import, placement and clip startup.

mod common;

use diorama_core::model::{import_gltf, load_model, scatter_models, Scatter};
use diorama_core::scene::Geometry;
use diorama_core::{DioramaError, ModelRegistry, ModelSpec, NodeId, Scene};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn find(scene: &Scene, root: NodeId, name: &str) -> NodeId {
    scene
        .subtree(root)
        .into_iter()
        .find(|&id| scene.node(id).name == name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}

#[test]
fn import_builds_nodes_and_clips() {
    let mut scene = Scene::new();
    let model = import_gltf(&mut scene, "whale.glb", &common::triangle_glb()).expect("import");
    assert_eq!(scene.node(model.root).name, "whale.glb");
    assert_eq!(model.clips.len(), 1);
    assert_eq!(model.clips[0].name, "swim");
    assert_eq!(model.clips[0].duration, 1.0);

    let fin = find(&scene, model.root, "fin");
    let mesh_node = scene.node(fin).children()[0];
    let drawable = scene.node(mesh_node).drawable.as_ref().expect("primitive drawable");
    let Geometry::Triangles(mesh) = scene.geometry(drawable.geometry) else {
        panic!("triangles");
    };
    assert_eq!(mesh.positions.len(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    // no NORMAL attribute: computed from the face, which points at +Z
    assert!(mesh.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-5));
    assert!(drawable.material.lit);
    assert_eq!(drawable.material.opacity, 1.0);
}

#[test]
fn import_rejects_garbage() {
    let mut scene = Scene::new();
    let err = import_gltf(&mut scene, "bad", b"not a model").unwrap_err();
    assert!(matches!(err, DioramaError::Gltf(_)));
}

#[test]
fn import_rejects_out_of_range_indices() {
    let mut scene = Scene::new();
    let err = import_gltf(&mut scene, "bad.glb", &common::triangle_glb_with_indices([0, 1, 7]))
        .unwrap_err();
    assert!(matches!(
        err,
        DioramaError::IndexOutOfRange { index: 7, vertices: 3, .. }
    ));
}

#[test]
fn load_model_places_and_starts_clips() {
    let mut scene = Scene::new();
    let mut registry = ModelRegistry::new();
    let spec = ModelSpec {
        path: "whale.glb".into(),
        animations: vec!["swim".into(), "breach".into()],
        scale: 2.0,
        rotation: Vec3::new(0.0, 1.0, 0.0),
        position: Some(Vec3::new(5.0, 0.0, -3.0)),
        register: true,
        scatter: None,
    };
    let root = load_model(&mut scene, &mut registry, &common::triangle_glb(), &spec).expect("load");

    let t = &scene.node(root).transform;
    assert_eq!(t.translation, Vec3::new(5.0, 0.0, -3.0));
    assert_eq!(t.scale, Vec3::splat(2.0));
    assert_eq!(registry.models, vec![root]);
    assert_eq!(registry.mixers.len(), 1);
    // the unknown clip is skipped, the known one plays
    assert_eq!(registry.mixers[0].playing_count(), 1);

    registry.update(0.5, &mut scene);
    let fin = find(&scene, root, "fin");
    assert!((scene.node(fin).transform.translation - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn unregistered_models_still_animate() {
    let mut scene = Scene::new();
    let mut registry = ModelRegistry::new();
    let spec = ModelSpec {
        path: "reef.glb".into(),
        ..Default::default()
    };
    let root = load_model(&mut scene, &mut registry, &common::triangle_glb(), &spec).expect("load");
    assert!(registry.models.is_empty());
    assert_eq!(registry.mixers.len(), 1);
    assert_eq!(registry.mixers[0].playing_count(), 0);
    // without a position the root stays where the file put it
    assert_eq!(scene.node(root).transform.translation, Vec3::ZERO);
}

#[test]
fn scatter_places_copies_inside_the_box() {
    let mut scene = Scene::new();
    let mut registry = ModelRegistry::new();
    let scatter = Scatter {
        count: 4,
        min: Vec3::new(-10.0, 0.0, -10.0),
        max: Vec3::new(10.0, 2.0, 10.0),
        random_yaw: true,
    };
    let spec = ModelSpec {
        path: "fish.glb".into(),
        animations: vec!["swim".into()],
        register: true,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let roots = scatter_models(
        &mut scene,
        &mut registry,
        &common::triangle_glb(),
        &spec,
        &scatter,
        &mut rng,
    )
    .expect("scatter");

    assert_eq!(roots.len(), 4);
    assert_eq!(registry.models, roots);
    assert_eq!(registry.mixers.len(), 4);
    for &root in &roots {
        let p = scene.node(root).transform.translation;
        assert!((-10.0..10.0).contains(&p.x) && (0.0..2.0).contains(&p.y));
        assert!((-10.0..10.0).contains(&p.z));
    }
    let first = scene.node(roots[0]).transform.translation;
    assert!(roots[1..]
        .iter()
        .any(|&r| scene.node(r).transform.translation != first));
}

#[test]
fn model_spec_defaults_from_json() {
    let spec: ModelSpec = serde_json::from_str(r#"{ "path": "a.glb" }"#).expect("spec");
    assert_eq!(spec.scale, 1.0);
    assert!(spec.animations.is_empty());
    assert!(spec.position.is_none());
    assert!(!spec.register);
}
