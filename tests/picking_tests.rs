// Host-side tests for pointer picking against clickable nodes.

use diorama_core::geometry::box_geometry;
use diorama_core::picking::pick;
use diorama_core::scene::{Material, Node, Transform};
use diorama_core::{Camera, Clickables, NodeId, Ray, Scene};
use glam::{Quat, Vec3};

fn add_box(scene: &mut Scene, clickables: &mut Clickables, transform: Transform) -> NodeId {
    let geo = scene.add_mesh_geometry(box_geometry(2.0, 2.0, 2.0, 1, 1, 1));
    let id = scene.add(Node::mesh("box", geo, Material::basic(0xff0000)).with_transform(transform));
    clickables.push(id);
    id
}

#[test]
fn nearest_clickable_wins() {
    let mut scene = Scene::new();
    let mut clickables = Clickables::new();
    let far = add_box(&mut scene, &mut clickables, Transform::from_translation(Vec3::new(0.0, 0.0, -20.0)));
    let near = add_box(&mut scene, &mut clickables, Transform::from_translation(Vec3::new(0.0, 0.0, -5.0)));

    let hit = pick(&scene, &clickables, &Ray::new(Vec3::ZERO, Vec3::NEG_Z)).expect("hit");
    assert_eq!(hit.node, near);
    assert!((hit.distance - 4.0).abs() < 1e-4);
    assert!((hit.point - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);

    scene.set_visible(near, false);
    let hit = pick(&scene, &clickables, &Ray::new(Vec3::ZERO, Vec3::NEG_Z)).expect("hit");
    assert_eq!(hit.node, far);
}

#[test]
fn only_registered_nodes_are_picked() {
    let mut scene = Scene::new();
    let mut clickables = Clickables::new();
    let id = add_box(&mut scene, &mut clickables, Transform::from_translation(Vec3::new(0.0, 0.0, -5.0)));
    clickables.remove_all(&[id]);
    assert!(pick(&scene, &clickables, &Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
}

#[test]
fn hidden_parent_hides_children_from_picking() {
    let mut scene = Scene::new();
    let mut clickables = Clickables::new();
    let group = scene.add(Node::group("panel"));
    let geo = scene.add_mesh_geometry(box_geometry(1.0, 1.0, 1.0, 1, 1, 1));
    let child = scene.add_child(
        group,
        Node::mesh("close", geo, Material::basic(0xffffff)).at(Vec3::new(0.0, 0.0, -3.0)),
    );
    clickables.push(child);
    let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
    assert!(pick(&scene, &clickables, &ray).is_some());
    scene.set_visible(group, false);
    assert!(pick(&scene, &clickables, &ray).is_none());
}

#[test]
fn scaled_and_rotated_nodes_use_local_bounds() {
    let mut scene = Scene::new();
    let mut clickables = Clickables::new();
    let id = add_box(
        &mut scene,
        &mut clickables,
        Transform {
            translation: Vec3::new(5.0, 0.0, -10.0),
            rotation: Quat::from_rotation_y(0.3),
            scale: Vec3::splat(3.0),
        },
    );
    // box spans roughly x in 2..8 after scaling; a ray at x = 7 still hits
    let hit = pick(&scene, &clickables, &Ray::new(Vec3::new(7.0, 0.0, 0.0), Vec3::NEG_Z));
    assert_eq!(hit.map(|h| h.node), Some(id));
    let miss = pick(&scene, &clickables, &Ray::new(Vec3::new(9.5, 0.0, 0.0), Vec3::NEG_Z));
    assert!(miss.is_none());
}

#[test]
fn camera_center_ray_hits_what_it_looks_at() {
    let mut scene = Scene::new();
    let mut clickables = Clickables::new();
    let target = Vec3::new(3.0, 2.0, -12.0);
    let id = add_box(&mut scene, &mut clickables, Transform::from_translation(target));

    let mut camera = Camera::new(1.5).with_pose(Vec3::new(3.0, 2.0, 0.0), Vec3::ZERO);
    camera.set_aspect(1920.0, 1080.0);
    let hit = pick(&scene, &clickables, &camera.ray_from_ndc(0.0, 0.0)).expect("hit");
    assert_eq!(hit.node, id);

    // the top edge of the view at this distance is well above the box
    assert!(pick(&scene, &clickables, &camera.ray_from_ndc(0.0, 0.9)).is_none());
}
