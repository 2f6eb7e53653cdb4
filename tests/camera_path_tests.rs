// Host-side tests for scripted camera flights and opacity fades.

use diorama_core::easing::Ease;
use diorama_core::scene::{Material, Node};
use diorama_core::tween::move_to_starting_point;
use diorama_core::{Camera, CameraPath, OpacityFade, Scene, Waypoint};
use glam::Vec3;

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

fn linear(position: Vec3, duration: f32) -> Waypoint {
    Waypoint {
        ease: Ease::Linear,
        ..Waypoint::new(position, Vec3::ZERO, duration)
    }
}

#[test]
fn starting_point_script_has_two_three_second_legs() {
    let legs = move_to_starting_point();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].position, Vec3::new(21.0, 20.0, 71.0));
    assert_eq!(legs[0].rotation, Vec3::new(-0.28, 0.27, 0.07));
    assert_eq!(legs[1].position, Vec3::new(11.0, 6.0, 38.0));
    assert_eq!(legs[1].rotation, Vec3::new(-0.15, 0.28, 0.04));
    assert!(legs.iter().all(|w| w.duration == 3.0 && w.ease == Ease::Power1Out));
}

#[test]
fn intro_flight_ends_at_last_waypoint() {
    let mut camera = Camera::new(1.0);
    let mut path = CameraPath::from_waypoints(move_to_starting_point());
    assert_eq!(path.pending(), 2);
    for _ in 0..(7 * 60) {
        path.update(&mut camera, 1.0 / 60.0);
    }
    assert!(path.is_idle());
    assert!(close(camera.position, Vec3::new(11.0, 6.0, 38.0)));
    assert!(close(camera.rotation, Vec3::new(-0.15, 0.28, 0.04)));
}

#[test]
fn second_leg_starts_where_first_ended() {
    let mut camera = Camera::new(1.0).with_pose(Vec3::ZERO, Vec3::ZERO);
    let mut path = CameraPath::new();
    path.then(linear(Vec3::new(10.0, 0.0, 0.0), 1.0))
        .then(linear(Vec3::new(10.0, 10.0, 0.0), 1.0));

    path.update(&mut camera, 0.5);
    assert!(close(camera.position, Vec3::new(5.0, 0.0, 0.0)));
    path.update(&mut camera, 0.5);
    assert!(close(camera.position, Vec3::new(10.0, 0.0, 0.0)));
    assert_eq!(path.pending(), 1);
    path.update(&mut camera, 0.5);
    assert!(close(camera.position, Vec3::new(10.0, 5.0, 0.0)));
}

#[test]
fn overshoot_carries_into_next_leg() {
    let mut camera = Camera::new(1.0).with_pose(Vec3::ZERO, Vec3::ZERO);
    let mut path = CameraPath::from_waypoints([
        linear(Vec3::new(4.0, 0.0, 0.0), 1.0),
        linear(Vec3::new(4.0, 4.0, 0.0), 1.0),
    ]);
    assert!(path.update(&mut camera, 1.25));
    assert!(close(camera.position, Vec3::new(4.0, 1.0, 0.0)));
}

#[test]
fn replace_restarts_from_current_pose() {
    let mut camera = Camera::new(1.0).with_pose(Vec3::ZERO, Vec3::ZERO);
    let mut path = CameraPath::from_waypoints([linear(Vec3::new(10.0, 0.0, 0.0), 1.0)]);
    path.update(&mut camera, 0.5);
    path.replace([linear(Vec3::new(5.0, 10.0, 0.0), 1.0)]);
    path.update(&mut camera, 0.5);
    assert!(close(camera.position, Vec3::new(5.0, 5.0, 0.0)));
}

#[test]
fn idle_path_leaves_camera_alone() {
    let mut camera = Camera::new(1.0);
    let before = camera;
    let mut path = CameraPath::new();
    assert!(!path.update(&mut camera, 1.0));
    assert_eq!(camera, before);
}

#[test]
fn power1_out_front_loads_motion() {
    let mut camera = Camera::new(1.0).with_pose(Vec3::ZERO, Vec3::ZERO);
    let mut path =
        CameraPath::from_waypoints([Waypoint::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 1.0)]);
    path.update(&mut camera, 0.5);
    assert!((camera.position.x - 0.75).abs() < 1e-5);
}

fn faded_scene(n: usize) -> (Scene, Vec<diorama_core::NodeId>) {
    let mut scene = Scene::new();
    let geo = scene.add_mesh_geometry(diorama_core::geometry::plane_geometry(1.0, 1.0));
    let ids = (0..n)
        .map(|i| scene.add(Node::mesh(format!("n{i}"), geo, Material::hidden(0xffffff))))
        .collect();
    (scene, ids)
}

#[test]
fn opacity_fade_reaches_target_and_reports_done() {
    let (mut scene, ids) = faded_scene(3);
    let mut fade = OpacityFade::to(&scene, &ids, 1.0, 1.0);
    assert!(!fade.update(&mut scene, 0.5));
    let mid = scene.opacity(ids[0]).expect("material");
    assert!(mid > 0.5 && mid < 1.0, "ease-out is past halfway at t=0.5: {mid}");
    assert!(fade.update(&mut scene, 0.6));
    for id in ids {
        assert_eq!(scene.opacity(id), Some(1.0));
    }
}

#[test]
fn opacity_fade_starts_from_each_nodes_current_value() {
    let (mut scene, ids) = faded_scene(2);
    scene.set_opacity(ids[1], 1.0);
    let mut fade = OpacityFade::to(&scene, &ids, 0.0, 2.0);
    assert_eq!(fade.nodes().count(), 2);
    fade.update(&mut scene, 2.0);
    assert_eq!(scene.opacity(ids[0]), Some(0.0));
    assert_eq!(scene.opacity(ids[1]), Some(0.0));
}

#[test]
fn opacity_fade_skips_groups() {
    let (mut scene, mut ids) = faded_scene(1);
    ids.push(scene.add(Node::group("empty")));
    let fade = OpacityFade::to(&scene, &ids, 1.0, 1.0);
    assert_eq!(fade.nodes().count(), 1);
}
