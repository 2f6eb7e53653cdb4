// Host-side tests for keyframe clips and the looping mixer.

use diorama_core::animation::{Interpolation, Track, TrackValues};
use diorama_core::scene::Node;
use diorama_core::{AnimationClip, AnimationMixer, NodeId, Scene};
use glam::{Quat, Vec3};

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

fn slide(target: NodeId) -> Track {
    Track {
        target,
        interpolation: Interpolation::Linear,
        times: vec![0.0, 2.0],
        values: TrackValues::Translation(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]),
    }
}

fn rig() -> (Scene, NodeId, NodeId) {
    let mut scene = Scene::new();
    let root = scene.add(Node::group("model"));
    let fin = scene.add_child(root, Node::group("fin"));
    (scene, root, fin)
}

#[test]
fn clip_duration_is_longest_track() {
    let (_, _, fin) = rig();
    let spin = Track {
        target: fin,
        interpolation: Interpolation::Step,
        times: vec![0.0, 3.5],
        values: TrackValues::Rotation(vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)]),
    };
    let clip = AnimationClip::new("swim", vec![slide(fin), spin]);
    assert_eq!(clip.duration, 3.5);
}

#[test]
fn find_by_name_matches_exactly() {
    let (_, _, fin) = rig();
    let clips = vec![
        AnimationClip::new("idle", vec![]),
        AnimationClip::new("swim", vec![slide(fin)]),
    ];
    assert_eq!(
        AnimationClip::find_by_name(&clips, "swim").map(|c| c.duration),
        Some(2.0)
    );
    assert!(AnimationClip::find_by_name(&clips, "Swim").is_none());
}

#[test]
fn clip_action_is_created_once() {
    let (_, root, fin) = rig();
    let mut mixer = AnimationMixer::new(root, vec![AnimationClip::new("swim", vec![slide(fin)])]);
    let a = mixer.clip_action("swim").expect("clip exists");
    let b = mixer.clip_action("swim").expect("clip exists");
    assert_eq!(a, b);
    assert!(mixer.clip_action("missing").is_none());
    assert!(!mixer.is_playing(a));
    assert_eq!(mixer.root(), root);
}

#[test]
fn mixer_poses_nodes_while_playing() {
    let (mut scene, root, fin) = rig();
    let mut mixer = AnimationMixer::new(root, vec![AnimationClip::new("swim", vec![slide(fin)])]);
    let action = mixer.clip_action("swim").expect("clip exists");

    mixer.update(1.0, &mut scene);
    assert_eq!(scene.node(fin).transform.translation, Vec3::ZERO);

    mixer.play(action);
    mixer.update(0.5, &mut scene);
    assert!(close(scene.node(fin).transform.translation, Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(mixer.playing_count(), 1);
}

#[test]
fn mixer_loops_past_the_end() {
    let (mut scene, root, fin) = rig();
    let mut mixer = AnimationMixer::new(root, vec![AnimationClip::new("swim", vec![slide(fin)])]);
    let action = mixer.clip_action("swim").expect("clip exists");
    mixer.play(action);
    mixer.update(2.5, &mut scene);
    let t = mixer.time(action).expect("action time");
    assert!((t - 0.5).abs() < 1e-5);
    assert!(close(scene.node(fin).transform.translation, Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn stop_rewinds_action() {
    let (mut scene, root, fin) = rig();
    let mut mixer = AnimationMixer::new(root, vec![AnimationClip::new("swim", vec![slide(fin)])]);
    let action = mixer.clip_action("swim").expect("clip exists");
    mixer.play(action);
    mixer.update(1.0, &mut scene);
    mixer.stop(action);
    assert_eq!(mixer.time(action), Some(0.0));
    assert_eq!(mixer.playing_count(), 0);
}

#[test]
fn later_tracks_win_on_the_same_property() {
    let (mut scene, _, fin) = rig();
    let hold = Track {
        target: fin,
        interpolation: Interpolation::Step,
        times: vec![0.0],
        values: TrackValues::Translation(vec![Vec3::new(0.0, 9.0, 0.0)]),
    };
    AnimationClip::new("both", vec![slide(fin), hold]).apply(&mut scene, 1.0);
    assert_eq!(scene.node(fin).transform.translation, Vec3::new(0.0, 9.0, 0.0));
}

#[test]
fn rotation_tracks_slerp() {
    let (mut scene, _, fin) = rig();
    let turn = Track {
        target: fin,
        interpolation: Interpolation::Linear,
        times: vec![0.0, 1.0],
        values: TrackValues::Rotation(vec![
            Quat::IDENTITY,
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        ]),
    };
    AnimationClip::new("turn", vec![turn]).apply(&mut scene, 0.5);
    let q = scene.node(fin).transform.rotation;
    assert!(q.angle_between(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4)) < 1e-4);
}

#[test]
fn scale_tracks_clamp_before_first_key() {
    let (mut scene, _, fin) = rig();
    let grow = Track {
        target: fin,
        interpolation: Interpolation::Linear,
        times: vec![1.0, 2.0],
        values: TrackValues::Scale(vec![Vec3::splat(2.0), Vec3::splat(3.0)]),
    };
    AnimationClip::new("grow", vec![grow]).apply(&mut scene, 0.0);
    assert_eq!(scene.node(fin).transform.scale, Vec3::splat(2.0));
}
