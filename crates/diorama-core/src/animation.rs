//! Keyframe clips over node transforms and a mixer that loops them.

use crate::scene::{NodeId, Scene};
use glam::{Quat, Vec3, Vec4};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Values are stored as `[in_tangent, value, out_tangent]` per keyframe.
    CubicSpline,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TrackValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub target: NodeId,
    pub interpolation: Interpolation,
    pub times: Vec<f32>,
    pub values: TrackValues,
}

trait Keyframe: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, dt: f32, t: f32) -> Self;
}

fn hermite_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    ]
}

impl Keyframe for Vec3 {
    #[inline]
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, dt: f32, t: f32) -> Self {
        let [a, b, c, d] = hermite_weights(t);
        p0 * a + m0 * (b * dt) + p1 * c + m1 * (d * dt)
    }
}

impl Keyframe for Quat {
    #[inline]
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, dt: f32, t: f32) -> Self {
        let [a, b, c, d] = hermite_weights(t);
        let v = Vec4::from(p0) * a
            + Vec4::from(m0) * (b * dt)
            + Vec4::from(p1) * c
            + Vec4::from(m1) * (d * dt);
        Quat::from_vec4(v).normalize()
    }
}

fn sample<T: Keyframe>(times: &[f32], values: &[T], interp: Interpolation, t: f32) -> Option<T> {
    let stride = if interp == Interpolation::CubicSpline { 3 } else { 1 };
    let key = |i: usize| values.get(i * stride + stride / 2).copied();
    let last = times.len().checked_sub(1)?;
    if t <= times[0] {
        return key(0);
    }
    if t >= times[last] {
        return key(last);
    }
    // first keyframe strictly after t
    let next = times.partition_point(|&k| k <= t);
    let prev = next - 1;
    let span = times[next] - times[prev];
    let u = if span > 0.0 { (t - times[prev]) / span } else { 0.0 };
    match interp {
        Interpolation::Step => key(prev),
        Interpolation::Linear => Some(T::interpolate(key(prev)?, key(next)?, u)),
        Interpolation::CubicSpline => {
            let out_tangent = *values.get(prev * 3 + 2)?;
            let in_tangent = *values.get(next * 3)?;
            Some(T::hermite(
                key(prev)?,
                out_tangent,
                key(next)?,
                in_tangent,
                span,
                u,
            ))
        }
    }
}

impl Track {
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Write the sampled value at `t` into the target's transform.
    pub fn apply(&self, scene: &mut Scene, t: f32) {
        let transform = &mut scene.node_mut(self.target).transform;
        match &self.values {
            TrackValues::Translation(v) => {
                if let Some(p) = sample(&self.times, v, self.interpolation, t) {
                    transform.translation = p;
                }
            }
            TrackValues::Rotation(v) => {
                if let Some(q) = sample(&self.times, v, self.interpolation, t) {
                    transform.rotation = q;
                }
            }
            TrackValues::Scale(v) => {
                if let Some(s) = sample(&self.times, v, self.interpolation, t) {
                    transform.scale = s;
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::end_time).fold(0.0, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    pub fn find_by_name<'a>(clips: &'a [AnimationClip], name: &str) -> Option<&'a AnimationClip> {
        clips.iter().find(|c| c.name == name)
    }

    /// Pose every track at `t`. Later tracks overwrite earlier ones on the same property.
    pub fn apply(&self, scene: &mut Scene, t: f32) {
        for track in &self.tracks {
            track.apply(scene, t);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

#[derive(Clone, Debug)]
struct Action {
    clip: usize,
    time: f32,
    playing: bool,
}

/// Plays clips against the nodes of one model, looping each playing action.
#[derive(Clone, Debug)]
pub struct AnimationMixer {
    root: NodeId,
    clips: Vec<AnimationClip>,
    actions: Vec<Action>,
}

impl AnimationMixer {
    pub fn new(root: NodeId, clips: Vec<AnimationClip>) -> Self {
        Self {
            root,
            clips,
            actions: Vec::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// The action for the named clip, created on first request.
    pub fn clip_action(&mut self, name: &str) -> Option<ActionId> {
        let clip = self.clips.iter().position(|c| c.name == name)?;
        if let Some(i) = self.actions.iter().position(|a| a.clip == clip) {
            return Some(ActionId(i));
        }
        self.actions.push(Action {
            clip,
            time: 0.0,
            playing: false,
        });
        Some(ActionId(self.actions.len() - 1))
    }

    pub fn play(&mut self, action: ActionId) {
        if let Some(a) = self.actions.get_mut(action.0) {
            a.playing = true;
        }
    }

    pub fn stop(&mut self, action: ActionId) {
        if let Some(a) = self.actions.get_mut(action.0) {
            a.playing = false;
            a.time = 0.0;
        }
    }

    pub fn is_playing(&self, action: ActionId) -> bool {
        self.actions.get(action.0).is_some_and(|a| a.playing)
    }

    pub fn time(&self, action: ActionId) -> Option<f32> {
        self.actions.get(action.0).map(|a| a.time)
    }

    pub fn playing_count(&self) -> usize {
        self.actions.iter().filter(|a| a.playing).count()
    }

    /// Advance playing actions by `dt` seconds and pose the scene.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in self.actions.iter_mut().filter(|a| a.playing) {
            let clip = &self.clips[action.clip];
            action.time = if clip.duration > 0.0 {
                (action.time + dt).rem_euclid(clip.duration)
            } else {
                0.0
            };
            clip.apply(scene, action.time);
        }
    }
}
