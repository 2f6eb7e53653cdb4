//! Time-based tweens: scripted camera flights and opacity fades.

use crate::camera::Camera;
use crate::constants::CAMERA_MOVE_SECONDS;
use crate::easing::Ease;
use crate::scene::{NodeId, Scene};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

/// Tween towards `to`, starting from whatever value it sees on its first tick.
#[derive(Clone, Copy, Debug)]
pub struct Tween<T: Lerp> {
    from: Option<T>,
    to: T,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl<T: Lerp> Tween<T> {
    pub fn new(to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from: None,
            to,
            duration,
            elapsed: 0.0,
            ease,
        }
    }

    /// Advance by `dt` and return the value to apply.
    pub fn advance(&mut self, current: T, dt: f32) -> T {
        let from = *self.from.get_or_insert(current);
        self.elapsed += dt.max(0.0);
        T::lerp(from, self.to, self.ease.evaluate(self.progress()))
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Time past the end of the tween, carried into whatever runs next.
    #[inline]
    pub fn overshoot(&self) -> f32 {
        (self.elapsed - self.duration.max(0.0)).max(0.0)
    }
}

fn default_duration() -> f32 {
    CAMERA_MOVE_SECONDS
}

/// One leg of a camera flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec3,
    pub rotation: Vec3,
    #[serde(default = "default_duration")]
    pub duration: f32,
    #[serde(default)]
    pub ease: Ease,
}

impl Waypoint {
    pub fn new(position: Vec3, rotation: Vec3, duration: f32) -> Self {
        Self {
            position,
            rotation,
            duration,
            ease: Ease::default(),
        }
    }
}

/// The intro flight from the start pose down to the button row.
pub fn move_to_starting_point() -> Vec<Waypoint> {
    vec![
        Waypoint::new(
            Vec3::new(21.0, 20.0, 71.0),
            Vec3::new(-0.28, 0.27, 0.07),
            CAMERA_MOVE_SECONDS,
        ),
        Waypoint::new(
            Vec3::new(11.0, 6.0, 38.0),
            Vec3::new(-0.15, 0.28, 0.04),
            CAMERA_MOVE_SECONDS,
        ),
    ]
}

#[derive(Clone, Copy, Debug)]
struct Leg {
    position: Tween<Vec3>,
    rotation: Tween<Vec3>,
}

/// Queue of waypoints flown one after another. Each leg starts from the pose
/// the previous one reached.
#[derive(Clone, Debug, Default)]
pub struct CameraPath {
    queue: VecDeque<Waypoint>,
    active: Option<Leg>,
}

impl CameraPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_waypoints(waypoints: impl IntoIterator<Item = Waypoint>) -> Self {
        Self {
            queue: waypoints.into_iter().collect(),
            active: None,
        }
    }

    /// Append a leg after the ones already queued.
    pub fn then(&mut self, waypoint: Waypoint) -> &mut Self {
        self.queue.push_back(waypoint);
        self
    }

    /// Drop any pending and in-flight legs and fly `waypoints` from the current pose.
    pub fn replace(&mut self, waypoints: impl IntoIterator<Item = Waypoint>) {
        self.active = None;
        self.queue.clear();
        self.queue.extend(waypoints);
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len() + usize::from(self.active.is_some())
    }

    /// Move the camera; returns whether it was touched this tick.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) -> bool {
        let mut dt = dt;
        let mut moved = false;
        loop {
            let leg = match self.active.as_mut() {
                Some(leg) => leg,
                None => {
                    let Some(wp) = self.queue.pop_front() else {
                        return moved;
                    };
                    self.active.insert(Leg {
                        position: Tween::new(wp.position, wp.duration, wp.ease),
                        rotation: Tween::new(wp.rotation, wp.duration, wp.ease),
                    })
                }
            };
            camera.position = leg.position.advance(camera.position, dt);
            camera.rotation = leg.rotation.advance(camera.rotation, dt);
            moved = true;
            if !leg.position.is_finished() {
                return moved;
            }
            dt = leg.position.overshoot();
            self.active = None;
        }
    }
}

/// Opacity fade over a set of nodes, each from its own start value.
#[derive(Clone, Debug)]
pub struct OpacityFade {
    entries: Vec<(NodeId, f32, f32)>,
    elapsed: f32,
    duration: f32,
    ease: Ease,
}

impl OpacityFade {
    /// Fade every node from its current opacity to `target`.
    pub fn to(scene: &Scene, nodes: &[NodeId], target: f32, duration: f32) -> Self {
        let entries = nodes
            .iter()
            .filter_map(|&id| scene.opacity(id).map(|from| (id, from, target)))
            .collect();
        Self {
            entries,
            elapsed: 0.0,
            duration,
            ease: Ease::default(),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|e| e.0)
    }

    /// Apply the fade; returns true once it has completed.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        let k = self.ease.evaluate(t);
        for &(id, from, to) in &self.entries {
            scene.set_opacity(id, f32::lerp(from, to, k));
        }
        t >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_starts_from_first_seen_value() {
        let mut t = Tween::new(10.0_f32, 2.0, Ease::Linear);
        assert_eq!(t.advance(4.0, 1.0), 7.0);
        // later `current` values are ignored
        assert_eq!(t.advance(100.0, 1.0), 10.0);
        assert!(t.is_finished());
    }

    #[test]
    fn zero_duration_snaps() {
        let mut t = Tween::new(Vec3::ONE, 0.0, Ease::Power1Out);
        assert_eq!(t.advance(Vec3::ZERO, 0.0), Vec3::ONE);
    }
}
