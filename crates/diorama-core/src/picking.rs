//! Pointer ray tests against clickable nodes.

use crate::geometry::Aabb;
use crate::scene::{Clickables, NodeId, Scene};
use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    /// Ray expressed in another space. The direction is not renormalized so
    /// distances along it stay comparable with the source space.
    #[inline]
    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            dir: m.transform_vector3(self.dir),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Slab test. Returns the entry distance (0 when starting inside).
pub fn ray_aabb(ray: &Ray, bb: &Aabb) -> Option<f32> {
    if bb.is_empty() {
        return None;
    }
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.dir[axis];
        if d.abs() < 1e-12 {
            if o < bb.min[axis] || o > bb.max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((bb.min[axis] - o) * inv, (bb.max[axis] - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_max < t_min {
            return None;
        }
    }
    Some(t_min)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// Nearest visible clickable whose geometry bounds the ray enters.
pub fn pick(scene: &Scene, clickables: &Clickables, ray: &Ray) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for id in clickables.iter() {
        if !scene.is_visible(id) {
            continue;
        }
        let Some(drawable) = &scene.node(id).drawable else {
            continue;
        };
        let bounds = scene.geometry(drawable.geometry).bounds();
        let world = scene.world_matrix(id);
        let local = ray.transformed(&world.inverse());
        let Some(t) = ray_aabb(&local, &bounds) else {
            continue;
        };
        let point = world.transform_point3(local.at(t));
        let distance = point.distance(ray.origin);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Hit {
                node: id,
                distance,
                point,
            });
        }
    }
    best
}
