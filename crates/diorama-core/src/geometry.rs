//! CPU-side geometry: segmented boxes, planes, edge outlines.
//!
//! Vertex order and winding follow the layout most WebGL scene libraries use
//! for their box and plane primitives, so softened corners and outlines match
//! what designers preview in the browser.

use fnv::FnvHashMap;
use glam::{Vec2, Vec3};

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

/// Line list: every consecutive pair of positions is one segment.
#[derive(Clone, Debug, Default)]
pub struct LineData {
    pub positions: Vec<Vec3>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bb = Aabb::EMPTY;
        for p in points {
            bb.extend(*p);
        }
        bb
    }

    #[inline]
    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn expanded(&self, by: Vec3) -> Self {
        if self.is_empty() {
            return *self;
        }
        Aabb {
            min: self.min - by,
            max: self.max + by,
        }
    }
}

impl MeshData {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.positions)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl LineData {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.positions)
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }
}

/// Segmented box centered on the origin.
pub fn box_geometry(
    width: f32,
    height: f32,
    depth: f32,
    width_segments: u32,
    height_segments: u32,
    depth_segments: u32,
) -> MeshData {
    let ws = width_segments.max(1);
    let hs = height_segments.max(1);
    let ds = depth_segments.max(1);
    let mut mesh = MeshData::default();
    // (u, v, w, udir, vdir, plane width, plane height, plane depth, grid x, grid y)
    build_plane(&mut mesh, [2, 1, 0], -1.0, -1.0, depth, height, width, ds, hs); // +x
    build_plane(&mut mesh, [2, 1, 0], 1.0, -1.0, depth, height, -width, ds, hs); // -x
    build_plane(&mut mesh, [0, 2, 1], 1.0, 1.0, width, depth, height, ws, ds); // +y
    build_plane(&mut mesh, [0, 2, 1], 1.0, -1.0, width, depth, -height, ws, ds); // -y
    build_plane(&mut mesh, [0, 1, 2], 1.0, -1.0, width, height, depth, ws, hs); // +z
    build_plane(&mut mesh, [0, 1, 2], -1.0, -1.0, width, height, -depth, ws, hs); // -z
    mesh
}

#[allow(clippy::too_many_arguments)]
fn build_plane(
    mesh: &mut MeshData,
    [u, v, w]: [usize; 3],
    udir: f32,
    vdir: f32,
    width: f32,
    height: f32,
    depth: f32,
    grid_x: u32,
    grid_y: u32,
) {
    let seg_w = width / grid_x as f32;
    let seg_h = height / grid_y as f32;
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let half_d = depth / 2.0;
    let gx1 = grid_x + 1;
    let base = mesh.positions.len() as u32;

    for iy in 0..=grid_y {
        let y = iy as f32 * seg_h - half_h;
        for ix in 0..=grid_x {
            let x = ix as f32 * seg_w - half_w;
            let mut p = [0.0; 3];
            p[u] = x * udir;
            p[v] = y * vdir;
            p[w] = half_d;
            let mut n = [0.0; 3];
            n[w] = if depth > 0.0 { 1.0 } else { -1.0 };
            mesh.positions.push(Vec3::from(p));
            mesh.normals.push(Vec3::from(n));
            mesh.uvs.push(Vec2::new(
                ix as f32 / grid_x as f32,
                1.0 - iy as f32 / grid_y as f32,
            ));
        }
    }

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = base + ix + gx1 * iy;
            let b = base + ix + gx1 * (iy + 1);
            let c = base + (ix + 1) + gx1 * (iy + 1);
            let d = base + (ix + 1) + gx1 * iy;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

/// Single-segment plane in XY facing +Z.
pub fn plane_geometry(width: f32, height: f32) -> MeshData {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let mut mesh = MeshData::default();
    for iy in 0..=1u32 {
        let y = iy as f32 * height - half_h;
        for ix in 0..=1u32 {
            let x = ix as f32 * width - half_w;
            mesh.positions.push(Vec3::new(x, -y, 0.0));
            mesh.normals.push(Vec3::Z);
            mesh.uvs.push(Vec2::new(ix as f32, 1.0 - iy as f32));
        }
    }
    mesh.indices.extend_from_slice(&[0, 2, 1, 2, 3, 1]);
    mesh
}

/// Pull corner vertices inwards on X/Y to fake rounded corners.
pub fn soften_corners(mesh: &mut MeshData, width: f32, height: f32, zone: f32, factor: f32) {
    let lim_x = width / 2.0 * zone;
    let lim_y = height / 2.0 * zone;
    for p in &mut mesh.positions {
        if p.x.abs() > lim_x && p.y.abs() > lim_y {
            p.x *= factor;
            p.y *= factor;
        }
    }
    compute_vertex_normals(mesh);
}

/// Area-weighted smooth normals over the index buffer.
pub fn compute_vertex_normals(mesh: &mut MeshData) {
    mesh.normals.clear();
    mesh.normals.resize(mesh.positions.len(), Vec3::ZERO);
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (pa, pb, pc) = (mesh.positions[a], mesh.positions[b], mesh.positions[c]);
        let n = (pc - pb).cross(pa - pb);
        mesh.normals[a] += n;
        mesh.normals[b] += n;
        mesh.normals[c] += n;
    }
    for n in &mut mesh.normals {
        *n = n.normalize_or_zero();
    }
}

type PosKey = (i64, i64, i64);

#[inline]
fn pos_key(p: Vec3) -> PosKey {
    const PRECISION: f32 = 1e4;
    (
        (p.x * PRECISION).round() as i64,
        (p.y * PRECISION).round() as i64,
        (p.z * PRECISION).round() as i64,
    )
}

struct OpenEdge {
    a: Vec3,
    b: Vec3,
    normal: Vec3,
}

/// Outline edges: borders plus creases sharper than `threshold_deg`.
pub fn edges_geometry(mesh: &MeshData, threshold_deg: f32) -> LineData {
    let threshold_dot = threshold_deg.to_radians().cos();
    let mut open: FnvHashMap<(PosKey, PosKey), Option<OpenEdge>> = FnvHashMap::default();
    let mut order: Vec<(PosKey, PosKey)> = Vec::new();
    let mut out = LineData::default();

    for tri in mesh.indices.chunks_exact(3) {
        let pts = [
            mesh.positions[tri[0] as usize],
            mesh.positions[tri[1] as usize],
            mesh.positions[tri[2] as usize],
        ];
        let keys = [pos_key(pts[0]), pos_key(pts[1]), pos_key(pts[2])];
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }
        let normal = (pts[2] - pts[1]).cross(pts[0] - pts[1]).normalize_or_zero();
        for j in 0..3 {
            let k = (j + 1) % 3;
            let fwd = (keys[j], keys[k]);
            let rev = (keys[k], keys[j]);
            let matched = open.get_mut(&rev).and_then(Option::take);
            if let Some(e) = matched {
                if normal.dot(e.normal) <= threshold_dot {
                    out.positions.push(e.a);
                    out.positions.push(e.b);
                }
            } else if !open.contains_key(&fwd) {
                open.insert(
                    fwd,
                    Some(OpenEdge {
                        a: pts[j],
                        b: pts[k],
                        normal,
                    }),
                );
                order.push(fwd);
            }
        }
    }

    // Unmatched edges are borders.
    for key in order {
        if let Some(Some(e)) = open.remove(&key) {
            out.positions.push(e.a);
            out.positions.push(e.b);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_faces_forward() {
        let mut mesh = plane_geometry(2.0, 1.0);
        let bounds = mesh.bounds();
        assert_eq!(bounds.size(), Vec3::new(2.0, 1.0, 0.0));
        compute_vertex_normals(&mut mesh);
        for n in &mesh.normals {
            assert!((n.z - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn box_vertex_and_index_counts() {
        let mesh = box_geometry(3.5, 1.2, 0.3, 4, 4, 2);
        // (ds+1)(hs+1)*2 + (ws+1)(ds+1)*2 + (ws+1)(hs+1)*2
        assert_eq!(mesh.positions.len(), 15 * 2 + 15 * 2 + 25 * 2);
        assert_eq!(mesh.triangle_count(), (8 * 2 + 8 * 2 + 16 * 2) * 2);
    }
}
