//! Arena-backed scene graph.
//!
//! Nodes live in an [`id_arena::Arena`] and are never freed; hiding a subtree
//! is done through `visible`. Geometry and textures are stored once and shared
//! by id, which is also the key the renderer caches GPU buffers under.

mod interaction;
mod transform;

pub use interaction::{ButtonTarget, ClickAction, Clickables, Interaction};
pub use transform::{euler_xyz, Transform};

use crate::color::Color;
use crate::geometry::{Aabb, LineData, MeshData};
use crate::texture::TextureData;
use glam::{Mat4, Vec3};
use id_arena::{Arena, Id};
use smallvec::SmallVec;

pub type NodeId = Id<Node>;
pub type GeometryId = Id<Geometry>;
pub type TextureId = Id<TextureData>;

#[derive(Clone, Debug)]
pub enum Geometry {
    Triangles(MeshData),
    Lines(LineData),
}

impl Geometry {
    pub fn bounds(&self) -> Aabb {
        match self {
            Geometry::Triangles(m) => m.bounds(),
            Geometry::Lines(l) => l.bounds(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
    pub texture: Option<TextureId>,
    /// Unlit materials ignore the scene light.
    pub lit: bool,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    /// Flat color, no lighting.
    pub fn basic(hex: u32) -> Self {
        Self {
            color: Color::from_hex(hex),
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
            texture: None,
            lit: false,
            metalness: 0.0,
            roughness: 1.0,
        }
    }

    /// Lit surface.
    pub fn standard(hex: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            lit: true,
            metalness,
            roughness,
            ..Self::basic(hex)
        }
    }

    /// Transparent material starting fully faded out.
    pub fn hidden(hex: u32) -> Self {
        Self {
            opacity: 0.0,
            transparent: true,
            ..Self::basic(hex)
        }
    }

    pub fn with_emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = Color::from_hex(hex);
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_double_side(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Drawable {
    pub geometry: GeometryId,
    pub material: Material,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub drawable: Option<Drawable>,
    pub visible: bool,
    pub interaction: Option<Interaction>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            drawable: None,
            visible: true,
            interaction: None,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>, geometry: GeometryId, material: Material) -> Self {
        Self {
            drawable: Some(Drawable { geometry, material }),
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(self, position: Vec3) -> Self {
        self.with_transform(Transform::from_translation(position))
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn material(&self) -> Option<&Material> {
        self.drawable.as_ref().map(|d| &d.material)
    }

    #[inline]
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.drawable.as_mut().map(|d| &mut d.material)
    }
}

#[derive(Default)]
pub struct Scene {
    nodes: Arena<Node>,
    geometries: Arena<Geometry>,
    textures: Arena<TextureData>,
    roots: Vec<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.alloc(geometry)
    }

    pub fn add_mesh_geometry(&mut self, mesh: MeshData) -> GeometryId {
        self.add_geometry(Geometry::Triangles(mesh))
    }

    pub fn add_line_geometry(&mut self, lines: LineData) -> GeometryId {
        self.add_geometry(Geometry::Lines(lines))
    }

    #[inline]
    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id]
    }

    pub fn add_texture(&mut self, texture: TextureData) -> TextureId {
        self.textures.alloc(texture)
    }

    #[inline]
    pub fn texture(&self, id: TextureId) -> &TextureData {
        &self.textures[id]
    }

    /// Add a top-level node.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.nodes.alloc(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.nodes.alloc(node);
        self.nodes[parent].children.push(id);
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = self.nodes[id].transform.matrix();
        let mut cur = self.nodes[id].parent;
        while let Some(p) = cur {
            m = self.nodes[p].transform.matrix() * m;
            cur = self.nodes[p].parent;
        }
        m
    }

    #[inline]
    pub fn local_to_world(&self, id: NodeId, point: Vec3) -> Vec3 {
        self.world_matrix(id).transform_point3(point)
    }

    /// Visible only if the node and all its ancestors are.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if !self.nodes[n].visible {
                return false;
            }
            cur = self.nodes[n].parent;
        }
        true
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id].visible = visible;
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) {
        if let Some(m) = self.nodes[id].material_mut() {
            m.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn opacity(&self, id: NodeId) -> Option<f32> {
        self.nodes[id].material().map(|m| m.opacity)
    }

    pub fn set_color(&mut self, id: NodeId, color: Color) {
        if let Some(m) = self.nodes[id].material_mut() {
            m.color = color;
        }
    }

    /// Depth-first walk of visible drawables with their world matrices.
    pub fn visit_drawables(&self, mut f: impl FnMut(NodeId, &Drawable, Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, Mat4::IDENTITY))
            .collect();
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id];
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            if let Some(d) = &node.drawable {
                f(id, d, world);
            }
            for &c in node.children.iter().rev() {
                stack.push((c, world));
            }
        }
    }

    /// Every node in the subtree rooted at `id`, parents before children.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n].children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_world_matrix_composes_parent() {
        let mut scene = Scene::new();
        let root = scene.add(Node::group("root").at(Vec3::new(1.0, 0.0, 0.0)));
        let child = scene.add_child(root, Node::group("child").at(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(scene.local_to_world(child, Vec3::ZERO), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn hidden_parent_hides_drawables() {
        let mut scene = Scene::new();
        let geo = scene.add_mesh_geometry(crate::geometry::plane_geometry(1.0, 1.0));
        let root = scene.add(Node::group("root"));
        let leaf = scene.add_child(root, Node::mesh("leaf", geo, Material::basic(0xffffff)));
        let mut seen = Vec::new();
        scene.visit_drawables(|id, _, _| seen.push(id));
        assert_eq!(seen, vec![leaf]);

        scene.set_visible(root, false);
        seen.clear();
        scene.visit_drawables(|id, _, _| seen.push(id));
        assert!(seen.is_empty());
        assert!(!scene.is_visible(leaf));
    }
}
