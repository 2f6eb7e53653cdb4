//! glTF import into the scene graph, plus placement and clip startup.
//!
//! Only self-contained documents are supported: GLB, or glTF JSON whose
//! buffers and images are embedded as data URIs.

use crate::animation::{AnimationClip, AnimationMixer, Interpolation, Track, TrackValues};
use crate::color::Color;
use crate::error::{DioramaError, Result};
use crate::geometry::{compute_vertex_normals, MeshData};
use crate::random::random_float;
use crate::scene::{Material, Node, NodeId, Scene, TextureId, Transform};
use crate::texture::TextureData;
use fnv::FnvHashMap;
use glam::{Quat, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Random placement for several copies of one model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scatter {
    pub count: usize,
    pub min: Vec3,
    pub max: Vec3,
    #[serde(default)]
    pub random_yaw: bool,
}

/// How to place a model and which clips to start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    pub path: String,
    pub animations: Vec<String>,
    pub scale: f32,
    /// XYZ Euler radians.
    pub rotation: Vec3,
    pub position: Option<Vec3>,
    /// Keep the root in [`ModelRegistry::models`] for later lookup.
    pub register: bool,
    pub scatter: Option<Scatter>,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            path: String::new(),
            animations: Vec::new(),
            scale: 1.0,
            rotation: Vec3::ZERO,
            position: None,
            register: false,
            scatter: None,
        }
    }
}

/// Mixers for every loaded model and the roots of registered ones.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    pub mixers: Vec<AnimationMixer>,
    pub models: Vec<NodeId>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for mixer in &mut self.mixers {
            mixer.update(dt, scene);
        }
    }
}

/// Nodes and clips produced by one import.
#[derive(Debug)]
pub struct ImportedModel {
    pub root: NodeId,
    pub clips: Vec<AnimationClip>,
}

struct Importer<'a> {
    scene: &'a mut Scene,
    buffers: &'a [gltf::buffer::Data],
    images: &'a [gltf::image::Data],
    nodes: FnvHashMap<usize, NodeId>,
    textures: FnvHashMap<usize, Option<TextureId>>,
}

impl Importer<'_> {
    fn spawn(&mut self, parent: NodeId, node: gltf::Node<'_>) -> Result<()> {
        let (t, r, s) = node.transform().decomposed();
        let transform = Transform {
            translation: Vec3::from(t),
            rotation: Quat::from_array(r),
            scale: Vec3::from(s),
        };
        let name = node
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("node {}", node.index()));
        let id = self
            .scene
            .add_child(parent, Node::group(name).with_transform(transform));
        self.nodes.insert(node.index(), id);

        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                self.primitive(id, &mesh, &primitive)?;
            }
        }
        for child in node.children() {
            self.spawn(id, child)?;
        }
        Ok(())
    }

    fn primitive(
        &mut self,
        parent: NodeId,
        mesh: &gltf::Mesh<'_>,
        primitive: &gltf::Primitive<'_>,
    ) -> Result<()> {
        let mesh_name = mesh
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("mesh {}", mesh.index()));
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            return Err(DioramaError::UnsupportedPrimitive {
                mesh: mesh_name,
                primitive: primitive.index(),
                mode: primitive.mode(),
            });
        }

        let buffers = self.buffers;
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| DioramaError::MissingPositions {
                mesh: mesh_name.clone(),
                primitive: primitive.index(),
            })?
            .map(Vec3::from)
            .collect();
        let uvs: Vec<Vec2> = match reader.read_tex_coords(0) {
            Some(tc) => tc.into_f32().map(Vec2::from).collect(),
            None => vec![Vec2::ZERO; positions.len()],
        };
        let indices: Vec<u32> = match reader.read_indices() {
            Some(ix) => ix.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(DioramaError::IndexOutOfRange {
                mesh: mesh_name.clone(),
                primitive: primitive.index(),
                index,
                vertices: positions.len(),
            });
        }
        let normals: Option<Vec<Vec3>> = reader.read_normals().map(|n| n.map(Vec3::from).collect());
        let needs_normals = normals.is_none();

        let mut data = MeshData {
            normals: normals.unwrap_or_default(),
            positions,
            uvs,
            indices,
        };
        if needs_normals {
            compute_vertex_normals(&mut data);
        }

        let material = self.material(&primitive.material());
        let geometry = self.scene.add_mesh_geometry(data);
        self.scene.add_child(
            parent,
            Node::mesh(
                format!("{mesh_name} #{}", primitive.index()),
                geometry,
                material,
            ),
        );
        Ok(())
    }

    fn material(&mut self, material: &gltf::Material<'_>) -> Material {
        let pbr = material.pbr_metallic_roughness();
        let [r, g, b, a] = pbr.base_color_factor();
        let [er, eg, eb] = material.emissive_factor();
        let texture = pbr
            .base_color_texture()
            .and_then(|info| self.texture(info.texture().source().index()));
        Material {
            color: Color::rgb(r, g, b),
            emissive: Color::rgb(er, eg, eb),
            emissive_intensity: 1.0,
            opacity: a,
            transparent: material.alpha_mode() == gltf::material::AlphaMode::Blend,
            double_sided: material.double_sided(),
            texture,
            lit: true,
            metalness: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
        }
    }

    fn texture(&mut self, image: usize) -> Option<TextureId> {
        if let Some(&cached) = self.textures.get(&image) {
            return cached;
        }
        let id = self
            .images
            .get(image)
            .and_then(TextureData::from_gltf)
            .map(|data| self.scene.add_texture(data));
        self.textures.insert(image, id);
        id
    }

    fn clip(&self, animation: gltf::Animation<'_>) -> AnimationClip {
        let name = animation
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("animation_{}", animation.index()));
        let mut tracks = Vec::new();
        for channel in animation.channels() {
            let Some(&target) = self.nodes.get(&channel.target().node().index()) else {
                continue;
            };
            let buffers = self.buffers;
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
            else {
                log::warn!("[model] {name}: channel without keyframes");
                continue;
            };
            use gltf::animation::util::ReadOutputs;
            let values = match outputs {
                ReadOutputs::Translations(v) => TrackValues::Translation(v.map(Vec3::from).collect()),
                ReadOutputs::Rotations(v) => {
                    TrackValues::Rotation(v.into_f32().map(Quat::from_array).collect())
                }
                ReadOutputs::Scales(v) => TrackValues::Scale(v.map(Vec3::from).collect()),
                ReadOutputs::MorphTargetWeights(_) => {
                    log::debug!("[model] {name}: morph target channel ignored");
                    continue;
                }
            };
            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };
            tracks.push(Track {
                target,
                interpolation,
                times: inputs.collect(),
                values,
            });
        }
        AnimationClip::new(name, tracks)
    }
}

/// Import a self-contained glTF/GLB under a new root node.
pub fn import_gltf(scene: &mut Scene, name: &str, bytes: &[u8]) -> Result<ImportedModel> {
    let (document, buffers, images) = gltf::import_slice(bytes)?;
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(DioramaError::EmptyDocument)?;

    let root = scene.add(Node::group(name));
    let mut importer = Importer {
        scene,
        buffers: &buffers,
        images: &images,
        nodes: FnvHashMap::default(),
        textures: FnvHashMap::default(),
    };
    for node in gltf_scene.nodes() {
        importer.spawn(root, node)?;
    }
    let clips = document.animations().map(|a| importer.clip(a)).collect();
    Ok(ImportedModel { root, clips })
}

/// Import, place and animate one model. The mixer always joins the registry;
/// the root does too when `spec.register` is set.
pub fn load_model(
    scene: &mut Scene,
    registry: &mut ModelRegistry,
    bytes: &[u8],
    spec: &ModelSpec,
) -> Result<NodeId> {
    let ImportedModel { root, clips } = import_gltf(scene, &spec.path, bytes)?;

    let transform = &mut scene.node_mut(root).transform;
    transform.set_uniform_scale(spec.scale);
    transform.set_euler(spec.rotation);
    if let Some(p) = spec.position {
        transform.translation = p;
    }

    let mut mixer = AnimationMixer::new(root, clips);
    for name in &spec.animations {
        match mixer.clip_action(name) {
            Some(action) => mixer.play(action),
            None => log::warn!("[model] {}: no clip named {:?}", spec.path, name),
        }
    }
    log::info!(
        "[model] loaded {} ({} clips, {} playing)",
        spec.path,
        mixer.clips().len(),
        mixer.playing_count()
    );
    registry.mixers.push(mixer);
    if spec.register {
        registry.models.push(root);
    }
    Ok(root)
}

/// Load `scatter.count` copies at random positions inside the scatter box,
/// optionally with a random yaw added to `spec.rotation`.
pub fn scatter_models<R: Rng + ?Sized>(
    scene: &mut Scene,
    registry: &mut ModelRegistry,
    bytes: &[u8],
    spec: &ModelSpec,
    scatter: &Scatter,
    rng: &mut R,
) -> Result<Vec<NodeId>> {
    let mut axis = |lo: f32, hi: f32| random_float(rng, lo as f64, hi as f64) as f32;
    let mut placements = Vec::with_capacity(scatter.count);
    for _ in 0..scatter.count {
        let position = Vec3::new(
            axis(scatter.min.x, scatter.max.x),
            axis(scatter.min.y, scatter.max.y),
            axis(scatter.min.z, scatter.max.z),
        );
        let yaw = if scatter.random_yaw {
            axis(0.0, std::f32::consts::TAU)
        } else {
            0.0
        };
        placements.push((position, yaw));
    }

    placements
        .into_iter()
        .map(|(position, yaw)| {
            let instance = ModelSpec {
                position: Some(position),
                rotation: spec.rotation + Vec3::new(0.0, yaw, 0.0),
                scatter: None,
                ..spec.clone()
            };
            load_model(scene, registry, bytes, &instance)
        })
        .collect()
}
