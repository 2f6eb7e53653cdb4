use crate::constants::*;
use crate::geometry::{box_geometry, edges_geometry, plane_geometry};
use crate::scene::{
    euler_xyz, ClickAction, Clickables, Interaction, Material, Node, NodeId, Scene, Transform,
};
use crate::text::{wrap_text, TextGeometry, TextMeasure, TextStyle, Typeface};
use crate::texture::TextureData;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UrlLink {
    pub title: String,
    pub url: String,
}

/// Content of an info panel as authored in a scene preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub urls: Vec<UrlLink>,
}

impl PanelConfig {
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// A run of text anchored at its lower-left `origin` (panel-local).
#[derive(Clone, Debug, PartialEq)]
pub struct TextPlacement {
    pub text: String,
    pub size: f32,
    pub depth: f32,
    pub origin: Vec3,
    pub extent: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UrlButtonLayout {
    pub title: String,
    pub url: String,
    pub center: Vec3,
    pub width: f32,
    pub label: TextPlacement,
}

/// Positions of every panel element in panel-local coordinates.
///
/// The panel is `PANEL_WIDTH x PANEL_HEIGHT` centered on the origin, +Y up,
/// +Z towards the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelLayout {
    pub title: TextPlacement,
    pub underline_center: Vec3,
    pub underline_size: Vec2,
    pub text_start_x: f32,
    pub text_max_width: f32,
    pub body: Vec<TextPlacement>,
    pub image_center: Option<Vec3>,
    pub url_buttons: Vec<UrlButtonLayout>,
    pub close_center: Vec3,
    pub close_label: TextPlacement,
}

fn placement(
    measure: &impl TextMeasure,
    text: &str,
    size: f32,
    depth: f32,
    origin: impl FnOnce(Vec2) -> Vec3,
) -> TextPlacement {
    let extent = measure.extent(text, size);
    TextPlacement {
        text: text.to_owned(),
        size,
        depth,
        origin: origin(extent),
        extent,
    }
}

impl PanelLayout {
    pub fn compute(config: &PanelConfig, measure: &impl TextMeasure) -> Self {
        let (w, h) = (PANEL_WIDTH, PANEL_HEIGHT);
        let pad = PANEL_PADDING;

        let title = placement(measure, &config.title, PANEL_TITLE_SIZE, PANEL_TITLE_DEPTH, |e| {
            Vec3::new(-0.5 * e.x, h * PANEL_TITLE_Y, PANEL_FRONT_Z)
        });

        let content_y = h * PANEL_CONTENT_Y;
        let has_image = config.has_image();
        let (text_start_x, text_max_width) = if has_image {
            (
                -w / 2.0 + PANEL_IMAGE_SIZE + 2.0 * pad,
                w - 3.0 * pad - PANEL_IMAGE_SIZE,
            )
        } else {
            (-w / 2.0 + pad, w - 2.0 * pad)
        };

        let body = match config.text.as_deref().filter(|t| !t.is_empty()) {
            Some(text) => wrap_text(text, text_max_width, PANEL_BODY_SIZE)
                .into_iter()
                .enumerate()
                .map(|(i, line)| {
                    placement(measure, &line, PANEL_BODY_SIZE, PANEL_BODY_DEPTH, |_| {
                        Vec3::new(
                            text_start_x,
                            content_y - PANEL_BODY_SIZE / 2.0 - i as f32 * PANEL_LINE_HEIGHT,
                            PANEL_FRONT_Z,
                        )
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        let image_center = has_image.then(|| {
            Vec3::new(
                -w / 2.0 + PANEL_IMAGE_SIZE / 2.0 + pad,
                content_y - PANEL_IMAGE_SIZE / 2.0,
                PANEL_IMAGE_Z,
            )
        });

        // URL buttons share one row along the bottom edge, centered as a group.
        let row_y = -h / 2.0 + URL_BUTTON_HEIGHT / 2.0 + URL_BOTTOM_MARGIN;
        let extents: Vec<Vec2> = config
            .urls
            .iter()
            .map(|u| measure.extent(&u.title, PANEL_BODY_SIZE))
            .collect();
        let total: f32 = extents
            .iter()
            .map(|e| e.x + URL_BUTTON_PADDING + URL_BUTTON_SPACING)
            .sum::<f32>()
            - URL_BUTTON_SPACING;
        let mut start_x = -total / 2.0;
        let mut url_buttons = Vec::with_capacity(config.urls.len());
        for (link, extent) in config.urls.iter().zip(extents) {
            let width = extent.x + URL_BUTTON_PADDING;
            let cx = start_x + width / 2.0;
            url_buttons.push(UrlButtonLayout {
                title: link.title.clone(),
                url: link.url.clone(),
                center: Vec3::new(cx, row_y, PANEL_BUTTON_Z),
                width,
                label: TextPlacement {
                    text: link.title.clone(),
                    size: PANEL_BODY_SIZE,
                    depth: PANEL_BODY_DEPTH,
                    origin: Vec3::new(cx - extent.x / 2.0, row_y - extent.y / 2.0, PANEL_FRONT_Z),
                    extent,
                },
            });
            start_x += width + URL_BUTTON_SPACING;
        }

        let cx = -w / 2.0 + CLOSE_SIZE / 2.0 + CLOSE_INSET;
        let cy = h / 2.0 - CLOSE_SIZE / 2.0 - CLOSE_INSET;
        let close_label = placement(measure, "X", CLOSE_TEXT_SIZE, PANEL_BODY_DEPTH, |e| {
            Vec3::new(cx - e.x / 2.0, cy - e.y / 2.0, PANEL_FRONT_Z)
        });

        Self {
            title,
            underline_center: Vec3::new(0.0, h * PANEL_UNDERLINE_Y, PANEL_FRONT_Z),
            underline_size: Vec2::new(w * PANEL_UNDERLINE_WIDTH, PANEL_UNDERLINE_HEIGHT),
            text_start_x,
            text_max_width,
            body,
            image_center,
            url_buttons,
            close_center: Vec3::new(cx, cy, PANEL_BUTTON_Z),
            close_label,
        }
    }
}

/// Handles to a realized panel.
#[derive(Clone, Debug)]
pub struct InfoPanel {
    pub group: NodeId,
    pub panel: NodeId,
    /// Every element, in creation order, starting fully transparent.
    pub objects_to_animate: Vec<NodeId>,
    /// Clickable nodes this panel registered (URL buttons, then close).
    pub clickables: Vec<NodeId>,
    pub image_url: Option<String>,
    pub image: Option<NodeId>,
    pub close: NodeId,
    image_center: Option<Vec3>,
}

struct PanelBuilder<'a> {
    scene: &'a mut Scene,
    face: &'a Typeface,
    group: NodeId,
    panel: NodeId,
    rotation: glam::Quat,
    objects: Vec<NodeId>,
}

impl PanelBuilder<'_> {
    /// Add `node` to the group at a panel-local position, sharing the panel's rotation.
    fn place(&mut self, local: Vec3, node: Node) -> NodeId {
        let world = self.scene.local_to_world(self.panel, local);
        let node = node.with_transform(Transform {
            translation: world,
            rotation: self.rotation,
            scale: Vec3::ONE,
        });
        let id = self.scene.add_child(self.group, node);
        self.objects.push(id);
        id
    }

    fn text(&mut self, p: &TextPlacement, color: u32) -> NodeId {
        let text = TextGeometry::new(self.face, &p.text, TextStyle::flat(p.size, p.depth));
        let geo = self.scene.add_line_geometry(text.outline);
        self.place(p.origin, Node::mesh(p.text.clone(), geo, Material::hidden(color)))
    }

    /// Box with a matching outline; returns (box, outline).
    fn framed_box(
        &mut self,
        name: &str,
        center: Vec3,
        size: Vec3,
        fill: u32,
        stroke: u32,
    ) -> (NodeId, NodeId) {
        let body = box_geometry(size.x, size.y, size.z, 1, 1, 1);
        let edges = edges_geometry(&body, EDGE_THRESHOLD_DEG);
        let body_geo = self.scene.add_mesh_geometry(body);
        let edges_geo = self.scene.add_line_geometry(edges);
        let b = self.place(center, Node::mesh(name, body_geo, Material::hidden(fill)));
        let o = self.place(
            center,
            Node::mesh(format!("{name} outline"), edges_geo, Material::hidden(stroke)),
        );
        (b, o)
    }
}

/// Build an info panel at `position`/`rotation` (Euler XYZ) and register its buttons.
///
/// `on_back` becomes the close button's action.
pub fn create_info_panel(
    scene: &mut Scene,
    config: &PanelConfig,
    position: Vec3,
    rotation: Vec3,
    clickables: &mut Clickables,
    on_back: ClickAction,
    face: &Typeface,
) -> InfoPanel {
    let layout = PanelLayout::compute(config, face);
    let group = scene.add(Node::group(format!("panel: {}", config.title)));

    let plane = plane_geometry(PANEL_WIDTH, PANEL_HEIGHT);
    let border = edges_geometry(&plane, EDGE_THRESHOLD_DEG);
    let plane_geo = scene.add_mesh_geometry(plane);
    let border_geo = scene.add_line_geometry(border);
    let transform = Transform::from_position_euler(position, rotation);
    let panel = scene.add_child(
        group,
        Node::mesh(
            "panel background",
            plane_geo,
            Material::hidden(PANEL_BACKGROUND).with_double_side(),
        )
        .with_transform(transform),
    );
    let border = scene.add_child(
        group,
        Node::mesh("panel border", border_geo, Material::hidden(PANEL_BORDER_COLOR))
            .with_transform(transform),
    );

    let mut b = PanelBuilder {
        scene,
        face,
        group,
        panel,
        rotation: euler_xyz(rotation),
        objects: vec![panel, border],
    };

    b.text(&layout.title, PANEL_ACCENT);
    let underline = plane_geometry(layout.underline_size.x, layout.underline_size.y);
    let underline_geo = b.scene.add_mesh_geometry(underline);
    b.place(
        layout.underline_center,
        Node::mesh("underline", underline_geo, Material::hidden(PANEL_ACCENT)),
    );

    for line in &layout.body {
        b.text(line, PANEL_BODY_COLOR);
    }

    let mut registered = Vec::with_capacity(layout.url_buttons.len() + 1);
    for ub in &layout.url_buttons {
        let (button, outline) = b.framed_box(
            &ub.title,
            ub.center,
            Vec3::new(ub.width, URL_BUTTON_HEIGHT, URL_BUTTON_DEPTH),
            URL_BUTTON_COLOR,
            URL_BUTTON_OUTLINE,
        );
        let label = b.text(&ub.label, LABEL_COLOR);
        let mut interaction = Interaction::new(
            URL_BUTTON_COLOR,
            URL_BUTTON_HOVER,
            ClickAction::OpenUrl(ub.url.clone()),
        );
        interaction.title = Some(ub.title.clone());
        interaction.text_node = Some(label);
        interaction.outline_node = Some(outline);
        b.scene.node_mut(button).interaction = Some(interaction);
        registered.push(button);
    }

    let (close, close_outline) = b.framed_box(
        "close",
        layout.close_center,
        Vec3::new(CLOSE_SIZE, CLOSE_SIZE, CLOSE_DEPTH),
        CLOSE_COLOR,
        CLOSE_OUTLINE,
    );
    let close_label = b.text(&layout.close_label, LABEL_COLOR);
    let mut interaction = Interaction::new(CLOSE_COLOR, CLOSE_HOVER, on_back);
    interaction.text_node = Some(close_label);
    interaction.outline_node = Some(close_outline);
    interaction.panel_group = Some(group);
    interaction.objects_to_animate = b.objects.clone();
    b.scene.node_mut(close).interaction = Some(interaction);
    registered.push(close);

    let objects_to_animate = b.objects;
    for &id in &registered {
        clickables.push(id);
    }

    InfoPanel {
        group,
        panel,
        objects_to_animate,
        clickables: registered,
        image_url: config.image_url.clone().filter(|u| !u.is_empty()),
        image: None,
        close,
        image_center: layout.image_center,
    }
}

impl InfoPanel {
    /// Place a loaded image in the panel's image slot. Returns `None` when the
    /// panel has no slot or already has an image.
    pub fn attach_image(&mut self, scene: &mut Scene, texture: TextureData) -> Option<NodeId> {
        let local = self.image_center?;
        if self.image.is_some() {
            return None;
        }
        let tex = scene.add_texture(texture);
        let geo = scene.add_mesh_geometry(plane_geometry(PANEL_IMAGE_SIZE, PANEL_IMAGE_SIZE));
        let material = Material {
            texture: Some(tex),
            ..Material::hidden(0xffffff)
        };
        let world = scene.local_to_world(self.panel, local);
        let rotation = scene.node(self.panel).transform.rotation;
        let id = scene.add_child(
            self.group,
            Node::mesh("panel image", geo, material).with_transform(Transform {
                translation: world,
                rotation,
                scale: Vec3::ONE,
            }),
        );
        self.objects_to_animate.push(id);
        // the close button fades the same element list
        if let Some(interaction) = scene.node_mut(self.close).interaction.as_mut() {
            interaction.objects_to_animate.push(id);
        }
        self.image = Some(id);
        Some(id)
    }
}
