use crate::constants::*;
use crate::geometry::{box_geometry, edges_geometry, soften_corners};
use crate::scene::{ClickAction, Clickables, Interaction, Material, Node, NodeId, Scene};
use crate::text::{TextGeometry, TextStyle, Typeface};
use glam::Vec3;

#[derive(Clone, Debug)]
pub struct ButtonSpec {
    pub title: String,
    pub position: Vec3,
    pub on_click: ClickAction,
}

#[derive(Clone, Copy, Debug)]
pub struct ButtonHandles {
    pub button: NodeId,
    pub outline: NodeId,
    pub label: NodeId,
}

/// Build a rounded, outlined, labelled button and register it as clickable.
pub fn add_button(
    scene: &mut Scene,
    clickables: &mut Clickables,
    face: &Typeface,
    spec: ButtonSpec,
) -> ButtonHandles {
    let [ws, hs, ds] = BUTTON_SEGMENTS;
    let mut body = box_geometry(BUTTON_WIDTH, BUTTON_HEIGHT, BUTTON_DEPTH, ws, hs, ds);
    soften_corners(
        &mut body,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
        BUTTON_CORNER_ZONE,
        BUTTON_CORNER_FACTOR,
    );
    let edges = edges_geometry(&body, EDGE_THRESHOLD_DEG);

    let body_geo = scene.add_mesh_geometry(body);
    let material = Material::standard(BUTTON_COLOR, BUTTON_METALNESS, BUTTON_ROUGHNESS)
        .with_emissive(BUTTON_EMISSIVE, BUTTON_EMISSIVE_INTENSITY);
    let button = scene.add(Node::mesh(spec.title.clone(), body_geo, material).at(spec.position));

    let edges_geo = scene.add_line_geometry(edges);
    let outline = scene.add(
        Node::mesh(
            format!("{} outline", spec.title),
            edges_geo,
            Material::basic(BUTTON_OUTLINE_COLOR),
        )
        .at(spec.position),
    );

    let text = TextGeometry::new(
        face,
        &spec.title,
        TextStyle::bevelled(
            BUTTON_TEXT_SIZE,
            BUTTON_TEXT_DEPTH,
            BUTTON_TEXT_BEVEL_THICKNESS,
            BUTTON_TEXT_BEVEL_SIZE,
        ),
    );
    let label_pos = Vec3::new(
        spec.position.x - text.width() / 2.0,
        spec.position.y - text.height() / 2.0,
        spec.position.z + BUTTON_DEPTH / 2.0 + BUTTON_TEXT_LIFT,
    );
    let label_geo = scene.add_line_geometry(text.outline);
    let label = scene.add(
        Node::mesh(
            format!("{} label", spec.title),
            label_geo,
            Material::basic(LABEL_COLOR),
        )
        .at(label_pos),
    );

    let mut interaction = Interaction::new(BUTTON_COLOR, BUTTON_HOVER_COLOR, spec.on_click);
    interaction.pressed_color = Some(crate::color::Color::from_hex(BUTTON_PRESSED_COLOR));
    interaction.title = Some(spec.title);
    interaction.text_node = Some(label);
    interaction.outline_node = Some(outline);
    scene.node_mut(button).interaction = Some(interaction);
    clickables.push(button);

    ButtonHandles {
        button,
        outline,
        label,
    }
}
