use crate::color::Color;
use crate::scene::NodeId;
use crate::widgets::PanelConfig;
use glam::Vec3;

/// Where a scene button leads: the panel it opens and the camera pose to view it from.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonTarget {
    pub panel: PanelConfig,
    pub panel_position: Vec3,
    pub panel_rotation: Vec3,
    pub camera_position: Vec3,
    pub camera_rotation: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickAction {
    OpenPanel(Box<ButtonTarget>),
    OpenUrl(String),
    ClosePanel,
}

/// Click/hover metadata attached to a clickable node.
#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
    pub original_color: Color,
    pub hover_color: Color,
    pub pressed_color: Option<Color>,
    pub action: ClickAction,
    pub title: Option<String>,
    pub text_node: Option<NodeId>,
    pub outline_node: Option<NodeId>,
    pub panel_group: Option<NodeId>,
    /// Panel elements a close button fades out.
    pub objects_to_animate: Vec<NodeId>,
}

impl Interaction {
    pub fn new(original: u32, hover: u32, action: ClickAction) -> Self {
        Self {
            original_color: Color::from_hex(original),
            hover_color: Color::from_hex(hover),
            pressed_color: None,
            action,
            title: None,
            text_node: None,
            outline_node: None,
            panel_group: None,
            objects_to_animate: Vec::new(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.action {
            ClickAction::OpenUrl(url) => Some(url),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<&ButtonTarget> {
        match &self.action {
            ClickAction::OpenPanel(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the fields the click handler needs for `action` are present.
    pub fn is_consistent(&self) -> bool {
        match &self.action {
            ClickAction::OpenPanel(_) => true,
            ClickAction::OpenUrl(url) => !url.is_empty(),
            ClickAction::ClosePanel => self.panel_group.is_some(),
        }
    }
}

/// Nodes the pointer ray is tested against, in registration order.
#[derive(Clone, Debug, Default)]
pub struct Clickables(Vec<NodeId>);

impl Clickables {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, id: NodeId) {
        if !self.0.contains(&id) {
            self.0.push(id);
        }
    }

    pub fn remove_all(&mut self, ids: &[NodeId]) {
        self.0.retain(|id| !ids.contains(id));
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }
}
