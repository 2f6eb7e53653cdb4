//! Everything one running scene owns, plus the pointer handling that turns
//! button clicks into panel flights.

use crate::camera::Camera;
use crate::color::Color;
use crate::config::SceneConfig;
use crate::constants::{PANEL_FADE_SECONDS, PANEL_FLIGHT_SECONDS};
use crate::error::Result;
use crate::model::{load_model, scatter_models, ModelRegistry, ModelSpec};
use crate::picking::{pick, Hit, Ray};
use crate::scene::{ClickAction, Clickables, NodeId, Scene};
use crate::text::Typeface;
use crate::texture::TextureData;
use crate::tween::{CameraPath, OpacityFade, Waypoint};
use crate::widgets::{add_button, create_info_panel, ButtonHandles, ButtonSpec, InfoPanel};
use fnv::FnvHashMap;

/// What the front-end has to do after a click.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    Nothing,
    /// Fetch `image_url` (if any) and hand it back via [`Stage::attach_panel_image`].
    PanelOpened {
        button: NodeId,
        group: NodeId,
        image_url: Option<String>,
    },
    OpenUrl(String),
    PanelClosed { group: NodeId },
}

struct ActiveFade {
    group: NodeId,
    fade: OpacityFade,
    hide_when_done: bool,
}

struct OpenPanel {
    button: NodeId,
    return_to: Waypoint,
}

pub struct Stage {
    pub scene: Scene,
    pub camera: Camera,
    pub clickables: Clickables,
    pub models: ModelRegistry,
    pub background: Color,
    camera_path: CameraPath,
    fades: Vec<ActiveFade>,
    hovered: Option<NodeId>,
    pressed: Option<NodeId>,
    /// Panels are built on first open and kept per scene button.
    panels: FnvHashMap<NodeId, InfoPanel>,
    open: Option<OpenPanel>,
    face: Option<Typeface>,
}

impl Stage {
    pub fn new(config: &SceneConfig) -> Self {
        let mut camera = Camera::new(1.0).with_pose(config.camera.position, config.camera.rotation);
        camera.fov_deg = config.camera.fov_deg;
        Self {
            scene: Scene::new(),
            camera,
            clickables: Clickables::new(),
            models: ModelRegistry::new(),
            background: config.background,
            camera_path: CameraPath::from_waypoints(config.camera.intro.iter().copied()),
            fades: Vec::new(),
            hovered: None,
            pressed: None,
            panels: FnvHashMap::default(),
            open: None,
            face: None,
        }
    }

    pub fn set_typeface(&mut self, face: Typeface) {
        log::info!("[stage] typeface {} ready", face.family());
        self.face = Some(face);
    }

    #[inline]
    pub fn typeface(&self) -> Option<&Typeface> {
        self.face.as_ref()
    }

    #[inline]
    pub fn camera_path_mut(&mut self) -> &mut CameraPath {
        &mut self.camera_path
    }

    /// Add one scene button. Needs the typeface.
    pub fn add_button(&mut self, spec: ButtonSpec) -> Option<ButtonHandles> {
        let Some(face) = self.face.as_ref() else {
            log::warn!("[stage] button {:?} skipped: no typeface", spec.title);
            return None;
        };
        Some(add_button(&mut self.scene, &mut self.clickables, face, spec))
    }

    pub fn add_buttons(&mut self, config: &SceneConfig) -> Vec<ButtonHandles> {
        config
            .button_specs()
            .filter_map(|spec| self.add_button(spec))
            .collect()
    }

    /// Load a model (or its scattered copies) from already-fetched bytes.
    pub fn load_model(&mut self, bytes: &[u8], spec: &ModelSpec) -> Result<Vec<NodeId>> {
        match &spec.scatter {
            Some(scatter) => scatter_models(
                &mut self.scene,
                &mut self.models,
                bytes,
                spec,
                scatter,
                &mut rand::thread_rng(),
            ),
            None => load_model(&mut self.scene, &mut self.models, bytes, spec).map(|id| vec![id]),
        }
    }

    #[inline]
    pub fn pick(&self, ray: &Ray) -> Option<Hit> {
        pick(&self.scene, &self.clickables, ray)
    }

    #[inline]
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn open_panel(&self) -> Option<&InfoPanel> {
        self.open.as_ref().and_then(|o| self.panels.get(&o.button))
    }

    pub fn panel_for(&self, button: NodeId) -> Option<&InfoPanel> {
        self.panels.get(&button)
    }

    fn paint(&mut self, id: NodeId, pick_color: impl Fn(&crate::scene::Interaction) -> Color) {
        let Some(color) = self.scene.node(id).interaction.as_ref().map(pick_color) else {
            return;
        };
        self.scene.set_color(id, color);
    }

    /// Hover highlight. Returns the hovered clickable.
    pub fn pointer_move(&mut self, ray: &Ray) -> Option<NodeId> {
        let hit = self.pick(ray).map(|h| h.node);
        if hit != self.hovered {
            if let Some(prev) = self.hovered.take() {
                if self.pressed != Some(prev) {
                    self.paint(prev, |i| i.original_color);
                }
            }
            if let Some(id) = hit {
                if self.pressed != Some(id) {
                    self.paint(id, |i| i.hover_color);
                }
            }
            self.hovered = hit;
        }
        hit
    }

    pub fn pointer_down(&mut self, ray: &Ray) {
        let Some(hit) = self.pick(ray) else {
            return;
        };
        self.paint(hit.node, |i| i.pressed_color.unwrap_or(i.hover_color));
        self.pressed = Some(hit.node);
    }

    /// A click fires when the pointer is released over the node it went down on.
    pub fn pointer_up(&mut self, ray: &Ray) -> ClickOutcome {
        let Some(pressed) = self.pressed.take() else {
            return ClickOutcome::Nothing;
        };
        let hit = self.pick(ray).map(|h| h.node);
        if hit == Some(pressed) {
            self.paint(pressed, |i| i.hover_color);
            self.hovered = Some(pressed);
            self.activate(pressed)
        } else {
            self.paint(pressed, |i| i.original_color);
            ClickOutcome::Nothing
        }
    }

    /// Dispatch the action of a clickable node.
    pub fn activate(&mut self, id: NodeId) -> ClickOutcome {
        let Some(action) = self
            .scene
            .node(id)
            .interaction
            .as_ref()
            .map(|i| i.action.clone())
        else {
            return ClickOutcome::Nothing;
        };
        match action {
            ClickAction::OpenPanel(target) => self.show_panel(id, *target),
            ClickAction::OpenUrl(url) => {
                log::info!("[stage] open {url}");
                ClickOutcome::OpenUrl(url)
            }
            ClickAction::ClosePanel => match self.close_panel() {
                Some(group) => ClickOutcome::PanelClosed { group },
                None => ClickOutcome::Nothing,
            },
        }
    }

    fn start_fade(&mut self, group: NodeId, nodes: &[NodeId], target: f32, hide_when_done: bool) {
        self.fades.retain(|f| f.group != group);
        self.fades.push(ActiveFade {
            group,
            fade: OpacityFade::to(&self.scene, nodes, target, PANEL_FADE_SECONDS),
            hide_when_done,
        });
    }

    fn show_panel(&mut self, button: NodeId, target: crate::scene::ButtonTarget) -> ClickOutcome {
        let return_to = match self.open.take() {
            Some(prev) if prev.button == button => {
                self.open = Some(prev);
                return ClickOutcome::Nothing;
            }
            Some(prev) => {
                self.hide_panel(prev.button);
                prev.return_to
            }
            None => Waypoint::new(self.camera.position, self.camera.rotation, PANEL_FLIGHT_SECONDS),
        };

        if !self.panels.contains_key(&button) {
            let Some(face) = self.face.as_ref() else {
                log::warn!("[stage] panel {:?} skipped: no typeface", target.panel.title);
                return ClickOutcome::Nothing;
            };
            let panel = create_info_panel(
                &mut self.scene,
                &target.panel,
                target.panel_position,
                target.panel_rotation,
                &mut self.clickables,
                ClickAction::ClosePanel,
                face,
            );
            self.panels.insert(button, panel);
        }
        let Some(panel) = self.panels.get(&button) else {
            return ClickOutcome::Nothing;
        };
        let group = panel.group;
        let objects = panel.objects_to_animate.clone();
        let image_url = panel.image.is_none().then(|| panel.image_url.clone()).flatten();
        for &id in &panel.clickables {
            self.clickables.push(id);
        }

        self.scene.set_visible(group, true);
        self.start_fade(group, &objects, 1.0, false);
        self.camera_path.replace([Waypoint::new(
            target.camera_position,
            target.camera_rotation,
            PANEL_FLIGHT_SECONDS,
        )]);
        self.open = Some(OpenPanel { button, return_to });
        log::info!("[stage] panel {:?} opened", target.panel.title);

        ClickOutcome::PanelOpened {
            button,
            group,
            image_url,
        }
    }

    /// Fade a panel out and stop it from taking clicks. It stays in the scene
    /// for the next open.
    fn hide_panel(&mut self, button: NodeId) {
        let Some(panel) = self.panels.get(&button) else {
            return;
        };
        let group = panel.group;
        let objects = panel.objects_to_animate.clone();
        let clickables = panel.clickables.clone();
        self.clickables.remove_all(&clickables);
        for slot in [&mut self.hovered, &mut self.pressed] {
            if slot.is_some_and(|id| clickables.contains(&id)) {
                *slot = None;
            }
        }
        for id in clickables {
            self.paint(id, |i| i.original_color);
        }
        self.start_fade(group, &objects, 0.0, true);
    }

    /// Close the open panel and fly back to where the camera was before it
    /// opened. Returns the panel's group.
    pub fn close_panel(&mut self) -> Option<NodeId> {
        let open = self.open.take()?;
        self.hide_panel(open.button);
        self.camera_path.replace([open.return_to]);
        let group = self.panels.get(&open.button).map(|p| p.group);
        log::info!("[stage] panel closed");
        group
    }

    /// Attach a fetched image to the panel opened from `button`.
    pub fn attach_panel_image(&mut self, button: NodeId, texture: TextureData) -> Option<NodeId> {
        let panel = self.panels.get_mut(&button)?;
        let group = panel.group;
        let image = panel.attach_image(&mut self.scene, texture)?;
        let showing = self.open.as_ref().is_some_and(|o| o.button == button);
        if showing {
            self.fades.push(ActiveFade {
                group,
                fade: OpacityFade::to(&self.scene, &[image], 1.0, PANEL_FADE_SECONDS),
                hide_when_done: false,
            });
        }
        Some(image)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        !self.camera_path.is_idle() || !self.fades.is_empty()
    }

    /// Advance camera flight, fades and model animation.
    pub fn update(&mut self, dt: f32) {
        self.camera_path.update(&mut self.camera, dt);

        let scene = &mut self.scene;
        self.fades.retain_mut(|f| {
            if !f.fade.update(scene, dt) {
                return true;
            }
            if f.hide_when_done {
                scene.set_visible(f.group, false);
            }
            false
        });

        self.models.update(dt, &mut self.scene);
    }
}
