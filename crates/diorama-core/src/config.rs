//! Scene presets.
//!
//! Each variant of the scene (button row, camera script, models, music) is a
//! JSON document deserialized into [`SceneConfig`]. Missing fields fall back
//! to the built-in defaults.

use crate::color::Color;
use crate::constants::*;
use crate::error::{DioramaError, Result};
use crate::model::ModelSpec;
use crate::scene::{ButtonTarget, ClickAction};
use crate::tween::{move_to_starting_point, Waypoint};
use crate::widgets::{ButtonSpec, PanelConfig};
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_URL: &str =
    "https://threejs.org/examples/fonts/helvetiker_regular.typeface.json";

/// The preset shipped with the crate.
pub const DEFAULT_PRESET: &str = include_str!("../presets/ocean.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub position: Vec3,
    pub rotation: Vec3,
    /// Flown once after startup.
    pub intro: Vec<Waypoint>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            position: Vec3::from(CAMERA_START_POSITION),
            rotation: Vec3::from(CAMERA_START_ROTATION),
            intro: move_to_starting_point(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonConfig {
    pub title: String,
    pub position: Vec3,
    pub panel: PanelConfig,
    pub panel_position: Vec3,
    #[serde(default)]
    pub panel_rotation: Vec3,
    pub camera_position: Vec3,
    pub camera_rotation: Vec3,
}

impl ButtonConfig {
    pub fn to_spec(&self) -> ButtonSpec {
        ButtonSpec {
            title: self.title.clone(),
            position: self.position,
            on_click: ClickAction::OpenPanel(Box::new(ButtonTarget {
                panel: self.panel.clone(),
                panel_position: self.panel_position,
                panel_rotation: self.panel_rotation,
                camera_position: self.camera_position,
                camera_rotation: self.camera_rotation,
            })),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    pub path: String,
    pub volume: f32,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub autoplay: bool,
    /// Routes the sound through a positional panner when set.
    pub position: Option<Vec3>,
    pub ref_distance: f32,
    pub max_distance: f32,
    /// Browsers keep audio suspended until a gesture; resume on the first one.
    pub resume_on_gesture: bool,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            volume: MUSIC_VOLUME,
            looped: true,
            autoplay: true,
            position: None,
            ref_distance: MUSIC_REF_DISTANCE,
            max_distance: MUSIC_MAX_DISTANCE,
            resume_on_gesture: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub container_id: String,
    pub font_url: String,
    pub background: Color,
    pub camera: CameraConfig,
    pub buttons: Vec<ButtonConfig>,
    pub models: Vec<ModelSpec>,
    pub music: Option<MusicConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            container_id: "container".to_owned(),
            font_url: DEFAULT_FONT_URL.to_owned(),
            background: Color::BLACK,
            camera: CameraConfig::default(),
            buttons: Vec::new(),
            models: Vec::new(),
            music: None,
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(DioramaError::Config)
    }

    /// The embedded preset; falls back to defaults if it fails to parse.
    pub fn preset() -> Self {
        Self::from_json(DEFAULT_PRESET).unwrap_or_else(|e| {
            log::error!("[config] built-in preset: {e}");
            Self::default()
        })
    }

    pub fn button_specs(&self) -> impl Iterator<Item = ButtonSpec> + '_ {
        self.buttons.iter().map(ButtonConfig::to_spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_takes_defaults() {
        let cfg = SceneConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SceneConfig::default());
        assert_eq!(cfg.camera.intro.len(), 2);
    }

    #[test]
    fn embedded_preset_parses() {
        let cfg = SceneConfig::from_json(DEFAULT_PRESET).unwrap();
        assert!(!cfg.buttons.is_empty());
    }
}
