//! Platform-independent core of diorama.
//!
//! Everything here builds and runs on the host: scene graph, widget layout,
//! geometry, camera paths, glTF animation and picking. The wasm front-end
//! owns the DOM, WebGPU and WebAudio side and drives a [`Stage`] per frame.

pub mod animation;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod model;
pub mod picking;
pub mod random;
pub mod scene;
pub mod stage;
pub mod text;
pub mod texture;
pub mod tween;
pub mod widgets;

pub use animation::{AnimationClip, AnimationMixer};
pub use camera::Camera;
pub use color::Color;
pub use config::{MusicConfig, SceneConfig};
pub use error::DioramaError;
pub use model::{ModelRegistry, ModelSpec};
pub use picking::{Hit, Ray};
pub use scene::{ClickAction, Clickables, Interaction, NodeId, Scene};
pub use stage::{ClickOutcome, Stage};
pub use text::{wrap_text, TextMeasure, Typeface};
pub use texture::TextureData;
pub use tween::{CameraPath, OpacityFade, Waypoint};
pub use widgets::{add_button, create_info_panel, ButtonSpec, InfoPanel, PanelConfig};
