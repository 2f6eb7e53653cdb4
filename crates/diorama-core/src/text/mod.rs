//! Word wrap, typeface metrics and outline text geometry.

mod typeface;
mod wrap;

pub use typeface::{TextGeometry, TextStyle, Typeface};
pub use wrap::{max_chars_per_line, wrap_text};

use crate::constants::APPROX_CHAR_WIDTH;
use glam::Vec2;

/// Anything that can report the laid-out size of a string.
pub trait TextMeasure {
    /// Width and height of `text` rendered at `size` world units.
    fn extent(&self, text: &str, size: f32) -> Vec2;
}

/// Fixed-advance estimate used before a typeface is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn extent(&self, text: &str, size: f32) -> Vec2 {
        let chars = text.chars().count() as f32;
        Vec2::new(chars * size * APPROX_CHAR_WIDTH, if chars > 0.0 { size } else { 0.0 })
    }
}
