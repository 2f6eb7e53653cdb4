//! Clickable scene buttons and text info panels.

mod button;
mod panel;

pub use button::{add_button, ButtonHandles, ButtonSpec};
pub use panel::{
    create_info_panel, InfoPanel, PanelConfig, PanelLayout, TextPlacement, UrlButtonLayout,
    UrlLink,
};
