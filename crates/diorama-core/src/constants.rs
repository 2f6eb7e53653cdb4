// Widget dimensions, palette and typography shared by layout and tests.

// Scene buttons
pub const BUTTON_WIDTH: f32 = 3.5;
pub const BUTTON_HEIGHT: f32 = 1.2;
pub const BUTTON_DEPTH: f32 = 0.3;
pub const BUTTON_SEGMENTS: [u32; 3] = [4, 4, 2];
pub const BUTTON_CORNER_FACTOR: f32 = 0.9; // xy shrink applied to corner vertices
pub const BUTTON_CORNER_ZONE: f32 = 0.8; // fraction of half extents counted as "corner"
pub const BUTTON_TEXT_SIZE: f32 = 0.4;
pub const BUTTON_TEXT_DEPTH: f32 = 0.05;
pub const BUTTON_TEXT_BEVEL_SIZE: f32 = 0.01;
pub const BUTTON_TEXT_BEVEL_THICKNESS: f32 = 0.02;
pub const BUTTON_TEXT_LIFT: f32 = 0.1; // gap in front of the button face

pub const BUTTON_COLOR: u32 = 0x5c6bc0;
pub const BUTTON_HOVER_COLOR: u32 = 0x7986cb;
pub const BUTTON_PRESSED_COLOR: u32 = 0x3f51b5;
pub const BUTTON_EMISSIVE: u32 = 0x1a237e;
pub const BUTTON_EMISSIVE_INTENSITY: f32 = 0.1;
pub const BUTTON_OUTLINE_COLOR: u32 = 0x3f51b5;
pub const BUTTON_METALNESS: f32 = 0.3;
pub const BUTTON_ROUGHNESS: f32 = 0.4;

// Info panel (panel-local units)
pub const PANEL_WIDTH: f32 = 16.0;
pub const PANEL_HEIGHT: f32 = 12.0;
pub const PANEL_PADDING: f32 = 0.5;
pub const PANEL_FRONT_Z: f32 = 0.25; // text and underline offset
pub const PANEL_IMAGE_Z: f32 = 0.3;
pub const PANEL_BUTTON_Z: f32 = 0.1;
pub const PANEL_BORDER_COLOR: u32 = 0x333333;
pub const PANEL_BACKGROUND: u32 = 0xffffff;

pub const PANEL_TITLE_SIZE: f32 = 0.5;
pub const PANEL_TITLE_DEPTH: f32 = 0.05;
pub const PANEL_TITLE_Y: f32 = 0.40; // fraction of panel height
pub const PANEL_UNDERLINE_Y: f32 = 0.39;
pub const PANEL_UNDERLINE_WIDTH: f32 = 0.7; // fraction of panel width
pub const PANEL_UNDERLINE_HEIGHT: f32 = 0.05;
pub const PANEL_ACCENT: u32 = 0x2196f3;

pub const PANEL_CONTENT_Y: f32 = 0.3; // fraction of panel height
pub const PANEL_IMAGE_SIZE: f32 = 6.0;
pub const PANEL_BODY_SIZE: f32 = 0.3;
pub const PANEL_BODY_DEPTH: f32 = 0.02;
pub const PANEL_LINE_HEIGHT: f32 = 0.5;
pub const PANEL_BODY_COLOR: u32 = 0x555555;

pub const URL_BUTTON_HEIGHT: f32 = 0.8;
pub const URL_BUTTON_SPACING: f32 = 0.4;
pub const URL_BUTTON_PADDING: f32 = 0.6;
pub const URL_BUTTON_DEPTH: f32 = 0.2;
pub const URL_BOTTOM_MARGIN: f32 = 0.5;
pub const URL_BUTTON_COLOR: u32 = 0x2196f3;
pub const URL_BUTTON_HOVER: u32 = 0x42a5f5;
pub const URL_BUTTON_OUTLINE: u32 = 0x1976d2;

pub const CLOSE_SIZE: f32 = 0.8;
pub const CLOSE_INSET: f32 = 0.3;
pub const CLOSE_DEPTH: f32 = 0.2;
pub const CLOSE_TEXT_SIZE: f32 = 0.5;
pub const CLOSE_COLOR: u32 = 0xff5252;
pub const CLOSE_HOVER: u32 = 0xff7676;
pub const CLOSE_OUTLINE: u32 = 0xd32f2f;

pub const LABEL_COLOR: u32 = 0xffffff;

// Text
pub const APPROX_CHAR_WIDTH: f32 = 0.6; // of font size, used by word wrap
pub const CURVE_SEGMENTS: usize = 12;
pub const EDGE_THRESHOLD_DEG: f32 = 1.0;

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;
pub const CAMERA_START_POSITION: [f32; 3] = [-46.0, 10.0, -23.0];
pub const CAMERA_START_ROTATION: [f32; 3] = [-2.0, -1.0, -2.0];
pub const CAMERA_MOVE_SECONDS: f32 = 3.0;

// Panel transitions
pub const PANEL_FADE_SECONDS: f32 = 1.0;
pub const PANEL_FLIGHT_SECONDS: f32 = 2.0;

// Audio
pub const MUSIC_VOLUME: f32 = 0.5;
pub const MUSIC_REF_DISTANCE: f32 = 20.0; // panner distance at full volume
pub const MUSIC_MAX_DISTANCE: f32 = 500.0;
