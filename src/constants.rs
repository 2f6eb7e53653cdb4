/// Front-end tuning: where things live on the page and how the frame loop behaves.
// Preset fetched at startup; the embedded preset is used when it is missing.
pub const PRESET_URL: &str = "scene.json";

// Frame deltas above this are clamped (tab switches, breakpoints)
pub const MAX_FRAME_DT: f32 = 0.1;

// Directional light used for lit materials
pub const LIGHT_DIR: [f32; 3] = [0.4, 0.8, 0.45];
pub const AMBIENT: f32 = 0.35;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

// Per-draw uniform slot stride; WebGPU requires 256-byte alignment for dynamic offsets
pub const DRAW_UNIFORM_STRIDE: u64 = 256;
pub const INITIAL_DRAW_SLOTS: usize = 256;
