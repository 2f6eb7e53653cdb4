use thiserror::Error;

#[derive(Debug, Error)]
pub enum DioramaError {
    #[error("typeface: {0}")]
    Typeface(String),
    #[error("scene config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("glTF import: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF primitive {mesh}/{primitive}: unsupported mode {mode:?}")]
    UnsupportedPrimitive {
        mesh: String,
        primitive: usize,
        mode: gltf::mesh::Mode,
    },
    #[error("glTF primitive {mesh}/{primitive}: missing POSITION")]
    MissingPositions { mesh: String, primitive: usize },
    #[error("glTF primitive {mesh}/{primitive}: index {index} out of range for {vertices} vertices")]
    IndexOutOfRange {
        mesh: String,
        primitive: usize,
        index: u32,
        vertices: usize,
    },
    #[error("glTF document has no scene")]
    EmptyDocument,
    #[error("image decode: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, DioramaError>;
