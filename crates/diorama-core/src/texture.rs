use crate::error::Result;

/// Decoded RGBA8 image ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Decode PNG/JPEG bytes as fetched from a panel's image URL.
    ///
    /// Rows are flipped so the image's top lands at v = 1, matching the UV
    /// layout of [`plane_geometry`](crate::geometry::plane_geometry).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?.flipv().to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Convert an image embedded in a glTF document; unsupported formats yield `None`.
    pub fn from_gltf(data: &gltf::image::Data) -> Option<Self> {
        use gltf::image::Format;
        let rgba = match data.format {
            Format::R8G8B8A8 => data.pixels.clone(),
            Format::R8G8B8 => data
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            Format::R8G8 => data
                .pixels
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            Format::R8 => data.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
            other => {
                log::warn!("[texture] unsupported glTF image format {:?}", other);
                return None;
            }
        };
        Some(Self {
            width: data.width,
            height: data.height,
            rgba,
        })
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(TextureData::decode(b"not an image").is_err());
    }
}
