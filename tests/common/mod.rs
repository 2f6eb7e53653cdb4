// Fixtures shared by the host-side tests: a tiny typeface and a GLB builder.

#![allow(dead_code)]

use diorama_core::Typeface;
use serde_json::json;

/// Every glyph is a 500x700 box (font units, resolution 1000) advancing 600;
/// space advances 300 and has no outline.
pub const BOX_FONT: &str = r#"{
  "familyName": "Box Sans",
  "resolution": 1000,
  "boundingBox": { "yMin": -200, "yMax": 800, "xMin": 0, "xMax": 600 },
  "underlineThickness": 50,
  "glyphs": {
    "?": { "ha": 600, "o": "m 0 0 l 500 0 l 500 700 l 0 700 z" },
    "X": { "ha": 600, "o": "m 0 0 l 500 0 l 500 700 l 0 700 z" },
    "O": { "ha": 600, "o": "m 0 350 q 250 0 0 0 q 500 350 500 0 q 250 700 500 700 q 0 350 0 700" },
    " ": { "ha": 300 }
  }
}"#;

pub fn box_font() -> Typeface {
    Typeface::from_json(BOX_FONT).expect("fixture font parses")
}

fn push_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

/// A one-triangle GLB whose node "fin" slides from x=0 to x=2 over one
/// second in the clip "swim".
pub fn triangle_glb() -> Vec<u8> {
    triangle_glb_with_indices([0, 1, 2])
}

/// The same model with the given triangle indices; out-of-range values make it malformed.
pub fn triangle_glb_with_indices(indices: [u32; 3]) -> Vec<u8> {
    let mut bin = Vec::new();
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]); // 0..36
    for i in indices {
        bin.extend_from_slice(&i.to_le_bytes()); // 36..48
    }
    push_f32s(&mut bin, &[0.0, 1.0]); // 48..56
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0]); // 56..80

    let doc = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "fin", "mesh": 0 }],
        "meshes": [{
            "name": "tri",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
        }],
        "buffers": [{ "byteLength": bin.len() }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 12 },
            { "buffer": 0, "byteOffset": 48, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 56, "byteLength": 24 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5125, "count": 3, "type": "SCALAR" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 3, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "animations": [{
            "name": "swim",
            "channels": [{ "sampler": 0, "target": { "node": 0, "path": "translation" } }],
            "samplers": [{ "input": 2, "output": 3, "interpolation": "LINEAR" }]
        }]
    });
    glb(&serde_json::to_vec(&doc).expect("json"), &bin)
}

fn glb(json: &[u8], bin: &[u8]) -> Vec<u8> {
    let mut json = json.to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}
