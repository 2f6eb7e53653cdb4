use crate::constants::CURVE_SEGMENTS;
use crate::error::{DioramaError, Result};
use crate::geometry::{Aabb, LineData};
use crate::text::TextMeasure;
use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
struct RawGlyph {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBoundingBox {
    y_min: f32,
    y_max: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeface {
    glyphs: HashMap<String, RawGlyph>,
    resolution: f32,
    bounding_box: RawBoundingBox,
    #[serde(default)]
    underline_thickness: f32,
    #[serde(default)]
    family_name: String,
}

#[derive(Clone, Debug)]
struct Glyph {
    advance: f32,
    // Flattened closed contours in font units.
    contours: Vec<Vec<Vec2>>,
}

/// A vector font in the JSON "typeface" format (glyph outlines as `m/l/q/b` commands).
#[derive(Clone, Debug)]
pub struct Typeface {
    family: String,
    resolution: f32,
    line_height: f32,
    glyphs: FnvHashMap<char, Glyph>,
}

impl Typeface {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTypeface =
            serde_json::from_str(json).map_err(|e| DioramaError::Typeface(e.to_string()))?;
        if raw.resolution <= 0.0 {
            return Err(DioramaError::Typeface(format!(
                "resolution must be positive, got {}",
                raw.resolution
            )));
        }
        let mut glyphs = FnvHashMap::default();
        for (key, g) in raw.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                log::warn!("[typeface] skipping multi-char glyph key {:?}", key);
                continue;
            };
            let contours = match g.o.as_deref() {
                Some(o) => parse_outline(o).map_err(|e| {
                    DioramaError::Typeface(format!("glyph {:?}: {}", ch, e))
                })?,
                None => Vec::new(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: g.ha,
                    contours,
                },
            );
        }
        Ok(Self {
            family: raw.family_name,
            resolution: raw.resolution,
            line_height: raw.bounding_box.y_max - raw.bounding_box.y_min + raw.underline_thickness,
            glyphs,
        })
    }

    #[inline]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[inline]
    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    fn glyph_or_fallback(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch).or_else(|| self.glyphs.get(&'?'))
    }
}

fn next_point(tokens: &mut std::str::SplitWhitespace<'_>) -> std::result::Result<Vec2, String> {
    let mut num = || -> std::result::Result<f32, String> {
        let t = tokens.next().ok_or("truncated outline")?;
        t.parse::<f32>().map_err(|_| format!("bad number {:?}", t))
    };
    let x = num()?;
    let y = num()?;
    Ok(Vec2::new(x, y))
}

/// Flatten one glyph outline; the end point precedes control points in `q` and `b`.
fn parse_outline(o: &str) -> std::result::Result<Vec<Vec<Vec2>>, String> {
    let mut tokens = o.split_whitespace();
    let mut contours: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut pen = Vec2::ZERO;
    while let Some(cmd) = tokens.next() {
        match cmd {
            "m" => {
                if current.len() > 1 {
                    contours.push(std::mem::take(&mut current));
                }
                current.clear();
                pen = next_point(&mut tokens)?;
                current.push(pen);
            }
            "l" => {
                pen = next_point(&mut tokens)?;
                current.push(pen);
            }
            "q" => {
                let end = next_point(&mut tokens)?;
                let ctrl = next_point(&mut tokens)?;
                for i in 1..=CURVE_SEGMENTS {
                    let t = i as f32 / CURVE_SEGMENTS as f32;
                    let s = 1.0 - t;
                    current.push(pen * (s * s) + ctrl * (2.0 * s * t) + end * (t * t));
                }
                pen = end;
            }
            "b" => {
                let end = next_point(&mut tokens)?;
                let c1 = next_point(&mut tokens)?;
                let c2 = next_point(&mut tokens)?;
                for i in 1..=CURVE_SEGMENTS {
                    let t = i as f32 / CURVE_SEGMENTS as f32;
                    let s = 1.0 - t;
                    current.push(
                        pen * (s * s * s)
                            + c1 * (3.0 * s * s * t)
                            + c2 * (3.0 * s * t * t)
                            + end * (t * t * t),
                    );
                }
                pen = end;
            }
            "z" => {}
            other => return Err(format!("unknown command {:?}", other)),
        }
    }
    if current.len() > 1 {
        contours.push(current);
    }
    Ok(contours)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
}

impl TextStyle {
    pub const fn flat(size: f32, depth: f32) -> Self {
        Self {
            size,
            depth,
            bevel_thickness: 0.0,
            bevel_size: 0.0,
        }
    }

    pub const fn bevelled(size: f32, depth: f32, thickness: f32, bevel_size: f32) -> Self {
        Self {
            size,
            depth,
            bevel_thickness: thickness,
            bevel_size,
        }
    }
}

/// Outline rendition of a string: glyph contours as line segments on the front cap.
#[derive(Clone, Debug)]
pub struct TextGeometry {
    pub outline: LineData,
    pub bounds: Aabb,
}

impl TextGeometry {
    pub fn new(face: &Typeface, text: &str, style: TextStyle) -> Self {
        let scale = style.size / face.resolution;
        let mut offset = Vec2::ZERO;
        let mut outline = LineData::default();
        let mut missing = false;

        for ch in text.chars() {
            if ch == '\n' {
                offset.x = 0.0;
                offset.y -= face.line_height * scale;
                continue;
            }
            let Some(glyph) = face.glyph_or_fallback(ch) else {
                missing = true;
                continue;
            };
            for contour in &glyph.contours {
                let n = contour.len();
                for i in 0..n {
                    let a = contour[i] * scale + offset;
                    let b = contour[(i + 1) % n] * scale + offset;
                    if a == b {
                        continue;
                    }
                    outline.positions.push(a.extend(style.depth));
                    outline.positions.push(b.extend(style.depth));
                }
            }
            offset.x += glyph.advance * scale;
        }
        if missing {
            log::error!(
                "[typeface] {:?} has no glyph or fallback for some of {:?}",
                face.family,
                text
            );
        }

        let mut bounds = outline.bounds();
        if !bounds.is_empty() {
            bounds.min.z = -style.bevel_thickness;
            bounds.max.z = style.depth + style.bevel_thickness;
            bounds = bounds.expanded(Vec3::new(style.bevel_size, style.bevel_size, 0.0));
        }
        Self { outline, bounds }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.bounds.size().x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bounds.size().y
    }
}

impl TextMeasure for Typeface {
    fn extent(&self, text: &str, size: f32) -> Vec2 {
        let g = TextGeometry::new(self, text, TextStyle::flat(size, 0.0));
        Vec2::new(g.width(), g.height())
    }
}
