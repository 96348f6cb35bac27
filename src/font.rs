//! Font resolution and glyph rasterisation.
//!
//! Fonts are looked up from an ordered list of candidate sources. System font
//! files are tried first; the list always ends in a small built-in bitmap font
//! so resolution can never fail.

use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// Font files tried, in order, when no explicit font is given.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A place a font can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// TrueType font or collection on disk. Collections use their first face.
    File(PathBuf),
    /// The built-in 5x7 bitmap font.
    Builtin,
}

/// A resolved font ready for rendering.
pub enum IconFont {
    Scalable(Font<'static>),
    Builtin,
}

impl std::fmt::Debug for IconFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconFont::Scalable(_) => f.write_str("IconFont::Scalable"),
            IconFont::Builtin => f.write_str("IconFont::Builtin"),
        }
    }
}

/// Candidate list used by the CLI: the explicit font first (if any), then the
/// well-known system paths, then the built-in font.
pub fn default_candidates(explicit: Option<&Path>) -> Vec<FontSource> {
    let mut candidates = Vec::with_capacity(SYSTEM_FONT_PATHS.len() + 2);

    if let Some(path) = explicit {
        candidates.push(FontSource::File(path.to_path_buf()));
    }

    candidates.extend(
        SYSTEM_FONT_PATHS
            .iter()
            .map(|path| FontSource::File(PathBuf::from(path))),
    );
    candidates.push(FontSource::Builtin);
    candidates
}

/// Return the first candidate that loads, or the built-in font if none do.
///
/// Missing or unparsable font files are skipped without error.
pub fn resolve_font(candidates: &[FontSource]) -> IconFont {
    candidates
        .iter()
        .find_map(load_font)
        .unwrap_or(IconFont::Builtin)
}

fn load_font(source: &FontSource) -> Option<IconFont> {
    match source {
        FontSource::File(path) => {
            let data = std::fs::read(path).ok()?;
            Font::try_from_vec(data).map(IconFont::Scalable)
        }
        FontSource::Builtin => Some(IconFont::Builtin),
    }
}

/// Anti-aliased coverage of rendered text.
///
/// `left` and `top` are the offsets of the mask's top-left corner from the
/// text origin (the top-left of the line box), i.e. the glyph bearings.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    coverage: Vec<f32>,
}

impl GlyphMask {
    fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            coverage: vec![0.0; (width * height) as usize],
        }
    }

    /// Coverage in `[0, 1]` at mask coordinates; zero outside the mask.
    pub fn coverage(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.coverage[(y * self.width + x) as usize]
    }

    fn accumulate(&mut self, x: u32, y: u32, value: f32) {
        if x < self.width && y < self.height {
            let cell = &mut self.coverage[(y * self.width + x) as usize];
            *cell = (*cell + value).min(1.0);
        }
    }
}

impl IconFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, IconFont::Builtin)
    }

    /// Rasterise `text` with an em size of `pixel_size`, returning `None` when
    /// nothing is inked (empty text, whitespace, or a size too small to
    /// produce pixels).
    ///
    /// Icons only ever pass a single character. Longer strings are laid out
    /// on one line for library callers.
    pub fn render(&self, text: &str, pixel_size: u32) -> Option<GlyphMask> {
        let pixel_size = pixel_size.max(1);
        match self {
            IconFont::Scalable(font) => render_scalable(font, text, pixel_size as f32),
            IconFont::Builtin => render_builtin(text, pixel_size),
        }
    }
}

fn render_scalable(font: &Font<'static>, text: &str, pixel_size: f32) -> Option<GlyphMask> {
    let scale = em_scale(font, pixel_size);
    let ascent = font.v_metrics(scale).ascent;
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, ascent)).collect();

    let (min_x, min_y, max_x, max_y) = glyphs
        .iter()
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .fold(None, |acc: Option<(i32, i32, i32, i32)>, bb| {
            Some(match acc {
                None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                Some((x0, y0, x1, y1)) => (
                    x0.min(bb.min.x),
                    y0.min(bb.min.y),
                    x1.max(bb.max.x),
                    y1.max(bb.max.y),
                ),
            })
        })?;

    if max_x <= min_x || max_y <= min_y {
        return None;
    }

    let mut mask = GlyphMask::new(
        min_x,
        min_y,
        (max_x - min_x) as u32,
        (max_y - min_y) as u32,
    );

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            let dx = (bb.min.x - min_x) as u32;
            let dy = (bb.min.y - min_y) as u32;
            glyph.draw(|x, y, v| mask.accumulate(x + dx, y + dy, v));
        }
    }

    Some(mask)
}

/// rusttype scales by the ascent-to-descent height, not the em square.
/// Convert so `pixel_size` is the em size, as font sizes usually mean.
fn em_scale(font: &Font<'static>, pixel_size: f32) -> Scale {
    let metrics = font.v_metrics_unscaled();
    let units_per_em = font.units_per_em().max(1) as f32;
    let height = metrics.ascent - metrics.descent;
    if height <= 0.0 {
        return Scale::uniform(pixel_size);
    }
    Scale::uniform(pixel_size * height / units_per_em)
}

const BITMAP_WIDTH: u32 = 5;
const BITMAP_HEIGHT: u32 = 7;
const BITMAP_ADVANCE: u32 = BITMAP_WIDTH + 1;

/// Lays out every non-blank run of `text`; leading and trailing whitespace is
/// trimmed. Multi-character layout only matters to library callers.
fn render_builtin(text: &str, pixel_size: u32) -> Option<GlyphMask> {
    // No real size control; scale the 7px-tall cells by a whole factor.
    let factor = (pixel_size / 8).max(1);
    let chars: Vec<char> = text.chars().collect();

    let first = chars.iter().position(|c| !c.is_whitespace())?;
    let last = chars.iter().rposition(|c| !c.is_whitespace())?;
    let cells = (last - first + 1) as u32;

    let width = (cells * BITMAP_ADVANCE - 1) * factor;
    let height = BITMAP_HEIGHT * factor;
    let left = (first as u32 * BITMAP_ADVANCE * factor) as i32;
    let mut mask = GlyphMask::new(left, 0, width, height);

    for (cell, &c) in chars[first..=last].iter().enumerate() {
        let Some(rows) = bitmap_glyph(c) else {
            continue;
        };
        let origin_x = cell as u32 * BITMAP_ADVANCE * factor;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..BITMAP_WIDTH {
                if bits & (1 << (BITMAP_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for sy in 0..factor {
                    for sx in 0..factor {
                        mask.accumulate(
                            origin_x + col * factor + sx,
                            row as u32 * factor + sy,
                            1.0,
                        );
                    }
                }
            }
        }
    }

    Some(mask)
}

/// Rows of a 5x7 cell, most significant of the low five bits on the left.
fn bitmap_glyph(c: char) -> Option<&'static [u8; 7]> {
    if c.is_whitespace() {
        return None;
    }

    let glyph: &'static [u8; 7] = match c.to_ascii_uppercase() {
        'A' => &[0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => &[0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => &[0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => &[0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => &[0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => &[0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => &[0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => &[0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => &[0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => &[0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => &[0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => &[0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => &[0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => &[0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => &[0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => &[0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => &[0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => &[0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => &[0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => &[0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => &[0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => &[0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => &[0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => &[0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    };
    Some(glyph)
}
