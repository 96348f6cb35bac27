use crate::font::{default_candidates, resolve_font, GlyphMask, IconFont};
use crate::gradient::Gradient;
use crate::manifest::{write_manifest, IconManifest};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgb, RgbImage, Rgba,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// One icon to generate: output file name and edge length in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTarget {
    pub file_name: String,
    pub size: u32,
}

impl IconTarget {
    pub fn new(file_name: impl Into<String>, size: u32) -> Self {
        Self {
            file_name: file_name.into(),
            size,
        }
    }
}

/// The extension's icon set: `icon16.png`, `icon48.png`, `icon128.png`.
pub fn default_targets() -> Vec<IconTarget> {
    [16, 48, 128]
        .into_iter()
        .map(|size| IconTarget::new(format!("icon{size}.png"), size))
        .collect()
}

/// How an icon is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub gradient: Gradient,
    pub letter: char,
    /// Font pixel size as a fraction of the icon size
    pub font_ratio: f32,
    pub shadow_offset: (i32, i32),
    pub shadow: Rgba<u8>,
    pub foreground: Rgba<u8>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            gradient: Gradient::default(),
            letter: 'S',
            font_ratio: 0.6,
            shadow_offset: (2, 2),
            shadow: Rgba([0, 0, 0, 128]),
            foreground: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Everything the driver needs to produce an icon set.
#[derive(Debug, Clone)]
pub struct IconConfig {
    pub output: PathBuf,
    pub targets: Vec<IconTarget>,
    pub style: Style,
    /// Font file tried before the system fonts
    pub font: Option<PathBuf>,
    /// Also write an `icons.json` manifest fragment
    pub manifest: bool,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("icons"),
            targets: default_targets(),
            style: Style::default(),
            font: None,
            manifest: false,
        }
    }
}

/// A PNG written by [`generate_icons`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIcon {
    pub size: u32,
    pub path: PathBuf,
}

pub fn generate_icons(config: &IconConfig) -> Result<Vec<GeneratedIcon>> {
    // Ensure the output directory exists
    create_dir_all(&config.output).context("Can't create output directory")?;

    let font = resolve_font(&default_candidates(config.font.as_deref()));

    let mut generated = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        let output_path = config.output.join(&target.file_name);
        generate_icon(target.size, &output_path, &config.style, &font)?;
        generated.push(GeneratedIcon {
            size: target.size,
            path: output_path,
        });
    }

    if config.manifest {
        let manifest = IconManifest::from_icons(&generated);
        write_manifest(&config.output, &manifest)?;
    }

    println!("\nAll icons generated successfully!");
    println!(
        "Icons are located in the {}/ directory",
        config.output.display()
    );

    Ok(generated)
}

/// Render a `size`×`size` icon and write it as PNG to `output_path`.
pub fn generate_icon(
    size: u32,
    output_path: &Path,
    style: &Style,
    font: &IconFont,
) -> Result<()> {
    let canvas = render_icon(size, style, font)?;
    save_png(&canvas, output_path)?;
    println!("✓ Created {}", output_path.display());
    Ok(())
}

/// Draw the gradient background and the shadowed letter onto a fresh canvas.
pub fn render_icon(size: u32, style: &Style, font: &IconFont) -> Result<RgbImage> {
    if size == 0 {
        anyhow::bail!("Icon size must be at least 1 pixel");
    }

    let mut canvas = RgbImage::new(size, size);
    style.gradient.fill_vertical(&mut canvas);

    let font_size = (size as f32 * style.font_ratio) as u32;
    let mut buf = [0u8; 4];
    let text = style.letter.encode_utf8(&mut buf);

    if let Some(mask) = font.render(text, font_size) {
        let (x, y) = centered_origin(size, &mask);
        let (dx, dy) = style.shadow_offset;

        draw_mask(&mut canvas, &mask, x + dx, y + dy, style.shadow);
        draw_mask(&mut canvas, &mask, x, y, style.foreground);
    }

    Ok(canvas)
}

/// Text origin that puts the inked bounds of `mask` in the middle of the
/// canvas. The bearings are subtracted so the glyph, not its line box, is
/// centred.
pub fn centered_origin(size: u32, mask: &GlyphMask) -> (i32, i32) {
    let size = size as i32;
    let x = (size - mask.width as i32).div_euclid(2) - mask.left;
    let y = (size - mask.height as i32).div_euclid(2) - mask.top;
    (x, y)
}

/// Composite `color` through the mask's coverage onto an opaque canvas.
///
/// The canvas has no alpha channel, so alpha is blended against the existing
/// pixel here. Anything falling outside the canvas is clipped.
fn draw_mask(
    canvas: &mut RgbImage,
    mask: &GlyphMask,
    origin_x: i32,
    origin_y: i32,
    color: Rgba<u8>,
) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let color_alpha = color[3] as f32 / 255.0;

    for my in 0..mask.height {
        let y = origin_y + mask.top + my as i32;
        if y < 0 || y >= height {
            continue;
        }

        for mx in 0..mask.width {
            let x = origin_x + mask.left + mx as i32;
            if x < 0 || x >= width {
                continue;
            }

            let alpha = mask.coverage(mx, my) * color_alpha;
            if alpha <= 0.0 {
                continue;
            }

            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            *pixel = blend(*pixel, color, alpha);
        }
    }
}

fn blend(background: Rgb<u8>, color: Rgba<u8>, alpha: f32) -> Rgb<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let bg = background[i] as f32;
        let fg = color[i] as f32;
        *channel = (bg + (fg - bg) * alpha).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image.as_raw(), &mut out_file, image.width())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode square RGB data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgb8)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets() {
        let targets = default_targets();
        assert_eq!(
            targets,
            vec![
                IconTarget::new("icon16.png", 16),
                IconTarget::new("icon48.png", 48),
                IconTarget::new("icon128.png", 128),
            ]
        );
    }

    #[test]
    fn test_centered_origin_compensates_bearings() {
        let mask = IconFont::Builtin.render("S", 7).unwrap();
        // 5x7 glyph on a 16px canvas: top-left lands at (5, 4)
        assert_eq!(centered_origin(16, &mask), (5, 4));
    }

    #[test]
    fn test_centered_origin_with_oversized_glyph() {
        let mask = IconFont::Builtin.render("S", 7).unwrap();
        // (1 - 5) / 2 and (1 - 7) / 2, floored
        assert_eq!(centered_origin(1, &mask), (-2, -3));
    }

    #[test]
    fn test_blend() {
        let bg = Rgb([100, 100, 100]);
        assert_eq!(
            blend(bg, Rgba([255, 255, 255, 255]), 1.0),
            Rgb([255, 255, 255])
        );
        assert_eq!(blend(bg, Rgba([0, 0, 0, 128]), 0.0), bg);
        assert_eq!(blend(bg, Rgba([0, 0, 0, 128]), 0.5), Rgb([50, 50, 50]));
    }

    #[test]
    fn test_render_zero_size_fails() {
        let result = render_icon(0, &Style::default(), &IconFont::Builtin);
        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_glyph_placement() {
        let style = Style::default();
        let canvas = render_icon(16, &style, &IconFont::Builtin).unwrap();

        // 0.6 * 16 = 9px -> factor 1, glyph top-left at (5, 4).
        // Top row of 'S' is 01111, so (6, 4) is foreground.
        assert_eq!(*canvas.get_pixel(6, 4), Rgb([255, 255, 255]));

        // (5, 4) is unlit in the glyph and the shadow does not reach it
        let background = style.gradient.color_at(4, 16);
        assert_eq!(*canvas.get_pixel(5, 4), background);

        // Bottom-right of 'S' (row 6 is 11110) casts a shadow at (5+3+2, 4+6+2)
        let shadowed = *canvas.get_pixel(10, 12);
        let row_color = style.gradient.color_at(12, 16);
        assert_eq!(shadowed, blend(row_color, style.shadow, 128.0 / 255.0));
    }
}
