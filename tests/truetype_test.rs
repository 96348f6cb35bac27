use image::RgbImage;
use std::path::{Path, PathBuf};
use summora_icons::font::{resolve_font, FontSource, IconFont, SYSTEM_FONT_PATHS};
use summora_icons::icon_gen::{centered_origin, render_icon, Style};

const DEJAVU_SANS_BOLD: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// Loads the first system TrueType font that exists, or `None` on hosts with
/// none of the well-known fonts installed.
fn system_truetype() -> Option<(PathBuf, IconFont)> {
    SYSTEM_FONT_PATHS
        .iter()
        .map(PathBuf::from)
        .filter(|path| path.exists())
        .find_map(|path| {
            let font = resolve_font(&[FontSource::File(path.clone())]);
            (!font.is_builtin()).then_some((path, font))
        })
}

fn load_truetype(path: &str) -> Option<IconFont> {
    if !Path::new(path).exists() {
        return None;
    }
    let font = resolve_font(&[FontSource::File(PathBuf::from(path))]);
    (!font.is_builtin()).then_some(font)
}

/// Inclusive bounds of the pixels where the white foreground dominates.
///
/// The gradient never has red or green above 126, and the shadow only
/// darkens, so only foreground coverage passes the threshold.
fn white_bounds(canvas: &RgbImage) -> Option<(u32, u32, u32, u32)> {
    canvas
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] > 200 && p[1] > 200)
        .fold(None, |acc, (x, y, _)| {
            Some(match acc {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            })
        })
}

#[test]
fn test_truetype_glyph_sits_below_line_top() {
    let Some((path, font)) = system_truetype() else {
        eprintln!("No system TrueType font found; skipping");
        return;
    };

    for pixel_size in [9, 28, 76] {
        let mask = font.render("S", pixel_size).expect("'S' should ink");
        assert!(
            mask.top > 0,
            "{}: 'S' at {pixel_size}px should start below the ascender line, top = {}",
            path.display(),
            mask.top
        );
        assert!(mask.width > 0 && mask.height > 0);
    }
}

#[test]
fn test_truetype_glyph_is_centred() {
    let Some((path, font)) = system_truetype() else {
        eprintln!("No system TrueType font found; skipping");
        return;
    };
    let style = Style::default();

    for size in [48, 128] {
        let canvas = render_icon(size, &style, &font).unwrap();
        let (x0, y0, x1, y1) = white_bounds(&canvas)
            .unwrap_or_else(|| panic!("{}: no foreground at size {size}", path.display()));

        let centre = (size - 1) as f32 / 2.0;
        let ink_x = (x0 + x1) as f32 / 2.0;
        let ink_y = (y0 + y1) as f32 / 2.0;

        // Anti-aliased edges can shift the thresholded bounds by a pixel
        assert!(
            (ink_x - centre).abs() <= 1.5,
            "{}: horizontal ink {x0}..={x1} off centre at size {size}",
            path.display()
        );
        assert!(
            (ink_y - centre).abs() <= 1.5,
            "{}: vertical ink {y0}..={y1} off centre at size {size}",
            path.display()
        );
    }
}

#[test]
fn test_truetype_origin_compensates_bearings() {
    let Some((_, font)) = system_truetype() else {
        eprintln!("No system TrueType font found; skipping");
        return;
    };

    let mask = font.render("S", 76).unwrap();
    let (x, y) = centered_origin(128, &mask);

    // The inked box, not the line box, lands in the middle
    assert_eq!(x + mask.left, (128 - mask.width as i32).div_euclid(2));
    assert_eq!(y + mask.top, (128 - mask.height as i32).div_euclid(2));
}

#[test]
fn test_font_size_is_em_size() {
    let Some(font) = load_truetype(DEJAVU_SANS_BOLD) else {
        eprintln!("{DEJAVU_SANS_BOLD} not installed; skipping");
        return;
    };

    // DejaVu Sans Bold 'S' at a 76px em is 44x58; scaling by the
    // ascent-to-descent height instead would give 39x50.
    let mask = font.render("S", 76).unwrap();
    assert!(
        (57..=59).contains(&mask.height),
        "glyph height {} is not a 76px em",
        mask.height
    );
    assert!(
        (43..=45).contains(&mask.width),
        "glyph width {} is not a 76px em",
        mask.width
    );

    // Height grows with the em size
    let small = font.render("S", 28).unwrap();
    let expected = 58.0 * 28.0 / 76.0;
    assert!(
        (small.height as f32 - expected).abs() <= 1.5,
        "glyph height {} at 28px, expected about {expected}",
        small.height
    );
}
