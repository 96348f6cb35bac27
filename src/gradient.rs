//! Vertical two-stop colour gradient used as the icon background.

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::str::FromStr;

/// Top colour of the default gradient (`#667eea`)
pub const DEFAULT_START: Rgb<u8> = Rgb([102, 126, 234]);

/// Bottom colour of the default gradient (`#764ba2`)
pub const DEFAULT_END: Rgb<u8> = Rgb([118, 75, 162]);

/// Linear gradient between two RGB endpoints, interpolated per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub start: Rgb<u8>,
    pub end: Rgb<u8>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
        }
    }
}

impl Gradient {
    pub fn new(start: Rgb<u8>, end: Rgb<u8>) -> Self {
        Self { start, end }
    }

    /// Colour of row `y` in an image `height` rows tall.
    ///
    /// Each channel is `start + floor((end - start) * y / height)`, so row 0 is
    /// exactly `start` and the last row stops one step short of `end`.
    pub fn color_at(&self, y: u32, height: u32) -> Rgb<u8> {
        if height == 0 {
            return self.start;
        }

        let mut channels = [0u8; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            let from = self.start[i] as i64;
            let delta = self.end[i] as i64 - from;
            let value = from + (delta * y as i64).div_euclid(height as i64);
            *channel = value.clamp(0, 255) as u8;
        }
        Rgb(channels)
    }

    /// Fill every row of `canvas` with its interpolated colour.
    pub fn fill_vertical(&self, canvas: &mut RgbImage) {
        let height = canvas.height();
        for (y, row) in canvas.enumerate_rows_mut() {
            let color = self.color_at(y, height);
            for (_, _, pixel) in row {
                *pixel = color;
            }
        }
    }
}

/// Parse a CSS colour string such as `#667eea` or `#fff` into RGB.
///
/// Any alpha component is ignored; the icon canvas is opaque.
pub fn parse_color(value: &str) -> Result<Rgb<u8>> {
    let color = css_color::Srgb::from_str(value)
        .ok()
        .with_context(|| format!("Invalid color: {value}"))?;

    Ok(Rgb([
        to_channel(color.red),
        to_channel(color.green),
        to_channel(color.blue),
    ]))
}

fn to_channel(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.).round() as u8
}
