//! Text watermark rendering.
//!
//! Rasterizes a single line of text into a bitmap with ab_glyph, blending
//! glyph coverage source-over at a caller-chosen fill alpha. There is no
//! ambient font stack to lean on, so the font comes in as bytes from the
//! host, or from a short list of well-known italic-serif system fonts.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::RgbaImage;

use crate::error::{Error, Result};

/// Well-known italic serif fonts, tried in order by [`WatermarkFont::discover`].
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Italic.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif-Italic.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Italic.ttf",
    "/usr/share/fonts/liberation/LiberationSerif-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSerifItalic.ttf",
    "/usr/share/fonts/gnu-free/FreeSerifItalic.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman Italic.ttf",
    "C:\\Windows\\Fonts\\timesi.ttf",
];

/// A font usable for the text watermark fallback.
pub struct WatermarkFont {
    font: FontVec,
}

impl WatermarkFont {
    /// Load a font from TTF/OTF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontUnavailable`] if the bytes are not a valid font.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| Error::FontUnavailable)?;
        Ok(Self { font })
    }

    /// Load a font from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::FontUnavailable`] if its bytes are not a valid font.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Find an italic serif font among well-known system locations.
    #[must_use]
    pub fn discover() -> Option<Self> {
        SYSTEM_FONT_PATHS
            .iter()
            .map(Path::new)
            .filter(|p| p.exists())
            .find_map(|p| Self::from_path(p).ok())
    }

    /// Width in pixels of a single line at the given size.
    #[must_use]
    pub fn line_width(&self, text: &str, px_size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px_size));
        text.chars()
            .map(|c| scaled.h_advance(self.font.glyph_id(c)))
            .sum()
    }

    /// Rasterize a single line onto `img`, source-over.
    ///
    /// `baseline` is the left end of the baseline as `(x, y)`. Each glyph
    /// pixel blends at `coverage * alpha`; pixels outside the bitmap are
    /// discarded rather than wrapped.
    pub fn draw_line(
        &self,
        img: &mut RgbaImage,
        text: &str,
        px_size: f32,
        fill: [u8; 3],
        alpha: f32,
        baseline: (f32, f32),
    ) {
        let (baseline_x, baseline_y) = baseline;
        let scale = PxScale::from(px_size);
        let scaled = self.font.as_scaled(scale);
        let mut caret_x = baseline_x;

        for c in text.chars() {
            let glyph_id = self.font.glyph_id(c);
            let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(caret_x, baseline_y));
            caret_x += scaled.h_advance(glyph_id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x + gx as f32;
                let y = bounds.min.y + gy as f32;
                if x < 0.0 || y < 0.0 || x >= img.width() as f32 || y >= img.height() as f32 {
                    return;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let (px_x, px_y) = (x as u32, y as u32);
                blend_over(img, px_x, px_y, fill, coverage * alpha);
            });
        }
    }
}

/// Source-over blend of a flat color at the given alpha onto one pixel.
fn blend_over(img: &mut RgbaImage, x: u32, y: u32, src: [u8; 3], alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let px = img.get_pixel_mut(x, y);
    for ch in 0..3 {
        let blended = a * f32::from(src[ch]) + (1.0 - a) * f32::from(px[ch]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            px[ch] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    let out_a = a * 255.0 + (1.0 - a) * f32::from(px[3]);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        px[3] = out_a.round().clamp(0.0, 255.0) as u8;
    }
}
