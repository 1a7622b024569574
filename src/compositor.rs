//! Watermark compositing engine.
//!
//! Stamps the brand mark into the bottom-right corner of a result image.
//! The preferred path chroma-keys and scales the logo asset; when the asset
//! is missing or undecodable the engine falls back to rendering the brand
//! text. A logo failure is recovered here and never surfaces to callers.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::chroma_key::{remove_color_key, ColorKey};
use crate::error::{Error, Result};
use crate::io::{self, DEFAULT_JPEG_QUALITY};
use crate::text::WatermarkFont;
use crate::ProcessResult;

/// Logo width as a fraction of the main image width.
const LOGO_SCALE: f32 = 0.15;

/// Logo padding as a fraction of the main image width.
const LOGO_PADDING: f32 = 0.03;

/// Global opacity for the drawn logo.
const LOGO_OPACITY: f32 = 0.8;

/// Text size as a fraction of the main image width.
const TEXT_SIZE: f32 = 0.05;

/// Floor for the text size in pixels.
const MIN_TEXT_SIZE: f32 = 16.0;

/// Fill alpha for the text fallback.
const TEXT_ALPHA: f32 = 0.7;

/// Fill color for the text fallback, a translucent orange.
const TEXT_FILL: [u8; 3] = [255, 165, 0];

/// Brand string drawn when the caller supplies no text.
const DEFAULT_TEXT: &str = "Fabric Studio";

/// Which watermark path was taken for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkKind {
    /// The chroma-keyed logo was composited.
    Logo,
    /// The text fallback was rendered.
    Text,
}

/// Options controlling watermark compositing behavior.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    /// Text for the fallback path. Defaults to the brand string.
    pub text: String,
    /// Explicit font file for the fallback path. When absent, well-known
    /// system fonts are tried.
    pub font_path: Option<PathBuf>,
    /// JPEG quality for saved output (ignored for lossless formats).
    pub quality: u8,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_path: None,
            quality: DEFAULT_JPEG_QUALITY,
            verbose: false,
            quiet: false,
        }
    }
}

/// Composites the brand watermark onto result images.
///
/// Stateless: create once and reuse across any number of images, including
/// from parallel batch workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatermarkCompositor;

impl WatermarkCompositor {
    /// Create a new compositor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Composite the logo into the main image's bottom-right corner.
    ///
    /// A private copy of the logo is chroma-keyed with the brand key, scaled
    /// to 15% of the main width (aspect preserved, bilinear), anchored with
    /// 3%-of-width padding, and blended at 0.8 opacity. The main image keeps
    /// its dimensions; this never crops or resizes it.
    #[allow(clippy::unused_self)] // method on `self` for API consistency
    pub fn composite_logo(&self, main: &mut RgbaImage, logo: &RgbaImage) {
        if logo.width() == 0 || logo.height() == 0 {
            return;
        }

        let main_w = main.width() as f32;
        let scale = (main_w * LOGO_SCALE) / logo.width() as f32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let logo_w = (logo.width() as f32 * scale).round().max(1.0) as u32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let logo_h = (logo.height() as f32 * scale).round().max(1.0) as u32;

        let mut keyed = logo.clone();
        remove_color_key(&mut keyed, &ColorKey::brand_logo());
        let resized = imageops::resize(&keyed, logo_w, logo_h, FilterType::Triangle);

        let padding = (main_w * LOGO_PADDING).round();
        #[allow(clippy::cast_possible_truncation)]
        let anchor_x = (main_w - logo_w as f32 - padding).round() as i64;
        #[allow(clippy::cast_possible_truncation)]
        let anchor_y = (main.height() as f32 - logo_h as f32 - padding).round() as i64;

        blend_bitmap(main, &resized, anchor_x, anchor_y, LOGO_OPACITY);
    }

    /// Render the text watermark into the main image's bottom-right corner.
    ///
    /// Size is 5% of the main width (floor, minimum 16px); the padding
    /// equals the font size — intentionally not the 3%-of-width padding the
    /// logo path uses.
    #[allow(clippy::unused_self)]
    pub fn composite_text(&self, main: &mut RgbaImage, text: &str, font: &WatermarkFont) {
        let font_size = text_font_size(main.width());
        let padding = font_size;

        let text_w = font.line_width(text, font_size);
        let baseline_x = main.width() as f32 - text_w - padding;
        let baseline_y = main.height() as f32 - padding;

        font.draw_line(
            main,
            text,
            font_size,
            TEXT_FILL,
            TEXT_ALPHA,
            (baseline_x, baseline_y),
        );
    }

    /// Apply the watermark, preferring the logo and falling back to text.
    ///
    /// Absent or undecodable logo bytes switch to the text path; that is the
    /// normal fallback, not an error. Returns which path was taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontUnavailable`] only on the text path, when
    /// neither the configured font nor any known system font can be loaded.
    pub fn composite(
        &self,
        main: &mut RgbaImage,
        logo_bytes: Option<&[u8]>,
        opts: &WatermarkOptions,
    ) -> Result<WatermarkKind> {
        if let Some(bytes) = logo_bytes {
            if let Ok(logo) = io::decode_image(bytes) {
                self.composite_logo(main, &logo);
                return Ok(WatermarkKind::Logo);
            }
        }

        let font = resolve_font(opts)?;
        self.composite_text(main, &opts.text, &font);
        Ok(WatermarkKind::Text)
    }

    /// Process a single image file: load, watermark, save.
    ///
    /// A missing or corrupt logo file downgrades to the text path and is
    /// mentioned in the result message; only a failure of the main image
    /// itself (or a fully unusable text path) fails the result.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        logo_path: Option<&Path>,
        output: &Path,
        opts: &WatermarkOptions,
    ) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            success: false,
            skipped: false,
            message: String::new(),
        };

        let mut main = match io::load_image(input) {
            Ok(img) => img,
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };

        let logo_bytes = logo_path.and_then(|p| std::fs::read(p).ok());
        let logo_was_requested = logo_path.is_some();

        let kind = match self.composite(&mut main, logo_bytes.as_deref(), opts) {
            Ok(kind) => kind,
            Err(e) => {
                result.message = format!("Failed to watermark: {e}");
                return result;
            }
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match io::save_image(&main, output, opts.quality) {
            Ok(()) => {
                result.success = true;
                result.message = match kind {
                    WatermarkKind::Logo => "Watermarked (logo)".to_string(),
                    WatermarkKind::Text if logo_was_requested => {
                        "Watermarked (text fallback, logo unavailable)".to_string()
                    }
                    WatermarkKind::Text => "Watermarked (text)".to_string(),
                };
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Process all supported images in a directory.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    /// Returns a [`ProcessResult`] for each image found.
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        logo_path: Option<&Path>,
        output_dir: &Path,
        opts: &WatermarkOptions,
    ) -> Vec<ProcessResult> {
        io::process_directory_with(input_dir, output_dir, |input, output| {
            self.process_file(input, logo_path, output, opts)
        })
    }
}

/// Text size in pixels for a given main image width.
pub(crate) fn text_font_size(main_width: u32) -> f32 {
    (main_width as f32 * TEXT_SIZE).floor().max(MIN_TEXT_SIZE)
}

/// Resolve the fallback font: configured path first, then system discovery.
fn resolve_font(opts: &WatermarkOptions) -> Result<WatermarkFont> {
    if let Some(path) = &opts.font_path {
        if let Ok(font) = WatermarkFont::from_path(path) {
            return Ok(font);
        }
    }
    WatermarkFont::discover().ok_or(Error::FontUnavailable)
}

/// Source-over blend `src` onto `dst` at `(anchor_x, anchor_y)`, with a
/// global opacity multiplied into the source's own alpha. Source pixels
/// falling outside `dst` are clipped.
fn blend_bitmap(dst: &mut RgbaImage, src: &RgbaImage, anchor_x: i64, anchor_y: i64, opacity: f32) {
    for (sx, sy, spx) in src.enumerate_pixels() {
        let dx = anchor_x + i64::from(sx);
        let dy = anchor_y + i64::from(sy);
        if dx < 0 || dy < 0 || dx >= i64::from(dst.width()) || dy >= i64::from(dst.height()) {
            continue;
        }

        let a = f32::from(spx[3]) / 255.0 * opacity;
        if a <= 0.0 {
            continue;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let dpx = dst.get_pixel_mut(dx as u32, dy as u32);
        for ch in 0..3 {
            let blended = a * f32::from(spx[ch]) + (1.0 - a) * f32::from(dpx[ch]);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                dpx[ch] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
        let out_a = a * 255.0 + (1.0 - a) * f32::from(dpx[3]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            dpx[3] = out_a.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn black_main(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn logo_lands_in_bottom_right_window() {
        let mut main = black_main(1000, 1000);
        // Solid blue logo, nowhere near the key color: everything draws.
        let logo = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 255, 255]));

        WatermarkCompositor::new().composite_logo(&mut main, &logo);

        assert_eq!(main.dimensions(), (1000, 1000));

        // 15% scale -> 150x150; 3% padding -> anchor (820, 820).
        for (x, y, px) in main.enumerate_pixels() {
            let inside = (820..970).contains(&x) && (820..970).contains(&y);
            if inside {
                // 0.8 * 255 = 204 blue over black.
                assert_eq!(*px, Rgba([0, 0, 204, 255]), "at ({x},{y})");
            } else {
                assert_eq!(*px, Rgba([0, 0, 0, 255]), "at ({x},{y})");
            }
        }
    }

    #[test]
    fn keyed_logo_background_leaves_main_visible() {
        let mut main = RgbaImage::from_pixel(1000, 1000, Rgba([10, 200, 10, 255]));

        // Yellow key background with a centered 20x20 blue mark.
        let mut logo = RgbaImage::from_pixel(100, 100, Rgba([240, 230, 74, 255]));
        for y in 40..60 {
            for x in 40..60 {
                logo.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }

        WatermarkCompositor::new().composite_logo(&mut main, &logo);

        // Background region of the logo window: main shows through untouched.
        assert_eq!(*main.get_pixel(830, 830), Rgba([10, 200, 10, 255]));
        // Center of the mark (logo center scales to window center ~(895, 895)):
        // blue at 0.8 over the green main -> (2, 40, 206).
        let px = main.get_pixel(895, 895);
        assert_eq!(px[0], 2);
        assert_eq!(px[1], 40);
        assert_eq!(px[2], 206);
        // Outside the window entirely.
        assert_eq!(*main.get_pixel(100, 100), Rgba([10, 200, 10, 255]));
    }

    #[test]
    fn logo_composite_preserves_main_dimensions() {
        let mut main = black_main(640, 480);
        let logo = RgbaImage::from_pixel(64, 32, Rgba([200, 0, 0, 255]));
        WatermarkCompositor::new().composite_logo(&mut main, &logo);
        assert_eq!(main.dimensions(), (640, 480));
    }

    #[test]
    fn non_square_logo_keeps_aspect_ratio() {
        let mut main = black_main(1000, 1000);
        // 100x50 logo -> scaled 150x75, anchored at (820, 895).
        let logo = RgbaImage::from_pixel(100, 50, Rgba([255, 0, 0, 255]));
        WatermarkCompositor::new().composite_logo(&mut main, &logo);

        assert_eq!(*main.get_pixel(821, 896), Rgba([204, 0, 0, 255]));
        assert_eq!(*main.get_pixel(821, 880), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn empty_logo_is_a_no_op() {
        let mut main = black_main(100, 100);
        let logo = RgbaImage::new(0, 0);
        WatermarkCompositor::new().composite_logo(&mut main, &logo);
        assert!(main.pixels().all(|px| *px == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn text_font_size_tracks_width_with_floor() {
        assert!((text_font_size(1000) - 50.0).abs() < f32::EPSILON);
        assert!((text_font_size(2048) - 102.0).abs() < f32::EPSILON);
        // 5% of 100 is 5, below the 16px floor.
        assert!((text_font_size(100) - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn composite_prefers_logo_when_bytes_decode() {
        let mut main = black_main(400, 400);
        let logo = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(logo)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let kind = WatermarkCompositor::new()
            .composite(&mut main, Some(&bytes), &WatermarkOptions::default())
            .unwrap();
        assert_eq!(kind, WatermarkKind::Logo);
    }

    #[test]
    fn composite_falls_back_to_text_on_corrupt_logo() {
        // System-dependent: only runs where a known serif font exists.
        if WatermarkFont::discover().is_none() {
            return;
        }

        let mut main = black_main(400, 400);
        let kind = WatermarkCompositor::new()
            .composite(&mut main, Some(b"corrupt bytes"), &WatermarkOptions::default())
            .unwrap();
        assert_eq!(kind, WatermarkKind::Text);
        assert_eq!(main.dimensions(), (400, 400));

        let touched = main.pixels().filter(|px| px[0] > 0).count();
        assert!(touched > 0, "Text fallback should draw something");
    }
}
