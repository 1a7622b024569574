//! Chroma-key transparency removal for logo bitmaps.
//!
//! Logo assets ship on a flat background color. Every pixel within a
//! Euclidean RGB distance of the key color gets its alpha cleared; the
//! tolerance is looser than a typical chroma key because compressed logos
//! carry anti-aliasing fringes around the background that must also go.

use image::RgbaImage;

/// Brand logo background color (a yellow).
const BRAND_KEY_RGB: [u8; 3] = [240, 230, 74];

/// Distance tolerance for the brand key, loose enough to catch fringes.
const BRAND_KEY_TOLERANCE: f32 = 100.0;

/// A background color to knock out, with a distance tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorKey {
    /// The key color as (R, G, B).
    pub rgb: [u8; 3],
    /// Euclidean RGB distance below which a pixel becomes transparent.
    pub tolerance: f32,
}

impl ColorKey {
    /// Create a key from a color and tolerance.
    #[must_use]
    pub const fn new(rgb: [u8; 3], tolerance: f32) -> Self {
        Self { rgb, tolerance }
    }

    /// The default key for the brand logo's yellow background.
    #[must_use]
    pub const fn brand_logo() -> Self {
        Self::new(BRAND_KEY_RGB, BRAND_KEY_TOLERANCE)
    }

    /// Euclidean distance from an RGB triple to the key color.
    #[must_use]
    pub fn distance(&self, rgb: [u8; 3]) -> f32 {
        let dr = f32::from(rgb[0]) - f32::from(self.rgb[0]);
        let dg = f32::from(rgb[1]) - f32::from(self.rgb[1]);
        let db = f32::from(rgb[2]) - f32::from(self.rgb[2]);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Clear the alpha of every pixel within the key's tolerance, in place.
///
/// Pixels outside the tolerance are left untouched, RGB included, so the
/// operation is idempotent: alpha is only ever set to 0, never restored.
pub fn remove_color_key(img: &mut RgbaImage, key: &ColorKey) {
    for px in img.pixels_mut() {
        if key.distance([px[0], px[1], px[2]]) < key.tolerance {
            px[3] = 0;
        }
    }
}
