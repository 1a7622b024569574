//! Shades-of-Gray illuminant estimation and cast-neutralizing gains.
//!
//! The scene illuminant is estimated per channel with a generalized
//! (Minkowski) mean of exponent 6, a middle ground between the gray-world
//! assumption (p=1, undercorrects) and max-RGB (p=inf, dominated by outlier
//! bright pixels). Gains map the estimate back to neutral gray and are
//! clamped so a legitimately monochrome fabric is never pushed to an
//! obviously wrong color.

use image::RgbaImage;

/// Minkowski norm exponent for illuminant estimation.
const MINKOWSKI_EXPONENT: i32 = 6;

/// Lower clamp for per-channel gains.
const MIN_GAIN: f64 = 0.6;

/// Upper clamp for per-channel gains.
const MAX_GAIN: f64 = 1.5;

/// Channels estimated at or below this are treated as black: gain stays 1.0
/// instead of dividing by a near-zero estimate.
const DARK_CHANNEL_FLOOR: f64 = 0.01;

/// Estimate the scene illuminant color, one value per channel in `[0, 1]`.
///
/// For each channel: normalize every pixel to `[0, 1]`, raise to the 6th
/// power, average over all pixels, take the 6th root. Sums are accumulated
/// in `f64`; sixth powers over a megapixel image exhaust `f32` precision.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn estimate_illuminant(img: &RgbaImage) -> [f32; 3] {
    let pixel_count = f64::from(img.width()) * f64::from(img.height());
    if pixel_count < 1.0 {
        return [0.0, 0.0, 0.0];
    }

    let mut sums = [0.0_f64; 3];
    for px in img.pixels() {
        for ch in 0..3 {
            let v = f64::from(px[ch]) / 255.0;
            sums[ch] += v.powi(MINKOWSKI_EXPONENT);
        }
    }

    let root = 1.0 / f64::from(MINKOWSKI_EXPONENT);
    sums.map(|s| (s / pixel_count).powf(root) as f32)
}

/// Derive per-channel correction gains from an illuminant estimate.
///
/// The estimate is mapped to its own neutral gray (the mean of the three
/// channels). Channels at or below the dark floor keep a gain of 1.0, and
/// every gain is clamped to `[0.6, 1.5]` to bound worst-case correction.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn derive_gains(estimate: [f32; 3]) -> [f32; 3] {
    let est = estimate.map(f64::from);
    let gray_target = (est[0] + est[1] + est[2]) / 3.0;

    est.map(|e| {
        let raw = if e > DARK_CHANNEL_FLOOR {
            gray_target / e
        } else {
            1.0
        };
        raw.clamp(MIN_GAIN, MAX_GAIN) as f32
    })
}

/// Multiply every pixel's R, G, B by the channel gains, in place.
///
/// Values are rounded to nearest and clamped to `[0, 255]`. Alpha is never
/// touched. Each pixel is visited exactly once.
pub fn apply_gains(img: &mut RgbaImage, gains: [f32; 3]) {
    for px in img.pixels_mut() {
        for ch in 0..3 {
            let scaled = f32::from(px[ch]) * gains[ch];
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                px[ch] = scaled.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
