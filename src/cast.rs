//! Cheap color-cast detection.
//!
//! Decides whether running the full corrector is worthwhile by measuring the
//! channel imbalance of a small downsampled copy. This is deliberately NOT
//! the Minkowski estimator used for correction: the two use unrelated
//! statistics and thresholds, and may disagree on borderline images.

use image::RgbaImage;

/// Side length of the square sample the image is reduced to.
const SAMPLE_SIZE: u32 = 100;

/// Relative channel imbalance that signals a cast worth correcting.
const CAST_THRESHOLD: f32 = 0.15;

/// Result of cast detection.
#[derive(Debug, Clone)]
pub struct CastResult {
    /// Whether the channel imbalance exceeds the correction threshold.
    pub needs_correction: bool,
    /// Arithmetic per-channel means of the sample, in `[0, 255]`.
    pub channel_means: [f32; 3],
    /// Worst channel deviation relative to the overall mean, in `[0, 1+]`.
    pub max_relative_deviation: f32,
}

/// Decide whether an image carries a global color cast worth correcting.
///
/// The image is reduced to a 100x100 sample, per-channel arithmetic means
/// are taken, and a cast is reported iff any channel deviates from the
/// overall mean by more than 15% of that mean.
#[must_use]
pub fn detect_cast(img: &RgbaImage) -> CastResult {
    if img.width() == 0 || img.height() == 0 {
        return CastResult {
            needs_correction: false,
            channel_means: [0.0, 0.0, 0.0],
            max_relative_deviation: 0.0,
        };
    }

    let sample = image::imageops::thumbnail(img, SAMPLE_SIZE, SAMPLE_SIZE);
    let pixel_count = f64::from(sample.width()) * f64::from(sample.height());

    let mut sums = [0.0_f64; 3];
    for px in sample.pixels() {
        for ch in 0..3 {
            sums[ch] += f64::from(px[ch]);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let means = sums.map(|s| (s / pixel_count) as f32);
    let overall = (means[0] + means[1] + means[2]) / 3.0;
    let threshold = CAST_THRESHOLD * overall;

    let max_deviation = means
        .iter()
        .map(|m| (m - overall).abs())
        .fold(0.0_f32, f32::max);

    CastResult {
        needs_correction: max_deviation > threshold,
        channel_means: means,
        max_relative_deviation: if overall > 0.0 {
            max_deviation / overall
        } else {
            0.0
        },
    }
}
