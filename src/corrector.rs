//! Color correction engine.

use std::path::Path;

use image::RgbaImage;

use crate::cast::{self, CastResult};
use crate::illuminant;
use crate::io::{self, DEFAULT_JPEG_QUALITY};
use crate::ProcessResult;

/// Options controlling color correction behavior.
#[derive(Debug, Clone)]
pub struct CorrectOptions {
    /// Skip cast detection, correct unconditionally.
    pub force: bool,
    /// JPEG quality for saved output (ignored for lossless formats).
    pub quality: u8,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for CorrectOptions {
    fn default() -> Self {
        Self {
            force: false,
            quality: DEFAULT_JPEG_QUALITY,
            verbose: false,
            quiet: false,
        }
    }
}

/// Removes global color casts from fabric photographs.
///
/// Stateless: create once and reuse across any number of images, including
/// from parallel batch workers. Correction is best-effort by contract —
/// callers that cannot correct an image are expected to fall back to the
/// uncorrected original rather than abort their flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCorrector;

impl ColorCorrector {
    /// Create a new corrector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Neutralize the estimated color cast in-place.
    ///
    /// Estimates the illuminant, derives clamped per-channel gains, and
    /// rewrites every pixel once. Returns the gains that were applied.
    /// Dimensions and alpha are left untouched.
    #[allow(clippy::unused_self)] // method on `self` for API consistency
    pub fn correct(&self, img: &mut RgbaImage) -> [f32; 3] {
        let estimate = illuminant::estimate_illuminant(img);
        let gains = illuminant::derive_gains(estimate);
        illuminant::apply_gains(img, gains);
        gains
    }

    /// Run cast detection on an image.
    ///
    /// This is the cheap sampling heuristic, not the Minkowski estimator;
    /// the two intentionally use unrelated statistics.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn detect(&self, img: &RgbaImage) -> CastResult {
        cast::detect_cast(img)
    }

    /// Whether the heuristic considers correction worthwhile.
    #[must_use]
    pub fn needs_correction(&self, img: &RgbaImage) -> bool {
        self.detect(img).needs_correction
    }

    /// Process a single image file: load, gate on detection, correct, save.
    ///
    /// Returns a [`ProcessResult`] indicating success, skip, or failure.
    /// Failures are reported in the result rather than returned as errors so
    /// batch callers can keep going and fall back to the original file.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        opts: &CorrectOptions,
    ) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            success: false,
            skipped: false,
            message: String::new(),
        };

        let mut img = match io::load_image(input) {
            Ok(img) => img,
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };

        if !opts.force {
            let cast = self.detect(&img);
            if !cast.needs_correction {
                result.skipped = true;
                result.success = true;
                result.message = format!(
                    "No color cast detected ({:.0}% channel imbalance)",
                    cast.max_relative_deviation * 100.0
                );
                return result;
            }
        }

        let gains = self.correct(&mut img);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match io::save_image(&img, output, opts.quality) {
            Ok(()) => {
                result.success = true;
                result.message = format!(
                    "Corrected (gains {:.2}/{:.2}/{:.2})",
                    gains[0], gains[1], gains[2]
                );
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
        output_dir: &Path,
        opts: &CorrectOptions,
    ) -> Vec<ProcessResult> {
        io::process_directory_with(input_dir, output_dir, |input, output| {
            self.process_file(input, output, opts)
        })
    }
}
