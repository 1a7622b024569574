//! Decode/encode boundary: loading bitmaps, saving them with
//! format-specific quality settings, and output path conventions.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Error, Result};
use crate::ProcessResult;

/// Default JPEG quality for corrected fabric output.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Load an image file and decode it to an RGBA bitmap.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be read or its bytes are not
/// a valid image.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let dyn_img = image::open(path).map_err(Error::Decode)?;
    Ok(dyn_img.to_rgba8())
}

/// Decode an in-memory byte buffer to an RGBA bitmap.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a valid image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).map_err(Error::Decode)?;
    Ok(dyn_img.to_rgba8())
}

/// Save an RGBA image with format-specific quality settings.
///
/// The format is derived from the output path's extension. JPEG honors the
/// `quality` parameter and flattens alpha away (the container has no alpha
/// channel); PNG, WebP and BMP keep the bitmap as-is.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unrecognized extensions,
/// [`Error::Io`] if the output file cannot be created, and [`Error::Encode`]
/// if serialization fails.
pub fn save_image(img: &RgbaImage, path: &Path, quality: u8) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, quality);
            encoder
                .encode_image(&DynamicImage::ImageRgb8(rgb))
                .map_err(Error::Encode)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            DynamicImage::ImageRgba8(img.clone())
                .save(path)
                .map_err(Error::Encode)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Run a per-file operation over every supported image in a directory.
///
/// Shared batch loop for the two engines. Uses parallel iteration when the
/// `cli` feature is enabled (via rayon). Directory-level failures are
/// reported as a single failed [`ProcessResult`].
pub(crate) fn process_directory_with<F>(
    input_dir: &Path,
    output_dir: &Path,
    per_file: F,
) -> Vec<ProcessResult>
where
    F: Fn(&Path, &Path) -> ProcessResult + Sync,
{
    let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect(),
        Err(e) => {
            return vec![ProcessResult {
                path: input_dir.to_path_buf(),
                success: false,
                skipped: false,
                message: format!("Failed to read directory: {e}"),
            }];
        }
    };

    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![ProcessResult {
                path: output_dir.to_path_buf(),
                success: false,
                skipped: false,
                message: format!("Failed to create output directory: {e}"),
            }];
        }
    }

    let run = |input: &PathBuf| {
        let filename = input.file_name().unwrap_or_default();
        let output = output_dir.join(filename);
        per_file(input, &output)
    };

    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        entries.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "cli"))]
    {
        entries.iter().map(run).collect()
    }
}

/// Generate a default output path from an input path and a stage suffix.
///
/// Example: `default_output_path("photo.jpg", "corrected")` yields
/// `"photo_corrected.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_{suffix}.{ext}"))
}
