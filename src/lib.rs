//! Deterministic post-processing for fabric photo pipelines.
//!
//! Two independent transforms, each invokable on its own:
//!
//! - [`ColorCorrector`] neutralizes a global color cast (e.g. warm indoor
//!   lighting) in a fabric photograph using Shades-of-Gray illuminant
//!   estimation, with a cheap sampling heuristic to decide whether
//!   correction is worthwhile.
//! - [`WatermarkCompositor`] stamps the brand mark onto a result image:
//!   chroma-keyed logo in the bottom-right corner at partial opacity, or an
//!   italic text fallback when the logo asset is unavailable.
//!
//! # Quick Start
//!
//! ```no_run
//! use fabric_pipeline::{ColorCorrector, WatermarkCompositor, WatermarkOptions};
//!
//! let mut fabric = image::open("fabric.jpg").unwrap().to_rgba8();
//! let corrector = ColorCorrector::new();
//! if corrector.needs_correction(&fabric) {
//!     corrector.correct(&mut fabric);
//! }
//!
//! let mut result = image::open("generated.png").unwrap().to_rgba8();
//! let logo = std::fs::read("logo.png").ok();
//! WatermarkCompositor::new()
//!     .composite(&mut result, logo.as_deref(), &WatermarkOptions::default())
//!     .unwrap();
//! result.save("final.png").unwrap();
//! ```
//!
//! Correction is best-effort by contract: callers that fail to correct an
//! image should fall back to the uncorrected original rather than abort. A
//! missing or corrupt logo is likewise never an error — the compositor
//! recovers with the text path on its own.

#![deny(missing_docs)]

use std::path::PathBuf;

pub mod cast;
pub mod chroma_key;
mod compositor;
mod corrector;
pub mod error;
pub mod illuminant;
mod io;
pub mod text;

pub use cast::CastResult;
pub use chroma_key::ColorKey;
pub use compositor::{WatermarkCompositor, WatermarkKind, WatermarkOptions};
pub use corrector::{ColorCorrector, CorrectOptions};
pub use error::{Error, Result};
pub use io::{
    decode_image, default_output_path, is_supported_image, load_image, save_image,
    DEFAULT_JPEG_QUALITY,
};
pub use text::WatermarkFont;

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was skipped (no cast detected).
    pub skipped: bool,
    /// Human-readable status message.
    pub message: String,
}
