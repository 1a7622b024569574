//! Stamp the brand watermark onto a generated result image.
//!
//! Falls back to the text watermark when the logo cannot be loaded.
//!
//! Usage:
//! ```sh
//! cargo run --example apply_watermark -- input.png output.png [logo.png]
//! ```

use std::env;
use std::path::Path;
use std::process;

use fabric_pipeline::{WatermarkCompositor, WatermarkOptions};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output> [logo]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let logo = args.get(3).map(Path::new);

    let compositor = WatermarkCompositor::new();
    let result = compositor.process_file(
        input.as_ref(),
        logo,
        output.as_ref(),
        &WatermarkOptions::default(),
    );

    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
