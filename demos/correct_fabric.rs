//! Correct the color cast in a single fabric photo.
//!
//! Usage:
//! ```sh
//! cargo run --example correct_fabric -- input.jpg output.jpg
//! ```

use std::env;
use std::process;

use fabric_pipeline::{ColorCorrector, CorrectOptions};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output>", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];

    let corrector = ColorCorrector::new();
    let result = corrector.process_file(input.as_ref(), output.as_ref(), &CorrectOptions::default());

    if result.skipped {
        println!("Skipped: {}", result.message);
    } else if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
