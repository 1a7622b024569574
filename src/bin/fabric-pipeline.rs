use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use fabric_pipeline::{
    default_output_path, ColorCorrector, CorrectOptions, ProcessResult, WatermarkCompositor,
    WatermarkOptions,
};

#[derive(Parser)]
#[command(
    name = "fabric-pipeline",
    about = "Color-cast correction and brand watermarking for fabric photo pipelines",
    version,
    after_help = "Simple usage:\n  \
                  fabric-pipeline correct fabric.jpg        (skip if no cast detected)\n  \
                  fabric-pipeline watermark result.png --logo brand.png"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Neutralize a global color cast in fabric photos
    Correct {
        /// Input image file or directory
        input: String,

        /// Skip cast detection, correct unconditionally
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Stamp the brand watermark onto generated results
    Watermark {
        /// Input image file or directory
        input: String,

        /// Logo image to composite; missing or unreadable falls back to text
        #[arg(long)]
        logo: Option<String>,

        /// Text for the fallback path (default: brand string)
        #[arg(long)]
        text: Option<String>,

        /// Font file for the text fallback (default: system serif)
        #[arg(long)]
        font: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Output file or directory (default: {name}_{suffix}.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// JPEG quality for saved output (1-100)
    #[arg(long, default_value = "95")]
    quality: u8,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let (results, common) = match cli.command {
        Command::Correct {
            input,
            force,
            common,
        } => {
            validate_common(&common);
            let opts = CorrectOptions {
                force,
                quality: common.quality,
                verbose: common.verbose,
                quiet: common.quiet,
            };
            let results = run_correct(&input, &common, &opts);
            (results, common)
        }
        Command::Watermark {
            input,
            logo,
            text,
            font,
            common,
        } => {
            validate_common(&common);
            let mut opts = WatermarkOptions {
                quality: common.quality,
                verbose: common.verbose,
                quiet: common.quiet,
                ..WatermarkOptions::default()
            };
            if let Some(text) = text {
                opts.text = text;
            }
            opts.font_path = font.map(PathBuf::from);
            let results = run_watermark(&input, logo.as_deref(), &common, &opts);
            (results, common)
        }
    };

    let mut success_count = 0u32;
    let mut skip_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &common);
        if r.skipped {
            skip_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !common.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if skip_count > 0 {
            eprint!(", Skipped: {skip_count}");
        }
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn validate_common(common: &CommonArgs) {
    if !(1..=100).contains(&common.quality) {
        eprintln!("Error: Quality must be between 1 and 100");
        process::exit(1);
    }
}

fn run_correct(input: &str, common: &CommonArgs, opts: &CorrectOptions) -> Vec<ProcessResult> {
    let input_path = require_input(input);
    let corrector = ColorCorrector::new();

    if input_path.is_dir() {
        let output_dir = require_output_dir(common, "correct");
        corrector.process_directory(input_path, &output_dir, opts)
    } else {
        let output_path = output_for_file(common, input_path, "corrected");
        vec![corrector.process_file(input_path, &output_path, opts)]
    }
}

fn run_watermark(
    input: &str,
    logo: Option<&str>,
    common: &CommonArgs,
    opts: &WatermarkOptions,
) -> Vec<ProcessResult> {
    let input_path = require_input(input);
    let logo_path = logo.map(Path::new);
    let compositor = WatermarkCompositor::new();

    if input_path.is_dir() {
        let output_dir = require_output_dir(common, "watermark");
        compositor.process_directory(input_path, logo_path, &output_dir, opts)
    } else {
        let output_path = output_for_file(common, input_path, "watermarked");
        vec![compositor.process_file(input_path, logo_path, &output_path, opts)]
    }
}

fn require_input(input: &str) -> &Path {
    let path = Path::new(input);
    if !path.exists() {
        eprintln!("Error: Input path does not exist: {input}");
        process::exit(1);
    }
    path
}

fn require_output_dir(common: &CommonArgs, subcommand: &str) -> PathBuf {
    match &common.output {
        Some(o) => PathBuf::from(o),
        None => {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: fabric-pipeline {subcommand} <input_dir> -o <output_dir>");
            process::exit(1);
        }
    }
}

fn output_for_file(common: &CommonArgs, input: &Path, suffix: &str) -> PathBuf {
    match &common.output {
        Some(o) => PathBuf::from(o),
        None => default_output_path(input, suffix),
    }
}

fn print_result(result: &ProcessResult, common: &CommonArgs) {
    if common.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        if !common.quiet {
            eprintln!("[SKIP] {filename}: {}", result.message);
        }
    } else if result.success {
        if !common.quiet {
            eprintln!("[OK] {filename}: {}", result.message);
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if common.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
