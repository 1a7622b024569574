use std::path::Path;

use image::{Rgba, RgbaImage};

use fabric_pipeline::{
    load_image, save_image, ColorCorrector, CorrectOptions, WatermarkCompositor, WatermarkFont,
    WatermarkKind, WatermarkOptions,
};

fn write_png(img: &RgbaImage, path: &Path) {
    save_image(img, path, 95).unwrap();
}

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn correction_pipeline_reduces_cast_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("warm.png");
    let output = dir.path().join("warm_corrected.png");

    // Warm indoor cast: red well above green and blue.
    let img = RgbaImage::from_pixel(64, 64, Rgba([210, 120, 80, 255]));
    write_png(&img, &input);

    let corrector = ColorCorrector::new();
    assert!(corrector.needs_correction(&img));

    let result = corrector.process_file(&input, &output, &CorrectOptions::default());
    assert!(result.success, "{}", result.message);
    assert!(!result.skipped);

    let corrected = load_image(&output).unwrap();
    assert_eq!(corrected.dimensions(), (64, 64));
    let before = corrector.detect(&img).max_relative_deviation;
    let after = corrector.detect(&corrected).max_relative_deviation;
    assert!(after < before, "before={before}, after={after}");
    for px in corrected.pixels() {
        assert_eq!(px[3], 255);
    }
}

#[test]
fn correction_skips_neutral_image_unless_forced() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("neutral.png");
    let output = dir.path().join("out.png");

    write_png(
        &RgbaImage::from_pixel(32, 32, Rgba([128, 128, 128, 255])),
        &input,
    );

    let corrector = ColorCorrector::new();
    let result = corrector.process_file(&input, &output, &CorrectOptions::default());
    assert!(result.skipped);
    assert!(!output.exists());

    let opts = CorrectOptions {
        force: true,
        ..CorrectOptions::default()
    };
    let result = corrector.process_file(&input, &output, &opts);
    assert!(result.success && !result.skipped);
    assert!(output.exists());
}

#[test]
fn batch_correction_continues_past_undecodable_files() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    std::fs::create_dir(&input_dir).unwrap();

    write_png(
        &RgbaImage::from_pixel(32, 32, Rgba([210, 110, 70, 255])),
        &input_dir.join("good.png"),
    );
    std::fs::write(input_dir.join("bad.png"), b"not an image").unwrap();

    let results = ColorCorrector::new().process_directory(
        &input_dir,
        &output_dir,
        &CorrectOptions::default(),
    );
    assert_eq!(results.len(), 2);
    assert_eq!(results.iter().filter(|r| r.success).count(), 1);
    assert_eq!(results.iter().filter(|r| !r.success).count(), 1);
    assert!(output_dir.join("good.png").exists());
}

#[test]
fn watermark_process_file_composites_logo() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("result.png");
    let logo_path = dir.path().join("logo.png");
    let output = dir.path().join("result_watermarked.png");

    write_png(
        &RgbaImage::from_pixel(1000, 1000, Rgba([0, 0, 0, 255])),
        &input,
    );
    write_png(
        &RgbaImage::from_pixel(100, 100, Rgba([0, 0, 255, 255])),
        &logo_path,
    );

    let result = WatermarkCompositor::new().process_file(
        &input,
        Some(&logo_path),
        &output,
        &WatermarkOptions::default(),
    );
    assert!(result.success, "{}", result.message);
    assert!(result.message.contains("logo"));

    let out = load_image(&output).unwrap();
    assert_eq!(out.dimensions(), (1000, 1000));
    // 15% scale with 3% padding: the mark occupies (820..970, 820..970).
    assert_eq!(*out.get_pixel(895, 895), Rgba([0, 0, 204, 255]));
    assert_eq!(*out.get_pixel(100, 100), Rgba([0, 0, 0, 255]));
}

#[test]
fn watermark_falls_back_to_text_when_logo_file_is_missing() {
    // System-dependent: only runs where a known serif font exists.
    if WatermarkFont::discover().is_none() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("result.png");
    let output = dir.path().join("out.png");

    write_png(
        &RgbaImage::from_pixel(1000, 1000, Rgba([0, 0, 0, 255])),
        &input,
    );

    let result = WatermarkCompositor::new().process_file(
        &input,
        Some(&dir.path().join("no_such_logo.png")),
        &output,
        &WatermarkOptions::default(),
    );
    assert!(result.success, "{}", result.message);
    assert!(result.message.contains("fallback"));

    let out = load_image(&output).unwrap();
    assert_eq!(out.dimensions(), (1000, 1000));
    let touched = out.pixels().filter(|px| px[0] > 0).count();
    assert!(touched > 0, "Text fallback should have drawn glyphs");
}

#[test]
fn composite_accepts_in_memory_logo_bytes() {
    let mut main = RgbaImage::from_pixel(400, 400, Rgba([30, 30, 30, 255]));
    let logo_bytes = encode_png(&RgbaImage::from_pixel(50, 50, Rgba([200, 0, 0, 255])));

    let kind = WatermarkCompositor::new()
        .composite(&mut main, Some(&logo_bytes), &WatermarkOptions::default())
        .unwrap();
    assert_eq!(kind, WatermarkKind::Logo);
    assert_eq!(main.dimensions(), (400, 400));
}

#[test]
fn chained_pipeline_correct_then_watermark() {
    let mut fabric = RgbaImage::from_pixel(500, 500, Rgba([220, 130, 90, 255]));

    let corrector = ColorCorrector::new();
    let gains = corrector.correct(&mut fabric);
    for g in gains {
        assert!((0.6..=1.5).contains(&g));
    }

    let logo_bytes = encode_png(&RgbaImage::from_pixel(40, 40, Rgba([0, 120, 255, 255])));
    let kind = WatermarkCompositor::new()
        .composite(&mut fabric, Some(&logo_bytes), &WatermarkOptions::default())
        .unwrap();
    assert_eq!(kind, WatermarkKind::Logo);
    assert_eq!(fabric.dimensions(), (500, 500));
}
