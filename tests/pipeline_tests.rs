//! Integration tests for the payload-level pixel pipeline: decode/encode,
//! mask compositing, upscaling, and background classification working
//! together on real PNG bytes.

use genimage_kit::{
    apply_mask, is_background_empty, upscale, BackgroundHeuristics, ImageCodec, ImagePayload,
    PixelCodec, Raster, UpscaleFactor,
};
use image::Rgba;

fn encode(raster: &Raster) -> ImagePayload {
    ImageCodec.encode_png(raster).expect("PNG encode should succeed")
}

fn solid(width: u32, height: u32, pixel: [u8; 4]) -> Raster {
    Raster::from_pixel(width, height, Rgba(pixel))
}

#[test]
fn png_round_trip_is_lossless() {
    let codec = ImageCodec;
    let original = Raster::from_fn(9, 11, |x, y| {
        Rgba([x as u8 * 20, y as u8 * 20, 200, 255 - (x + y) as u8])
    });

    let decoded = codec.decode(&encode(&original)).unwrap();
    assert_eq!(decoded.dimensions(), original.dimensions());
    assert_eq!(decoded.as_raw(), original.as_raw());
}

#[test]
fn quadrant_mask_cuts_out_three_quadrants() {
    // 10x10 uniform blue original; mask white in the top-left 5x5 quadrant,
    // black elsewhere. The cut-out keeps RGB everywhere and keeps alpha only
    // in the white quadrant.
    let codec = ImageCodec;
    let original = encode(&solid(10, 10, [0, 0, 255, 255]));
    let mask_raster = Raster::from_fn(10, 10, |x, y| {
        if x < 5 && y < 5 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    let mask = encode(&mask_raster);

    let result = apply_mask(&codec, &original, &mask).unwrap();
    assert_eq!(result.mime_type(), "image/png");

    let pixels = codec.decode(&result).unwrap();
    assert_eq!(pixels.dimensions(), (10, 10));
    for (x, y, pixel) in pixels.enumerate_pixels() {
        let expected_alpha = if x < 5 && y < 5 { 255 } else { 0 };
        assert_eq!(pixel.0, [0, 0, 255, expected_alpha], "pixel at ({x}, {y})");
    }
}

#[test]
fn jpeg_original_becomes_png_after_masking() {
    // A JPEG source cannot carry alpha; masking must re-encode as PNG.
    let codec = ImageCodec;
    let raster = solid(6, 6, [180, 90, 45, 255]);
    let mut jpeg_bytes = Vec::new();
    image::DynamicImage::ImageRgba8(raster)
        .to_rgb8()
        .write_to(
            &mut std::io::Cursor::new(&mut jpeg_bytes),
            image::ImageFormat::Jpeg,
        )
        .unwrap();
    let original = ImagePayload::new(jpeg_bytes, "image/jpeg");
    let mask = encode(&solid(6, 6, [0, 0, 0, 255]));

    let result = apply_mask(&codec, &original, &mask).unwrap();
    assert_eq!(result.mime_type(), "image/png");
    assert!(codec.decode(&result).unwrap().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn mask_of_different_size_is_reconciled() {
    let codec = ImageCodec;
    let original = encode(&solid(8, 8, [10, 10, 10, 255]));
    let mask = encode(&solid(4, 4, [255, 255, 255, 255]));

    let result = apply_mask(&codec, &original, &mask).unwrap();
    let pixels = ImageCodec.decode(&result).unwrap();
    assert_eq!(pixels.dimensions(), (8, 8));
    assert!(pixels.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn upscale_doubles_and_quadruples_exactly() {
    let codec = ImageCodec;
    let payload = encode(&solid(15, 9, [120, 130, 140, 255]));

    let doubled = upscale(&codec, &payload, UpscaleFactor::X2).unwrap();
    assert_eq!(codec.decode(&doubled).unwrap().dimensions(), (30, 18));

    let quadrupled = upscale(&codec, &payload, UpscaleFactor::X4).unwrap();
    assert_eq!(codec.decode(&quadrupled).unwrap().dimensions(), (60, 36));
}

#[test]
fn classifier_on_payloads_matches_spec_cases() {
    let codec = ImageCodec;
    let heuristics = BackgroundHeuristics::default();

    let transparent = encode(&solid(10, 10, [0, 0, 0, 0]));
    assert!(is_background_empty(&codec, &transparent, &heuristics));

    let uniform = encode(&solid(10, 10, [200, 200, 200, 255]));
    assert!(is_background_empty(&codec, &uniform, &heuristics));

    let checkerboard = encode(&Raster::from_fn(10, 10, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    }));
    assert!(!is_background_empty(&codec, &checkerboard, &heuristics));
}

#[test]
fn masked_output_feeds_back_into_classifier() {
    // Cutting out a background produces transparency, which the classifier
    // must then report as an empty background.
    let codec = ImageCodec;
    let original = encode(&solid(12, 12, [90, 40, 10, 255]));
    let mask = encode(&Raster::from_fn(12, 12, |x, _| {
        if x < 6 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    }));

    assert!(!is_background_empty(&codec, &original, &BackgroundHeuristics::default()));
    let cut_out = apply_mask(&codec, &original, &mask).unwrap();
    assert!(is_background_empty(&codec, &cut_out, &BackgroundHeuristics::default()));
}
