use image::imageops;

use crate::{codec::PixelCodec, codec::Raster, payload::ImagePayload};

/// Tunable constants for background-emptiness classification.
///
/// The defaults reproduce long-observed behavior: a probe thumbnail of at
/// most 100x100 pixels and a per-channel tolerance of 5 to absorb
/// compression artifacts. Neither value has a derivation beyond matching
/// that behavior, which is why they are parameters and not literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundHeuristics {
    /// Upper bound on each probe dimension, in pixels.
    pub probe_size: u32,
    /// Maximum absolute per-channel difference from the first sampled pixel
    /// for the image to still count as a uniform canvas.
    pub channel_tolerance: u8,
}

impl Default for BackgroundHeuristics {
    fn default() -> Self {
        Self {
            probe_size: 100,
            channel_tolerance: 5,
        }
    }
}

/// Classifies whether a raster's background is "effectively empty": either
/// some transparency is present, or the whole image is a near-uniform solid
/// color.
///
/// The decision procedure, first match wins:
/// 1. any sampled pixel with alpha below 255 -> empty;
/// 2. every sampled pixel's RGB within `channel_tolerance` of the first
///    pixel's, per channel independently -> empty;
/// 3. otherwise -> not empty.
///
/// The image is downsampled to at most `probe_size` per dimension before
/// sampling; the bound is a performance knob, not a correctness requirement.
pub fn is_background_empty_raster(image: &Raster, heuristics: &BackgroundHeuristics) -> bool {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return false;
    }

    let bound = heuristics.probe_size.max(1);
    let scratch;
    let probe = if width > bound || height > bound {
        scratch = imageops::thumbnail(image, width.min(bound), height.min(bound));
        &scratch
    } else {
        image
    };

    if probe.pixels().any(|pixel| pixel.0[3] < 255) {
        return true;
    }

    let tolerance = i16::from(heuristics.channel_tolerance);
    let first = probe.pixels().next().map(|pixel| pixel.0);
    let Some([base_r, base_g, base_b, _]) = first else {
        return false;
    };

    probe.pixels().all(|pixel| {
        let [r, g, b, _] = pixel.0;
        (i16::from(r) - i16::from(base_r)).abs() <= tolerance
            && (i16::from(g) - i16::from(base_g)).abs() <= tolerance
            && (i16::from(b) - i16::from(base_b)).abs() <= tolerance
    })
}

/// Payload-level classification.
///
/// Fails safe: if the payload cannot be decoded the answer is `false`
/// ("has a background"). The caller uses the signal only to decide whether
/// to inject a background-generation instruction into a prompt, and wrongly
/// treating a busy image as empty is the more harmful mistake.
pub fn is_background_empty<C: PixelCodec>(
    codec: &C,
    image: &ImagePayload,
    heuristics: &BackgroundHeuristics,
) -> bool {
    match codec.decode(image) {
        Ok(raster) => is_background_empty_raster(&raster, heuristics),
        Err(error) => {
            tracing::debug!(%error, "background check skipped, assuming background present");
            false
        }
    }
}
