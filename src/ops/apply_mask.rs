use image::{imageops, imageops::FilterType, Rgba};
use imageproc::map::map_colors2;

use crate::{
    codec::{PixelCodec, Raster},
    error::CodecError,
    payload::ImagePayload,
};

/// Combines an image with a grayscale mask, taking the output alpha channel
/// from the mask's red channel.
///
/// Grayscale mask convention: white (255) keeps a pixel fully opaque, black
/// (0) makes it fully transparent. RGB channels pass through unchanged. A
/// mask whose dimensions differ from the image is silently resampled to
/// match before the per-pixel combination, mirroring how a drawing surface
/// stretches the mask when compositing.
pub fn apply_mask_raster(original: &Raster, mask: &Raster) -> Raster {
    let combine = |Rgba([red, green, blue, _]): Rgba<u8>, Rgba([luma, _, _, _]): Rgba<u8>| {
        Rgba([red, green, blue, luma])
    };

    if mask.dimensions() == original.dimensions() {
        return map_colors2(original, mask, combine);
    }

    let (width, height) = original.dimensions();
    let resampled = imageops::resize(mask, width, height, FilterType::Triangle);
    map_colors2(original, &resampled, combine)
}

/// Payload-level mask application: decodes both inputs, combines them, and
/// re-encodes as PNG (the source format may not carry alpha).
///
/// # Errors
///
/// `CodecError` when either payload fails to decode or the PNG encode fails.
pub fn apply_mask<C: PixelCodec>(
    codec: &C,
    original: &ImagePayload,
    mask: &ImagePayload,
) -> Result<ImagePayload, CodecError> {
    let original_raster = codec.decode(original)?;
    let mask_raster = codec.decode(mask)?;
    codec.encode_png(&apply_mask_raster(&original_raster, &mask_raster))
}
