use image::{imageops, imageops::FilterType};

use crate::{
    codec::{PixelCodec, Raster},
    error::CodecError,
    payload::ImagePayload,
};

/// Supported integer enlargement factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpscaleFactor {
    /// Double each dimension.
    #[default]
    X2,
    /// Quadruple each dimension.
    X4,
}

impl UpscaleFactor {
    /// The dimension multiplier.
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::X2 => 2,
            Self::X4 => 4,
        }
    }
}

/// Enlarges a raster to an exact integer multiple of its dimensions.
///
/// Resampling uses a Catmull-Rom (bicubic) filter for perceptually smooth
/// enlargement; nearest-neighbor replication would pixelate and defeat the
/// point of the upscale step. Any detail enhancement beyond resampling is
/// the remote model's job, upstream of this call.
pub fn upscale_raster(image: &Raster, factor: UpscaleFactor) -> Raster {
    let (width, height) = image.dimensions();
    let multiplier = factor.multiplier();
    imageops::resize(
        image,
        width * multiplier,
        height * multiplier,
        FilterType::CatmullRom,
    )
}

/// Payload-level upscale: decode, resample, re-encode as PNG.
///
/// # Errors
///
/// `CodecError` on undecodable input or PNG encode failure.
pub fn upscale<C: PixelCodec>(
    codec: &C,
    image: &ImagePayload,
    factor: UpscaleFactor,
) -> Result<ImagePayload, CodecError> {
    let raster = codec.decode(image)?;
    codec.encode_png(&upscale_raster(&raster, factor))
}
