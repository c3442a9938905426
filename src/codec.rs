use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::{error::CodecError, payload::ImagePayload};

/// Decoded pixel grid in RGBA8 form: row-major, unpremultiplied alpha,
/// `samples.len() == width * height * 4` by construction.
pub type Raster = RgbaImage;

/// Decode/encode capability, injected as a collaborator so the pixel
/// operations stay pure functions over [`Raster`] buffers.
pub trait PixelCodec {
    /// Decodes an encoded payload into an RGBA raster.
    ///
    /// # Errors
    ///
    /// `CodecError::Decode` when the bytes are not a supported raster format.
    fn decode(&self, payload: &ImagePayload) -> Result<Raster, CodecError>;

    /// Re-encodes a raster as a PNG payload.
    ///
    /// PNG is the only output format: it is lossless and carries the alpha
    /// channel that mask compositing produces.
    ///
    /// # Errors
    ///
    /// `CodecError::Encode` when the PNG encoder fails.
    fn encode_png(&self, raster: &Raster) -> Result<ImagePayload, CodecError>;
}

/// Default codec backed by the `image` crate (PNG, JPEG and WebP decoding).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl PixelCodec for ImageCodec {
    fn decode(&self, payload: &ImagePayload) -> Result<Raster, CodecError> {
        let decoded =
            image::load_from_memory(payload.bytes()).map_err(|source| CodecError::Decode {
                mime_type: payload.mime_type().to_string(),
                source,
            })?;
        Ok(decoded.to_rgba8())
    }

    fn encode_png(&self, raster: &Raster) -> Result<ImagePayload, CodecError> {
        let mut bytes = Vec::new();
        raster
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(CodecError::Encode)?;
        Ok(ImagePayload::png(bytes))
    }
}
