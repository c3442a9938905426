//! Client-side pipeline for a generative image-editing studio: payload
//! decode/encode, mask compositing, upscaling, background-emptiness
//! classification, prompt assembly, and orchestration of a remote
//! Gemini-style generation service.

mod codec;
mod error;
mod ops;
mod payload;
pub mod prompt;
mod remote;
mod workflow;

pub use codec::{ImageCodec, PixelCodec, Raster};
pub use error::{CodecError, RemoteError, TranslationError, WorkflowError};
pub use ops::apply_mask::{apply_mask, apply_mask_raster};
pub use ops::background::{
    is_background_empty, is_background_empty_raster, BackgroundHeuristics,
};
pub use ops::upscale::{upscale, upscale_raster, UpscaleFactor};
pub use payload::ImagePayload;
pub use prompt::{AspectRatio, ComicStyle, IdeaCategory, Process, StylePreset};
pub use remote::gemini::GeminiClient;
pub use remote::segment::{
    normalize_segments, GeneratedSegment, RawSegment, NO_CONTENT_FALLBACK,
};
pub use remote::{translate_or_original, translate_to_english, GenerateService, ResponseMode};
pub use workflow::{PrimaryEdit, Studio, WorkflowSlot, WorkflowState};
