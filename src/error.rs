use thiserror::Error;

/// Error type for payload decode/encode operations
///
/// Raised when a byte payload cannot be interpreted as a raster image,
/// or when re-encoding a raster back to bytes fails.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload bytes are not a supported raster image format
    #[error("failed to decode `{mime_type}` payload: {source}")]
    Decode {
        /// Declared MIME type of the offending payload
        mime_type: String,
        #[source]
        source: image::ImageError,
    },

    /// Re-encoding a raster buffer to PNG failed
    #[error("failed to encode raster as PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Error type for calls to the remote generation service
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No API key available in the environment
    #[error("GEMINI_API_KEY or GOOGLE_API_KEY not set")]
    MissingApiKey,

    /// Transport-level failure (connect, timeout, body read)
    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status
    #[error("generation service returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    /// The response body did not have the expected shape
    #[error("malformed response from generation service: {0}")]
    MalformedResponse(String),

    /// The service was asked for an image but returned none
    #[error("generation service returned no image")]
    NoImageReturned,

    /// A returned mask payload is in a format the mask pipeline cannot use
    #[error("service returned an unusable mask format ({mime_type})")]
    InvalidMaskFormat { mime_type: String },
}

/// Error type for the translation helper
///
/// Translation failure is never fatal to a workflow; callers fall back to
/// the untranslated text. The type exists so the fallback site can log the
/// underlying cause.
#[derive(Debug, Error)]
#[error("translation failed: {0}")]
pub struct TranslationError(#[from] pub RemoteError);

/// Error type for orchestrated workflows
///
/// Pixel-pipeline and remote failures both funnel into this type so a
/// caller sees a single user-presentable error per workflow invocation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A payload could not be decoded or re-encoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The remote generation call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A request is already outstanding on this workflow slot
    #[error("a generation request is already in progress")]
    Busy,

    /// A workflow that needs prompt text was started without any
    #[error("prompt is empty")]
    EmptyPrompt,

    /// The response contained text but no image where an image was required
    #[error("the service did not return an image")]
    NoImageProduced {
        /// First text segment of the response, if any
        detail: Option<String>,
    },
}
