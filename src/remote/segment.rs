use crate::payload::ImagePayload;

/// One part of a raw service response, before normalization. Inline images
/// arrive with an optional MIME type; text arrives as-is.
#[derive(Debug, Clone)]
pub enum RawSegment {
    /// A textual part.
    Text(String),
    /// An inline image part with its declared (possibly missing) MIME type.
    InlineImage {
        /// MIME type as declared by the service, if any.
        mime_type: Option<String>,
        /// Decoded image bytes.
        bytes: Vec<u8>,
    },
}

/// One unit of a generation result. Order within a result is significant:
/// display order equals generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedSegment {
    /// A text segment.
    Text(String),
    /// An image segment.
    Image(ImagePayload),
}

impl GeneratedSegment {
    /// The image payload, if this segment carries one.
    pub fn as_image(&self) -> Option<&ImagePayload> {
        match self {
            Self::Image(payload) => Some(payload),
            Self::Text(_) => None,
        }
    }

    /// The text, if this segment carries any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }
}

/// Fallback text synthesized when a response normalizes to nothing.
pub const NO_CONTENT_FALLBACK: &str = "No content generated.";

/// Normalizes a raw response into displayable segments.
///
/// Order is preserved. Image parts without a usable MIME type or without
/// bytes are malformed and dropped; empty text parts are dropped. A response
/// that normalizes to nothing yields one synthesized fallback text segment
/// so the caller always has something to show.
pub fn normalize_segments(raw: Vec<RawSegment>) -> Vec<GeneratedSegment> {
    let mut segments: Vec<GeneratedSegment> = raw
        .into_iter()
        .filter_map(|segment| match segment {
            RawSegment::Text(text) if !text.is_empty() => Some(GeneratedSegment::Text(text)),
            RawSegment::Text(_) => None,
            RawSegment::InlineImage { mime_type, bytes } => {
                let mime_type = mime_type.filter(|mime| !mime.trim().is_empty())?;
                if bytes.is_empty() {
                    return None;
                }
                Some(GeneratedSegment::Image(ImagePayload::new(bytes, mime_type)))
            }
        })
        .collect();

    if segments.is_empty() {
        segments.push(GeneratedSegment::Text(NO_CONTENT_FALLBACK.to_string()));
    }
    segments
}
