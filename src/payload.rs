use std::fmt;

/// An encoded image plus its declared MIME type.
///
/// This is the unit of exchange at every boundary: file uploads, remote
/// inline data, and the output of every compositing operation. Payloads are
/// immutable once constructed; operations always produce a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImagePayload {
    /// Wraps encoded bytes with their declared MIME type.
    ///
    /// No validation happens here; decoding is what enforces that the bytes
    /// actually are an image of the declared (or any) format.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Wraps PNG-encoded bytes.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }

    /// The encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The declared MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Whether the declared MIME type is one the mask pipeline accepts.
    pub fn is_maskable_format(&self) -> bool {
        self.mime_type.contains("png") || self.mime_type.contains("jpeg")
    }
}

// Payload bytes can be megabytes; keep Debug output to metadata.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
