pub mod gemini;
pub mod segment;

use crate::{
    error::{RemoteError, TranslationError},
    payload::ImagePayload,
    prompt::AspectRatio,
    remote::segment::GeneratedSegment,
};

/// Which modalities an interleaved generation call may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Interleaved image and text parts.
    #[default]
    ImagesAndText,
    /// Image parts only, e.g. a silent visual story.
    ImagesOnly,
}

/// The remote generation service, reduced to the request/response contract
/// this system depends on. Implementations are synchronous; callers issue
/// one outstanding request at a time.
pub trait GenerateService {
    /// Sends the original image, optional reference images, and a prompt to
    /// the image-editing model and returns the normalized result segments.
    ///
    /// Part order on the wire is `[original, references.., prompt]`.
    fn edit_image(
        &self,
        original: &ImagePayload,
        prompt: &str,
        references: &[ImagePayload],
    ) -> Result<Vec<GeneratedSegment>, RemoteError>;

    /// Generates a brand-new image from a text prompt.
    fn generate_image(
        &self,
        prompt: &str,
        aspect: AspectRatio,
    ) -> Result<ImagePayload, RemoteError>;

    /// Generates an ordered, interleaved sequence of text and image segments
    /// from a text prompt alone. Backs multi-part outputs such as visual
    /// stories and illustrated recipes.
    fn generate_interleaved(
        &self,
        prompt: &str,
        mode: ResponseMode,
    ) -> Result<Vec<GeneratedSegment>, RemoteError>;

    /// Text-only analysis call: zero or more images plus a prompt, answered
    /// with plain text. Used for translation and prompt suggestions.
    fn analyze(
        &self,
        images: &[ImagePayload],
        prompt: &str,
        temperature: f32,
    ) -> Result<String, RemoteError>;
}

/// Translates arbitrary text to English via the service's text model.
///
/// # Errors
///
/// `TranslationError` when the underlying call fails. Callers that cannot
/// afford to fail should use [`translate_or_original`].
pub fn translate_to_english<S: GenerateService + ?Sized>(
    service: &S,
    text: &str,
) -> Result<String, TranslationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let prompt = format!(
        "Translate the following text to English. Respond with only the translated text, \
         without any introductory phrases or explanations:\n\n\"{trimmed}\""
    );
    let translated = service.analyze(&[], &prompt, 0.1)?;
    Ok(translated.trim().to_string())
}

/// Infallible translation: falls back to the original text when the service
/// call fails. Translation is never worth aborting a workflow over.
pub fn translate_or_original<S: GenerateService + ?Sized>(service: &S, text: &str) -> String {
    match translate_to_english(service, text) {
        Ok(translated) if !translated.is_empty() => translated,
        Ok(_) => String::new(),
        Err(error) => {
            tracing::warn!(%error, "translation failed, keeping original text");
            text.trim().to_string()
        }
    }
}
