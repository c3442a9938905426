use std::env;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use itertools::Itertools;
use reqwest::blocking::Client as HttpClient;
use serde_json::{json, Value};

use crate::{
    error::RemoteError,
    payload::ImagePayload,
    prompt::AspectRatio,
    remote::{
        segment::{normalize_segments, GeneratedSegment, RawSegment},
        GenerateService, ResponseMode,
    },
};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const EDIT_MODEL: &str = "gemini-2.5-flash-image-preview";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Blocking client for the Gemini generateContent / Imagen predict REST
/// surface.
///
/// Editing and analysis go through `generateContent` with interleaved
/// inline-data and text parts; from-scratch generation goes through the
/// Imagen `predict` endpoint. The client holds no per-request state and is
/// cheap to share.
pub struct GeminiClient {
    http: HttpClient,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    /// Builds a client from `GEMINI_API_KEY` / `GOOGLE_API_KEY`, honoring a
    /// `GEMINI_API_BASE` override.
    ///
    /// # Errors
    ///
    /// `RemoteError::MissingApiKey` when neither variable is set.
    pub fn from_env() -> Result<Self, RemoteError> {
        let api_key = non_empty_env("GEMINI_API_KEY")
            .or_else(|| non_empty_env("GOOGLE_API_KEY"))
            .ok_or(RemoteError::MissingApiKey)?;
        let api_base = non_empty_env("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self::with_base(api_key, api_base))
    }

    /// Builds a client with an explicit key against the public API base.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base(api_key, DEFAULT_API_BASE.to_string())
    }

    fn with_base(api_key: impl Into<String>, api_base: String) -> Self {
        Self {
            http: HttpClient::new(),
            api_base,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, model: &str, verb: &str) -> String {
        format!("{}/models/{model}:{verb}", self.api_base)
    }

    fn post(&self, endpoint: &str, payload: &Value) -> Result<Value, RemoteError> {
        tracing::debug!(endpoint, "posting to generation service");
        let response = self
            .http
            .post(endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(RemoteError::Status {
                code: status.as_u16(),
                message,
            });
        }
        Ok(response.json()?)
    }

    fn inline_part(payload: &ImagePayload) -> Value {
        json!({
            "inlineData": {
                "mimeType": payload.mime_type(),
                "data": BASE64.encode(payload.bytes()),
            }
        })
    }

    /// Flattens the first candidate's parts into raw segments. Accepts both
    /// camelCase and snake_case field spellings, which vary across backends.
    fn candidate_segments(response: &Value) -> Vec<RawSegment> {
        let parts = response
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut raw = Vec::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                raw.push(RawSegment::Text(text.to_string()));
                continue;
            }
            let Some(inline) = part
                .get("inlineData")
                .or_else(|| part.get("inline_data"))
                .and_then(Value::as_object)
            else {
                continue;
            };
            let data = inline.get("data").and_then(Value::as_str).unwrap_or_default();
            let Ok(bytes) = BASE64.decode(data.as_bytes()) else {
                tracing::debug!("dropping inline image with undecodable base64 data");
                continue;
            };
            let mime_type = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(Value::as_str)
                .map(str::to_string);
            raw.push(RawSegment::InlineImage { mime_type, bytes });
        }
        raw
    }

    /// Joins the text parts of a raw response with newlines, skipping image
    /// parts. Multi-part text answers are sentence fragments; gluing them
    /// without a separator would run sentences together.
    fn joined_text(segments: Vec<RawSegment>) -> String {
        segments
            .into_iter()
            .filter_map(|segment| match segment {
                RawSegment::Text(text) => Some(text),
                RawSegment::InlineImage { .. } => None,
            })
            .join("\n")
    }
}

impl GenerateService for GeminiClient {
    fn edit_image(
        &self,
        original: &ImagePayload,
        prompt: &str,
        references: &[ImagePayload],
    ) -> Result<Vec<GeneratedSegment>, RemoteError> {
        // Wire order: base image, then reference images, then the prompt.
        let mut parts = vec![Self::inline_part(original)];
        parts.extend(references.iter().map(Self::inline_part));
        parts.push(json!({ "text": prompt }));

        let payload = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseModalities": ["IMAGE", "TEXT"],
            },
        });

        let response = self.post(&self.endpoint(EDIT_MODEL, "generateContent"), &payload)?;
        Ok(normalize_segments(Self::candidate_segments(&response)))
    }

    fn generate_image(
        &self,
        prompt: &str,
        aspect: AspectRatio,
    ) -> Result<ImagePayload, RemoteError> {
        let payload = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": aspect.ratio().unwrap_or("1:1"),
                "outputMimeType": "image/png",
            },
        });

        let response = self.post(&self.endpoint(IMAGE_MODEL, "predict"), &payload)?;
        let encoded = response
            .pointer("/predictions/0/bytesBase64Encoded")
            .and_then(Value::as_str)
            .ok_or(RemoteError::NoImageReturned)?;
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| RemoteError::MalformedResponse("image base64 decode failed".to_string()))?;
        Ok(ImagePayload::png(bytes))
    }

    fn generate_interleaved(
        &self,
        prompt: &str,
        mode: ResponseMode,
    ) -> Result<Vec<GeneratedSegment>, RemoteError> {
        let modalities = match mode {
            ResponseMode::ImagesAndText => json!(["IMAGE", "TEXT"]),
            ResponseMode::ImagesOnly => json!(["IMAGE"]),
        };
        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseModalities": modalities,
            },
        });

        let response = self.post(&self.endpoint(EDIT_MODEL, "generateContent"), &payload)?;
        Ok(normalize_segments(Self::candidate_segments(&response)))
    }

    fn analyze(
        &self,
        images: &[ImagePayload],
        prompt: &str,
        temperature: f32,
    ) -> Result<String, RemoteError> {
        let mut parts: Vec<Value> = images.iter().map(Self::inline_part).collect();
        parts.push(json!({ "text": prompt }));

        let payload = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": { "temperature": temperature },
        });

        let response = self.post(&self.endpoint(TEXT_MODEL, "generateContent"), &payload)?;
        let text = Self::joined_text(Self::candidate_segments(&response));

        if text.trim().is_empty() {
            return Err(RemoteError::MalformedResponse(
                "no text in analysis response".to_string(),
            ));
        }
        Ok(text.trim().to_string())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
