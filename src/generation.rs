//! Client for the external image-generation model.
//!
//! The drawing core never calls the service itself: the app encodes the
//! surface as PNG, starts a [`GenerationJob`] and polls it every frame. The
//! result comes back as raw image bytes which may later be placed onto the
//! surface.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::channel::oneshot;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{GenerationError, PlacementError};
use crate::image::decode_image;

pub type GenerationResult = Result<GeneratedImage, GenerationError>;

/// Drawing plus prompt, ready to send
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    png: Vec<u8>,
    prompt: String,
}

impl GenerationRequest {
    /// Fails with [`GenerationError::EmptyPrompt`] on a blank prompt
    pub fn new(png: Vec<u8>, prompt: &str) -> Result<Self, GenerationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        Ok(Self {
            png,
            prompt: prompt.to_owned(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    fn body(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: "image/png".to_owned(),
                            data: STANDARD.encode(&self.png),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(self.prompt.clone()),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_owned(), "TEXT".to_owned()],
            },
        }
    }
}

/// Image returned by the model, still encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn decode(&self) -> Result<RgbaImage, PlacementError> {
        decode_image(&self.bytes)
    }

    /// File extension matching the MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    pub fn file_name(&self) -> String {
        format!("generated-image.{}", self.extension())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", alias = "inline_data")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pick the first inline image out of the first candidate
fn extract_image(response: GenerateContentResponse) -> GenerationResult {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    for part in parts {
        if let Some(text) = &part.text {
            log::debug!("Model text: {}", text);
        }
        if let Some(inline) = part.inline_data {
            let bytes = STANDARD
                .decode(inline.data.trim())
                .map_err(|err| GenerationError::Service(format!("invalid image data: {}", err)))?;
            return Ok(GeneratedImage {
                bytes,
                mime_type: inline.mime_type,
            });
        }
    }

    Err(GenerationError::NoImage)
}

/// Parse a successful response body
pub fn parse_response(body: &str) -> GenerationResult {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|err| GenerationError::Service(format!("malformed response: {}", err)))?;
    extract_image(response)
}

/// Turn a non-success status and body into an error message
fn service_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_owned());
    GenerationError::Service(format!("HTTP {}: {}", status, message))
}

/// Talks to the Gemini `generateContent` REST endpoint
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    url: String,
    #[cfg(not(target_arch = "wasm32"))]
    http: reqwest::blocking::Client,
    #[cfg(target_arch = "wasm32")]
    http: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key.clone().ok_or(GenerationError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", config.endpoint, config.model);

        #[cfg(not(target_arch = "wasm32"))]
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;
        #[cfg(target_arch = "wasm32")]
        let http = reqwest::Client::new();

        Ok(Self { api_key, url, http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        log::info!("Requesting generation for prompt: {}", request.prompt());
        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request.body())
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }
        parse_response(&body)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        log::info!("Requesting generation for prompt: {}", request.prompt());
        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request.body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }
        parse_response(&body)
    }
}

/// An outstanding generation request running off the UI thread
#[derive(Debug)]
pub struct GenerationJob {
    receiver: oneshot::Receiver<GenerationResult>,
}

impl GenerationJob {
    /// Start `request` in the background; `ctx` is repainted when it finishes
    pub fn spawn(client: GeminiClient, request: GenerationRequest, ctx: egui::Context) -> Self {
        let (sender, receiver) = oneshot::channel();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = client.generate(&request);
            if sender.send(result).is_err() {
                log::debug!("Generation finished after the job was dropped");
            }
            ctx.request_repaint();
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = client.generate(&request).await;
            if sender.send(result).is_err() {
                log::debug!("Generation finished after the job was dropped");
            }
            ctx.request_repaint();
        });

        Self { receiver }
    }

    /// A job whose result is already known
    #[cfg(test)]
    pub(crate) fn ready(result: GenerationResult) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(result);
        Self { receiver }
    }

    /// Returns the result once, when it is available
    pub fn poll(&mut self) -> Option<GenerationResult> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(GenerationError::Cancelled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_prompt_rejected() {
        assert!(matches!(
            GenerationRequest::new(vec![], "   "),
            Err(GenerationError::EmptyPrompt)
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest::new(vec![1, 2, 3], " a cat ").unwrap();
        let body = serde_json::to_value(request.body()).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } },
                        { "text": "a cat" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })
        );
    }

    #[test]
    fn test_parse_first_inline_image() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "AQID" } },
                        { "inlineData": { "mimeType": "image/png", "data": "BAUG" } }
                    ]
                }
            }]
        })
        .to_string();
        let image = parse_response(&body).unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.file_name(), "generated-image.jpg");
    }

    #[test]
    fn test_parse_without_image() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "no" }] } }] }).to_string();
        assert!(matches!(parse_response(&body), Err(GenerationError::NoImage)));
        assert!(matches!(parse_response("{}"), Err(GenerationError::NoImage)));
        assert!(matches!(parse_response("not json"), Err(GenerationError::Service(_))));
    }

    #[test]
    fn test_service_error_message() {
        let err = service_error(403, r#"{"error":{"code":403,"message":"API key not valid"}}"#);
        assert_eq!(err.to_string(), "Gemini API Error: HTTP 403: API key not valid");
    }

    #[test]
    fn test_missing_key() {
        let config = AppConfig::default();
        assert!(matches!(GeminiClient::new(&config), Err(GenerationError::MissingApiKey)));
    }

    #[test]
    fn test_ready_job_yields_once() {
        let mut job = GenerationJob::ready(Err(GenerationError::NoImage));
        assert!(matches!(job.poll(), Some(Err(GenerationError::NoImage))));
        assert!(matches!(job.poll(), Some(Err(GenerationError::Cancelled))));
    }
}
