//! Gemini HTTP backend implementation
//!
//! Invokes the Gemini `generateContent` API with two inline images and a
//! text instruction, requesting image-only output, and maps the response
//! candidates into provider-neutral [`ResponsePart`]s.

use crate::http_client::HttpClient;
use crate::types::{ImageGenProvider, ProviderRequest, ProviderResponse, ResponsePart};
use async_trait::async_trait;
use fitcheck_utils::{ImagePayload, MediaType, ProviderError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Header carrying the Gemini API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend configuration
pub struct GeminiBackend {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: String,
    default_model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `base_url` - Optional custom base URL (defaults to the public API)
    /// * `default_model` - Model used when the request carries no override
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if the HTTP client cannot
    /// be constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        default_model: String,
    ) -> Result<Self, ProviderError> {
        let client = HttpClient::new()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url
                .unwrap_or_else(|| fitcheck_config::Config::DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            default_model,
        })
    }

    /// Create a new Gemini backend from configuration
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if:
    /// - The API key environment variable is not set
    /// - The HTTP client cannot be constructed
    pub fn new_from_config(config: &fitcheck_config::Config) -> Result<Self, ProviderError> {
        let api_key_env = config.api_key_env();

        let api_key = std::env::var(api_key_env).map_err(|_| {
            ProviderError::Misconfiguration(format!(
                "Gemini API key not found in environment variable '{api_key_env}'. \
                 Please set this variable or configure a different api_key_env in [provider]."
            ))
        })?;

        Self::new(
            api_key,
            Some(config.base_url().to_string()),
            config.model().to_string(),
        )
    }

    fn resolve_model(&self, request: &ProviderRequest) -> String {
        match &request.model {
            Some(model) if !model.is_empty() => model.clone(),
            _ => self.default_model.clone(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Build the `generateContent` body: person image, garment image, then
    /// the instruction, in that order, with image-only response modality.
    fn build_request_body(request: &ProviderRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::inline(&request.person),
                    RequestPart::inline(&request.garment),
                    RequestPart::text(&request.prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }

    /// Map a decoded response into provider-neutral parts, preserving
    /// provider order. Inline data is base64; a payload that fails to
    /// decode is a malformed response, not a declined generation.
    fn parts_from_response(
        response: GenerateContentResponse,
    ) -> Result<Vec<ResponsePart>, ProviderError> {
        let candidate_parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        let mut parts = Vec::with_capacity(candidate_parts.len());
        for part in candidate_parts {
            if let Some(inline) = part.inline_data {
                let media_type = MediaType::from_mime(inline.mime_type.as_deref().unwrap_or(""));
                let payload =
                    ImagePayload::from_base64(&inline.data, media_type).map_err(|e| {
                        ProviderError::Transport(format!(
                            "Gemini returned invalid base64 image data: {e}"
                        ))
                    })?;
                parts.push(ResponsePart::Image(payload));
            } else if let Some(text) = part.text {
                parts.push(ResponsePart::Text(text));
            }
        }

        Ok(parts)
    }
}

#[async_trait]
impl ImageGenProvider for GeminiBackend {
    async fn generate(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = self.resolve_model(&request);

        debug!(
            provider = "gemini",
            model = %model,
            person_bytes = request.person.len(),
            garment_bytes = request.garment.len(),
            timeout_secs = request.timeout.as_secs(),
            "Invoking Gemini image generation"
        );

        let body = Self::build_request_body(&request);

        let http_request = self
            .client
            .post(&self.endpoint(&model))
            .header(API_KEY_HEADER, &self.api_key)
            .header("content-type", "application/json")
            .json(&body);

        let response = self
            .client
            .execute(http_request, request.timeout, "gemini")
            .await?;

        let response_body: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::Transport(format!("Failed to parse Gemini response: {e}"))
        })?;

        let parts = Self::parts_from_response(response_body)?;

        debug!(
            provider = "gemini",
            parts = parts.len(),
            "Gemini invocation completed"
        );

        Ok(ProviderResponse::new(parts))
    }
}

/// Gemini `generateContent` request body
#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestPart {
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<RequestInlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl RequestPart {
    fn inline(payload: &ImagePayload) -> Self {
        Self {
            inline_data: Some(RequestInlineData {
                mime_type: payload.media_type.as_str().to_string(),
                data: payload.to_base64(),
            }),
            text: None,
        }
    }

    fn text(text: &str) -> Self {
        Self {
            inline_data: None,
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct RequestInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
}

/// Gemini `generateContent` response body
#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    #[serde(rename = "inlineData")]
    inline_data: Option<ResponseInlineData>,
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseInlineData {
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use std::time::Duration;

    fn jpeg(bytes: &[u8]) -> ImagePayload {
        ImagePayload::new(bytes.to_vec(), MediaType::Jpeg)
    }

    fn request() -> ProviderRequest {
        ProviderRequest::new(
            jpeg(&[1, 2, 3]),
            jpeg(&[4, 5, 6]),
            "fit the garment",
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_endpoint_composition() {
        let backend = GeminiBackend::new(
            "test-key".to_string(),
            Some("https://example.test/v1beta/".to_string()),
            "image-model".to_string(),
        )
        .unwrap();

        assert_eq!(
            backend.endpoint("image-model"),
            "https://example.test/v1beta/models/image-model:generateContent"
        );
    }

    #[test]
    fn test_resolve_model_uses_default() {
        let backend =
            GeminiBackend::new("test-key".to_string(), None, "default-model".to_string()).unwrap();

        assert_eq!(backend.resolve_model(&request()), "default-model");
        assert_eq!(
            backend.resolve_model(&request().with_model("custom-model")),
            "custom-model"
        );
    }

    #[test]
    fn test_request_body_part_order_and_modality() {
        let body = GeminiBackend::build_request_body(&request());
        let value = serde_json::to_value(&body).unwrap();

        let parts = value["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        // Person first, garment second, instruction last
        assert_eq!(
            parts[0]["inlineData"]["data"],
            BASE64.encode([1u8, 2, 3])
        );
        assert_eq!(
            parts[1]["inlineData"]["data"],
            BASE64.encode([4u8, 5, 6])
        );
        assert_eq!(parts[2]["text"], "fit the garment");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");

        assert_eq!(
            value["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE"])
        );
    }

    #[test]
    fn test_parts_from_response_decodes_inline_images() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "here is your image" },
                        { "inlineData": { "mimeType": "image/png", "data": BASE64.encode([9u8, 9, 9]) } }
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(json).unwrap();

        let parts = GeminiBackend::parts_from_response(response).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], ResponsePart::Text("here is your image".to_string()));
        match &parts[1] {
            ResponsePart::Image(payload) => {
                assert_eq!(payload.data, vec![9, 9, 9]);
                assert_eq!(payload.media_type, MediaType::Png);
            }
            other => panic!("Expected image part, got {other:?}"),
        }
    }

    #[test]
    fn test_parts_from_response_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let parts = GeminiBackend::parts_from_response(response).unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn test_parts_from_response_rejects_invalid_base64() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [ { "inlineData": { "mimeType": "image/jpeg", "data": "!!!" } } ] }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(json).unwrap();

        match GeminiBackend::parts_from_response(response) {
            Err(ProviderError::Transport(msg)) => assert!(msg.contains("base64")),
            other => panic!("Expected Transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_parts_from_response_missing_mime_defaults_to_jpeg() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [ { "inlineData": { "data": BASE64.encode([7u8]) } } ] }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(json).unwrap();

        let parts = GeminiBackend::parts_from_response(response).unwrap();
        match &parts[0] {
            ResponsePart::Image(payload) => assert_eq!(payload.media_type, MediaType::Jpeg),
            other => panic!("Expected image part, got {other:?}"),
        }
    }

    #[test]
    fn test_new_from_config_missing_api_key() {
        // Unique env var name so this test cannot collide with others
        let test_env_var = "GEMINI_API_KEY_TEST_MISSING";
        unsafe {
            std::env::remove_var(test_env_var);
        }

        let mut config = fitcheck_config::Config::minimal_for_testing();
        config.provider.api_key_env = Some(test_env_var.to_string());

        match GeminiBackend::new_from_config(&config) {
            Err(ProviderError::Misconfiguration(msg)) => {
                assert!(msg.contains(test_env_var));
                assert!(msg.contains("not found"));
            }
            _ => panic!("Expected Misconfiguration error for missing API key"),
        }
    }
}
