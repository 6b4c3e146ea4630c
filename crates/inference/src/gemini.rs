//! Gemini `generateContent` REST client

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sketchcast_config::InferenceConfig;
use tracing::debug;

use crate::{InferenceBackend, InferenceError, InferenceOutcome, InferenceRequest};

/// Remote backend talking to the Gemini API over HTTPS
pub struct GeminiBackend {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("url", &self.url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl GeminiBackend {
    /// Build a client for the configured model. No request timeout is set.
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| InferenceError::Connection(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    /// Use an existing HTTP client
    pub fn with_client(client: Client, config: &InferenceConfig) -> Self {
        Self {
            client,
            url: generate_content_url(&config.endpoint, &config.model),
            api_key: config.api_key.clone(),
        }
    }

    /// Full `generateContent` URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl InferenceBackend for GeminiBackend {
    async fn guess(&self, request: InferenceRequest) -> InferenceOutcome {
        let api_key = self.api_key.as_deref().ok_or(InferenceError::MissingApiKey)?;
        let body = GenerateContentRequest::image_and_prompt(&request.image_png, &request.prompt);

        debug!(
            "POST {} (request {}, {} byte image)",
            self.url,
            request.id,
            request.image_png.len()
        );

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(service_error(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;
        parsed.into_text()
    }
}

/// `{endpoint}/v1beta/models/{model}:generateContent`
pub(crate) fn generate_content_url(endpoint: &str, model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!(
        "{}/v1beta/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

fn transport_error(e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout
    } else {
        InferenceError::Connection(e.to_string())
    }
}

/// Map a non-2xx response to an error, preferring the service's own message
pub(crate) fn service_error(status: u16, body: &str) -> InferenceError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                trimmed.to_string()
            }
        });
    InferenceError::Service { status, message }
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// One user turn: the PNG first, then the prompt text
    pub(crate) fn image_and_prompt(png: &[u8], prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(Blob {
                            mime_type: InferenceRequest::MIME_TYPE.to_string(),
                            data: BASE64.encode(png),
                        }),
                    },
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    ///
    /// A blocked prompt is an error; a response with no text is `Ok(None)`.
    pub(crate) fn into_text(self) -> InferenceOutcome {
        if self.candidates.is_empty() {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(InferenceError::Blocked(reason));
            }
            return Ok(None);
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}
