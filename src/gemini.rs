//! Minimal client for Gemini's `generateContent` endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::ApiKey;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Api { status: u16, message: String },
    #[error("could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("the provider returned no candidates{}", reason_suffix(.0))]
    NoCandidates(Option<String>),
    #[error("the response contained no text{}", reason_suffix(.0))]
    NoText(Option<String>),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" (reason: {})", r))
        .unwrap_or_default()
}

/// One element of a request, in the order it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image { mime_type: String, data: Vec<u8> },
}

/// A client bound to one model and one key.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String, ProviderError>;
}

/// Builds model clients for a resolved key.
pub trait ModelProvider: Send + Sync {
    fn model_name(&self) -> &str;
    fn model(&self, key: &ApiKey) -> Box<dyn GenerativeModel>;
}

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    http: reqwest::Client,
    api_base: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

impl ModelProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn model(&self, key: &ApiKey) -> Box<dyn GenerativeModel> {
        Box::new(GeminiModel {
            http: self.http.clone(),
            url: format!("{}/models/{}:generateContent", self.api_base, self.model),
            key: key.clone(),
        })
    }
}

pub struct GeminiModel {
    http: reqwest::Client,
    url: String,
    key: ApiKey,
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String, ProviderError> {
        let payload = GenerateContentRequest::from_parts(&parts);

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", self.key.expose())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.into_text()
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentRequest {
    pub fn from_parts(parts: &[Part]) -> Self {
        let parts = parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => RequestPart::Text { text: text.clone() },
                Part::Image { mime_type, data } => RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.clone(),
                        data: general_purpose::STANDARD.encode(data),
                    },
                },
            })
            .collect();

        Self {
            contents: vec![RequestContent { parts }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    pub fn into_text(self) -> Result<String, ProviderError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self.prompt_feedback.and_then(|f| f.block_reason);
            return Err(ProviderError::NoCandidates(reason));
        };

        let texts: Vec<String> = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if texts.is_empty() {
            return Err(ProviderError::NoText(candidate.finish_reason));
        }
        Ok(texts.concat())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// The `error.message` field of a Gemini error body, or the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    /// Stands in for the Gemini API: answers with `reply` and records what it got.
    async fn fake_gemini(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();

        let app = Router::new()
            .route(
                "/v1beta/models/:call",
                post(
                    move |State(captured): State<Captured>,
                          Path(call): Path<String>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let key = headers
                                .get("x-goog-api-key")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            captured.requests.lock().unwrap().push((call, key, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1beta", addr), captured)
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[test]
    fn request_keeps_part_order() {
        let request = GenerateContentRequest::from_parts(&[
            Part::Text("describe".into()),
            Part::Image {
                mime_type: "image/png".into(),
                data: vec![1, 2, 3],
            },
        ]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "describe" },
                        { "inline_data": { "mime_type": "image/png", "data": "AQID" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Hello, world");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        let err = response.into_text().unwrap_err();
        assert!(matches!(&err, ProviderError::NoCandidates(Some(r)) if r == "SAFETY"));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn candidate_without_text_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "RECITATION" }]
        }))
        .unwrap();
        assert!(matches!(
            response.into_text(),
            Err(ProviderError::NoText(Some(r))) if r == "RECITATION"
        ));
    }

    #[test]
    fn error_message_prefers_provider_field() {
        let body = json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        })
        .to_string();
        assert_eq!(api_error_message(&body), "API key not valid.");
        assert_eq!(api_error_message("  upstream down \n"), "upstream down");
    }

    #[tokio::test]
    async fn sends_key_model_and_prompt() {
        let (base, captured) = fake_gemini(
            StatusCode::OK,
            json!({ "candidates": [{ "content": { "parts": [{ "text": "**hi**" }] } }] }),
        )
        .await;

        let provider = GeminiProvider::new(base, "gemini-1.5-pro-latest");
        let text = provider
            .model(&key())
            .generate_content(vec![Part::Text("Say hi".into())])
            .await
            .unwrap();
        assert_eq!(text, "**hi**");

        let requests = captured.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (call, sent_key, body) = &requests[0];
        assert_eq!(call, "gemini-1.5-pro-latest:generateContent");
        assert_eq!(sent_key.as_deref(), Some("test-key"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Say hi");
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let (base, _) = fake_gemini(
            StatusCode::FORBIDDEN,
            json!({
                "error": {
                    "code": 403,
                    "message": "Permission denied",
                    "status": "PERMISSION_DENIED"
                }
            }),
        )
        .await;

        let err = GeminiProvider::new(base, "m")
            .model(&key())
            .generate_content(vec![Part::Text("x".into())])
            .await
            .unwrap_err();

        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = GeminiProvider::new(format!("http://{}", addr), "m")
            .model(&key())
            .generate_content(vec![Part::Text("x".into())])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Http(_)));
    }
}
