use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartError, rejection::JsonRejection, DefaultBodyLimit, Multipart, State,
    },
    http::HeaderMap,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::credentials::{self, ApiKey, Credential, API_KEY_HEADER};
use crate::error::AppError;
use crate::gemini::ModelProvider;
use crate::handlers;
use crate::markdown;
use crate::page;
use crate::upload::UploadedImage;

pub const EMPTY_PROMPT: &str = "Please enter a prompt first.";
pub const EMPTY_ANALYSIS_PROMPT: &str = "Please enter an analysis prompt first.";
pub const MISSING_IMAGE: &str = "Please upload an image first.";

pub struct AppState {
    pub provider: Arc<dyn ModelProvider>,
    /// Key found in the secret store at startup, if any.
    pub stored_key: Option<ApiKey>,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub key_required: bool,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub response: String,
    pub html: String,
}

impl GenerationResponse {
    fn new(response: String) -> Self {
        let html = markdown::render(&response);
        Self { response, html }
    }
}

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/session", get(session))
        .route("/api/generate", post(generate))
        .route("/api/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn session(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    Json(SessionInfo {
        key_required: state.stored_key.is_none(),
        model: state.provider.model_name().to_string(),
    })
}

/// Resolves the key for this request, or halts before any handler runs.
fn credential(state: &AppState, headers: &HeaderMap) -> Result<ApiKey, AppError> {
    let entered = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    match credentials::resolve(state.stored_key.as_ref(), entered) {
        Credential::Stored(key) | Credential::Entered(key) => Ok(key),
        Credential::Halted => Err(AppError::KeyRequired),
    }
}

async fn generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    req: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let key = credential(&state, &headers)?;
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if req.prompt.is_empty() {
        return Err(AppError::MissingInput(EMPTY_PROMPT));
    }

    let text = handlers::text_request(state.provider.as_ref(), &key, &req.prompt).await?;
    Ok(Json(GenerationResponse::new(text)))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<GenerationResponse>, AppError> {
    let key = credential(&state, &headers)?;

    let mut image_bytes = None;
    let mut prompt = String::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("image") => {
                let data = field.bytes().await.map_err(multipart_error)?;
                image_bytes = Some(data.to_vec());
            }
            Some("prompt") => {
                prompt = field.text().await.map_err(multipart_error)?;
            }
            _ => {}
        }
    }

    // An empty file part is what a form sends when nothing was picked.
    let bytes = image_bytes
        .filter(|b| !b.is_empty())
        .ok_or(AppError::MissingInput(MISSING_IMAGE))?;
    let image = UploadedImage::decode(bytes)?;

    if prompt.is_empty() {
        return Err(AppError::MissingInput(EMPTY_ANALYSIS_PROMPT));
    }

    let text = handlers::image_request(state.provider.as_ref(), &key, &image, &prompt).await?;
    Ok(Json(GenerationResponse::new(text)))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::BadRequest(e.body_text())
}
