use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use gemini_assistant::{
    credentials::{self, EnvSecretStore},
    gemini::GeminiProvider,
    router, AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("invalid configuration")?;
    let addr = config.bind_addr();

    let stored_key = credentials::load_stored_key(&EnvSecretStore);
    let provider = GeminiProvider::new(config.api_base.clone(), config.model.clone());

    let state = Arc::new(AppState {
        provider: Arc::new(provider),
        stored_key,
    });

    let app = router(state, config.max_upload_bytes());

    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let local = listener.local_addr()?;

    tracing::info!(model = %config.model, "🚀 Gemini AI Assistant running on http://{}", local);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
