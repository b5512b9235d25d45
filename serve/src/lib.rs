//! HTTP server for Selah (axum).
//!
//! Listens on http://127.0.0.1:8080 by default, handles
//! `POST /api/meditation` and `GET /health`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`].

mod app;
mod response;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use selah::{MeditationModel, OpenAiModel};

use app::{router, AppState};

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Runs the server on an existing listener with an explicit model. Used by
/// tests (bind to 127.0.0.1:0 then pass the listener) and by [`run_serve`].
/// `model` is `None` when no credential is configured; requests then take
/// the fallback path.
pub async fn run_serve_on_listener(
    listener: TcpListener,
    model: Option<Arc<dyn MeditationModel>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("meditation server listening on http://{}", addr);

    let state = Arc::new(AppState { model });
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds and runs the server. Address: `addr`, else `SELAH_ADDR`, else
/// `127.0.0.1:8080`. The model is built from the environment; a missing
/// `OPENAI_API_KEY` keeps the server demoable on the fallback path.
pub async fn run_serve(
    addr: Option<&str>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = match addr {
        Some(a) => a.to_string(),
        None => std::env::var("SELAH_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
    };
    let listener = TcpListener::bind(&addr).await?;

    let model = OpenAiModel::from_env()
        .map(|model| Arc::new(model) as Arc<dyn MeditationModel>);
    if model.is_none() {
        warn!("OPENAI_API_KEY not configured; serving fallback meditations");
    }

    run_serve_on_listener(listener, model).await
}
