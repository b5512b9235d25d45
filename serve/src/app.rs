//! Axum app: state, router, and the meditation route handler.
//!
//! The meditation route takes the raw body as a `String` so that malformed
//! JSON stays a handler-owned 400 envelope instead of a framework
//! rejection with a different shape.

use std::sync::Arc;

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};

use selah::{handle_meditation, MeditationModel};

use super::response::envelope_response;

/// Shared state: the optional provider-backed model. `None` means no
/// credential was configured and every request gets the fallback payload.
/// Read-only after startup.
pub(crate) struct AppState {
    pub(crate) model: Option<Arc<dyn MeditationModel>>,
}

/// Builds the router: `POST /api/meditation`, `GET /health`.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/meditation", post(meditation))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Handles `POST /api/meditation`: runs the core handler and maps the
/// envelope onto the transport status.
async fn meditation(State(state): State<Arc<AppState>>, body: String) -> Response {
    let model = state.model.as_deref();
    let envelope = handle_meditation(model, &body).await;
    envelope_response(&envelope)
}
