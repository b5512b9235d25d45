//! Render a core [`Envelope`] as an HTTP response with its status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use selah::Envelope;

pub(crate) fn envelope_response(envelope: &Envelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::to_value(envelope).unwrap_or_else(|_| {
        serde_json::json!({ "success": false, "error": "serialization error" })
    });
    (status, Json(body)).into_response()
}
