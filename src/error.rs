use crate::dialog::{DialogError, Reply};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Failure of a callback request.
///
/// The gateway shows the body to the caller, so every variant renders as a
/// terminal `END` reply.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to decode request body")]
    Body(#[source] axum::Error),
    #[error("failed to decode request body")]
    Decode(#[source] serde_json::Error),
    #[error(transparent)]
    Dialog(#[from] DialogError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Body(e) => tracing::warn!("rejecting callback body: {e}"),
            AppError::Decode(e) => tracing::warn!("rejecting callback body: {e}"),
            AppError::Dialog(_) => {}
        }
        let body = Reply::End(self.to_string()).to_string();
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
