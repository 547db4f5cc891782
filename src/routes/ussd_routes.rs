use axum::{body::Body, extract::State, http::StatusCode, response::Response};

use super::plain;
use crate::dialog::UssdRequest;
use crate::error::AppError;
use crate::state::SharedState;

/// Gateway callback: one step of the screening dialog.
///
/// The body is read and decoded by hand so an oversized or malformed payload
/// gets the `END` error contract instead of an extractor rejection. The
/// request deadline is enforced by the dialog engine, which cleans up the
/// session when it elapses.
pub async fn screening(
    State(state): State<SharedState>,
    body: Body,
) -> Result<Response, AppError> {
    let bytes = axum::body::to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(AppError::Body)?;
    let request: UssdRequest = serde_json::from_slice(&bytes).map_err(AppError::Decode)?;
    let reply = state.engine.respond(&request).await?;
    Ok(plain(StatusCode::OK, reply.to_string()))
}
