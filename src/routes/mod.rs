pub mod health_routes;
pub mod ussd_routes;

use crate::config::AppConfig;
use crate::state::SharedState;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn app(state: SharedState) -> Router {
    let callback = callback_path(&state.config);

    let ussd = Router::new()
        .route(&callback, post(ussd_routes::screening))
        .route(&format!("{callback}/readyq"), get(health_routes::readiness))
        .route(&format!("{callback}/liveq"), get(health_routes::liveness));

    Router::new()
        .route("/health", get(health_routes::health))
        .merge(ussd)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configured callback path with a single leading slash and no trailing one.
fn callback_path(config: &AppConfig) -> String {
    let trimmed = config.callback_path.trim().trim_matches('/');
    format!("/{trimmed}")
}

/// Plain-text response, the only body type the gateway reads.
pub(crate) fn plain(status: StatusCode, body: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body.into(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_path(path: &str) -> AppConfig {
        AppConfig {
            callback_path: path.into(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn callback_path_is_normalized() {
        assert_eq!(
            callback_path(&with_path("/callbacks/ussd/screening")),
            "/callbacks/ussd/screening"
        );
        assert_eq!(callback_path(&with_path("ussd/")), "/ussd");
        assert_eq!(callback_path(&with_path(" /ussd ")), "/ussd");
    }
}
