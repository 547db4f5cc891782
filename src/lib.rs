#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use,
    clippy::similar_names,
    clippy::uninlined_format_args,
    clippy::unused_self
)]

pub mod config;
pub mod dialog;
pub mod error;
pub mod hotlines;
pub mod i18n;
pub mod routes;
pub mod state;
pub mod store;

use std::sync::Arc;

pub use config::AppConfig;
pub use dialog::{DialogEngine, Reply, UssdRequest};
pub use state::{AppState, SharedState};

/// Assemble the dialog engine over `store` with the built-in catalog and the
/// configured hotlines.
pub fn build_engine(config: &AppConfig, store: Arc<dyn store::SessionStore>) -> DialogEngine {
    DialogEngine::new(
        store,
        Arc::new(i18n::BuiltinCatalog::new()),
        Arc::new(hotlines::StaticHotlines::from_config(&config.hotlines)),
    )
    .with_session_ttl(config.store.session_ttl())
    .with_request_deadline(Some(config.request_timeout()))
}

/// Open the configured session store and build the shared handler state.
pub async fn build_state(config: AppConfig) -> anyhow::Result<SharedState> {
    let store = store::create_store(&config.store).await?;
    let engine = build_engine(&config, store);
    Ok(AppState::new(config, engine))
}
