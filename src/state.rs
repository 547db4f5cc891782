use crate::config::AppConfig;
use crate::dialog::DialogEngine;
use std::sync::Arc;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: AppConfig,
    pub engine: DialogEngine,
}

impl AppState {
    pub fn new(config: AppConfig, engine: DialogEngine) -> SharedState {
        Arc::new(Self { config, engine })
    }
}
