//! County hotline lookup.

use crate::config::HotlineConfig;
use async_trait::async_trait;
use std::collections::HashMap;

/// Most numbers ever rendered for one county.
pub const MAX_HOTLINES: usize = 5;

#[async_trait]
pub trait HotlineDirectory: Send + Sync {
    /// Numbers to call for `county`, best first.
    async fn lookup(&self, county: &str) -> anyhow::Result<Vec<String>>;
}

/// Hotlines read from configuration, with a fallback list for counties
/// that have no entry.
#[derive(Debug, Clone)]
pub struct StaticHotlines {
    default: Vec<String>,
    counties: HashMap<String, Vec<String>>,
}

impl StaticHotlines {
    pub fn new(default: Vec<String>, counties: HashMap<String, Vec<String>>) -> Self {
        let counties = counties
            .into_iter()
            .map(|(name, numbers)| (normalize(&name), numbers))
            .collect();
        Self { default, counties }
    }

    pub fn from_config(config: &HotlineConfig) -> Self {
        Self::new(config.default.clone(), config.counties.clone())
    }
}

fn normalize(county: &str) -> String {
    county.trim().to_lowercase()
}

#[async_trait]
impl HotlineDirectory for StaticHotlines {
    async fn lookup(&self, county: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .counties
            .get(&normalize(county))
            .unwrap_or(&self.default)
            .clone())
    }
}
