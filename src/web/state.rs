//! Application state shared across handlers

use crate::config::Settings;
use crate::search::Aggregator;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor
    pub aggregator: Arc<Aggregator>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, aggregator: Aggregator) -> anyhow::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            aggregator: Arc::new(aggregator),
            templates: Arc::new(super::Templates::new()?),
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
