//! Provider loader: binds the deployment's single provider at startup

use super::traits::{Provider, ProviderLimits};
use super::{duckduckgo, serper};
use crate::config::{ProviderKind, Settings};
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for the configured provider
pub struct ProviderLoader;

impl ProviderLoader {
    /// Create the provider selected in settings
    pub fn load(settings: &Settings) -> Arc<dyn Provider> {
        let limits = ProviderLimits {
            web: settings.search.web.clone(),
            images: settings.search.images.clone(),
        };

        let provider: Arc<dyn Provider> = match settings.search.provider {
            ProviderKind::Serper => {
                let serper = serper::Serper::new(&settings.providers.serper).with_limits(limits);
                if !serper.has_credentials() {
                    warn!("SERPER_API_KEY is not set; searches will fail until it is configured");
                }
                Arc::new(serper)
            }
            ProviderKind::DuckDuckGo => Arc::new(
                duckduckgo::DuckDuckGo::new(&settings.providers.duckduckgo).with_limits(limits),
            ),
        };

        info!(
            "Loaded provider: {} (images: {})",
            provider.name(),
            if provider.images().is_some() { "yes" } else { "no" }
        );
        provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ResultKind;

    #[test]
    fn test_load_serper_by_default() {
        let provider = ProviderLoader::load(&Settings::default());
        assert_eq!(provider.name(), "serper");
        assert!(provider.supports(ResultKind::Image));
    }

    #[test]
    fn test_load_duckduckgo() {
        let mut settings = Settings::default();
        settings.search.provider = ProviderKind::DuckDuckGo;
        settings.search.web.max_page_size = 15;

        let provider = ProviderLoader::load(&settings);
        assert_eq!(provider.name(), "duckduckgo");
        assert!(!provider.supports(ResultKind::Image));
        assert_eq!(provider.limits().web.max_page_size, 15);
    }
}
