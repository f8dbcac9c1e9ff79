//! Search execution

use crate::engines::{EngineRequest, EngineResponse, Provider, ProviderError};
use crate::error::SearchError;
use crate::network::HttpClient;
use crate::query::{CanonicalQuery, ResultKind};
use crate::results::{ResultSet, SearchResponse};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Search executor bound to a single provider for the lifetime of the
/// deployment. Holds no per-request state.
#[derive(Clone)]
pub struct Aggregator {
    /// HTTP client for making requests
    client: HttpClient,
    /// The configured provider
    provider: Arc<dyn Provider>,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(client: HttpClient, provider: Arc<dyn Provider>) -> Self {
        Self { client, provider }
    }

    /// Name of the configured provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Answer one canonical query
    pub async fn handle(&self, query: CanonicalQuery) -> Result<SearchResponse, SearchError> {
        if query.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        let query = query.clamped(self.provider.limits().for_kind(query.result_kind));
        let provider = self.provider.name().to_string();

        debug!(
            "Dispatching {} search '{}' to {} (page {}, size {})",
            query.result_kind, query.text, provider, query.page_number, query.page_size
        );

        let start = Instant::now();

        let outcome = match query.result_kind {
            ResultKind::Web => self.search_web(&query).await,
            ResultKind::Image => self.search_images(&query).await,
        };

        let items = match outcome {
            Ok(items) => items,
            Err(e) => {
                warn!("{} search via {} failed: {}", query.result_kind, provider, e);
                return Err(e);
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Provider {} returned {} items in {}ms",
            provider,
            items.len(),
            elapsed_ms
        );

        Ok(SearchResponse {
            provider,
            query,
            elapsed_ms,
            items,
        })
    }

    async fn search_web(&self, query: &CanonicalQuery) -> Result<ResultSet, SearchError> {
        let request = self.provider.web_request(query)?;
        let response = self.send(request).await?;
        Ok(ResultSet::Web(self.provider.web_response(query, response)?))
    }

    async fn search_images(&self, query: &CanonicalQuery) -> Result<ResultSet, SearchError> {
        let images = self
            .provider
            .images()
            .ok_or_else(|| SearchError::CapabilityUnsupported {
                provider: self.provider.name().to_string(),
                kind: ResultKind::Image,
            })?;

        let request = images.image_request(query)?;
        let response = self.send(request).await?;
        Ok(ResultSet::Images(images.image_response(query, response)?))
    }

    async fn send(
        &self,
        request: EngineRequest,
    ) -> Result<EngineResponse, SearchError> {
        self.client
            .execute(request)
            .await
            .map_err(|e| ProviderError::Network(e.to_string()).into())
    }
}
