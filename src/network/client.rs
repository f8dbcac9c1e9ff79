//! HTTP client for making requests to search providers

use crate::config::OutgoingSettings;
use crate::engines::{EngineRequest, EngineResponse, HttpMethod};
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// User agent sent to providers
fn user_agent() -> String {
    format!("rsearch/{}", crate::VERSION)
}

/// HTTP client wrapper configured from outgoing settings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(user_agent())
            .gzip(true)
            .brotli(true);

        // No timeout unless configured; reqwest's defaults apply otherwise
        if let Some(secs) = settings.request_timeout {
            if !secs.is_finite() || secs <= 0.0 {
                anyhow::bail!("invalid outgoing.request_timeout: {}", secs);
            }
            builder = builder.timeout(Duration::from_secs_f64(secs));
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Execute a provider request. Exactly one round trip, no retries.
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder.header("Accept", "application/json");

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(ref json) = request.json {
            req_builder = req_builder.json(json);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(EngineResponse { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        for secs in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let settings = OutgoingSettings {
                request_timeout: Some(secs),
                ..Default::default()
            };
            assert!(HttpClient::with_settings(&settings).is_err());
        }

        let settings = OutgoingSettings {
            request_timeout: Some(2.5),
            ..Default::default()
        };
        assert!(HttpClient::with_settings(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_post_json_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("X-API-KEY", "k"))
            .and(body_json(serde_json::json!({ "q": "rust" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .expect(1)
            .mount(&server)
            .await;

        let request = EngineRequest::post(format!("{}/search", server.uri()))
            .header("X-API-KEY", "k")
            .json(serde_json::json!({ "q": "rust" }));
        let response = HttpClient::new().unwrap().execute(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_get_with_params_keeps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "rust lang"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let request = EngineRequest::get(server.uri()).param("q", "rust lang");
        let response = HttpClient::new().unwrap().execute(request).await.unwrap();

        assert_eq!(response.status, 503);
        assert!(!response.is_success());
        assert_eq!(response.text, "down");
    }
}
