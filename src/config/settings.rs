//! Settings structures for RSearch configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub providers: ProvidersSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with process environment variables
    pub fn merge_env(&mut self) {
        self.merge_vars(std::env::vars());
    }

    /// Merge with an explicit set of variables
    ///
    /// Recognised keys: `SEARCH_PROVIDER`, `SERPER_API_KEY`, `HOST`, `PORT`,
    /// `CORS_ORIGINS` and `RSEARCH_DEBUG`. Everything else is ignored.
    pub fn merge_vars<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                "SEARCH_PROVIDER" => self.search.provider = ProviderKind::parse(&value),
                "SERPER_API_KEY" => {
                    let key = value.trim();
                    self.providers.serper.api_key =
                        (!key.is_empty()).then(|| key.to_string());
                }
                "HOST" => self.server.bind_address = value,
                "PORT" => match value.parse() {
                    Ok(port) => self.server.port = port,
                    Err(_) => warn!("Ignoring invalid PORT value: {}", value),
                },
                "CORS_ORIGINS" => {
                    self.server.cors_origins = value
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                "RSEARCH_DEBUG" => self.general.debug = value.parse().unwrap_or(false),
                _ => {}
            }
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "RSearch".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5173,
            bind_address: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Which upstream backend answers searches for this deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Serper (Google results): web + images
    #[default]
    Serper,
    /// DuckDuckGo Instant Answer API: web only
    #[serde(alias = "ddg")]
    DuckDuckGo,
}

impl ProviderKind {
    /// Parse a provider name; unknown names select the fallback provider
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "serper" => Self::Serper,
            "duckduckgo" | "ddg" => Self::DuckDuckGo,
            other => {
                warn!("Unknown provider '{}', using duckduckgo", other);
                Self::DuckDuckGo
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serper => "serper",
            Self::DuckDuckGo => "duckduckgo",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paging bounds for one result vertical
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLimits {
    /// Page size used when the caller does not ask for one
    pub default_page_size: u32,
    /// Largest page size sent upstream
    pub max_page_size: u32,
    /// Highest page number sent upstream (none = unbounded)
    pub max_page: Option<u32>,
}

impl PageLimits {
    pub fn web() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 20,
            max_page: None,
        }
    }

    pub fn images() -> Self {
        Self {
            default_page_size: 24,
            max_page_size: 50,
            max_page: None,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::web()
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Provider bound at startup
    pub provider: ProviderKind,
    /// Default interface language
    pub default_language: String,
    /// Default region
    pub default_region: String,
    /// Web result paging
    pub web: PageLimits,
    /// Image result paging
    pub images: PageLimits,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            default_language: "hi".to_string(),
            default_region: "in".to_string(),
            web: PageLimits::web(),
            images: PageLimits::images(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds (none = HTTP client default)
    pub request_timeout: Option<f64>,
    /// Proxy settings
    pub proxies: ProxySettings,
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Per-provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersSettings {
    pub serper: SerperSettings,
    pub duckduckgo: DuckDuckGoSettings,
}

/// Serper API settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerperSettings {
    /// API key (usually supplied via SERPER_API_KEY)
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
}

impl Default for SerperSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://google.serper.dev".to_string(),
        }
    }
}

impl fmt::Debug for SerperSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// DuckDuckGo Instant Answer API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuckDuckGoSettings {
    /// API base URL
    pub base_url: String,
}

impl Default for DuckDuckGoSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.duckduckgo.com/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5173);
        assert_eq!(settings.search.provider, ProviderKind::Serper);
        assert_eq!(settings.search.web.max_page_size, 20);
        assert_eq!(settings.search.images.max_page_size, 50);
        assert_eq!(settings.search.images.default_page_size, 24);
        assert!(settings.providers.serper.api_key.is_none());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(ProviderKind::parse("Serper"), ProviderKind::Serper);
        assert_eq!(ProviderKind::parse("ddg"), ProviderKind::DuckDuckGo);
        assert_eq!(ProviderKind::parse("duckduckgo"), ProviderKind::DuckDuckGo);
        assert_eq!(ProviderKind::parse("bing"), ProviderKind::DuckDuckGo);
    }

    #[test]
    fn test_merge_vars() {
        let mut settings = Settings::default();
        settings.merge_vars([
            ("SEARCH_PROVIDER", "ddg"),
            ("SERPER_API_KEY", " secret "),
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://a.example, ,https://b.example"),
            ("UNRELATED", "x"),
        ]);

        assert_eq!(settings.search.provider, ProviderKind::DuckDuckGo);
        assert_eq!(settings.providers.serper.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.server.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_merge_vars_ignores_bad_port_and_blank_key() {
        let mut settings = Settings::default();
        settings.merge_vars([("PORT", "not-a-port"), ("SERPER_API_KEY", "  ")]);
        assert_eq!(settings.server.port, 5173);
        assert!(settings.providers.serper.api_key.is_none());
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
search:
  provider: ddg
  web:
    max_page_size: 15
server:
  port: 9000
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.provider, ProviderKind::DuckDuckGo);
        assert_eq!(settings.search.web.max_page_size, 15);
        assert_eq!(settings.search.web.default_page_size, 10);
        assert_eq!(settings.search.images.max_page_size, 50);
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let serper = SerperSettings {
            api_key: Some("top-secret".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", serper);
        assert!(!printed.contains("top-secret"));
        assert!(printed.contains("REDACTED"));
    }
}
