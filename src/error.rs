//! Error kinds surfaced by the search aggregation layer

use crate::engines::ProviderError;
use crate::query::ResultKind;
use serde::{Deserialize, Serialize};

/// Terminal failure of one search request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("query `q` is required")]
    InvalidQuery,

    #[error("{kind} search is not supported by the {provider} provider")]
    CapabilityUnsupported { provider: String, kind: ResultKind },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },
}

impl SearchError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery => "invalid_query",
            Self::CapabilityUnsupported { .. } => "capability_unsupported",
            Self::Configuration(_) => "configuration_error",
            Self::Upstream { .. } => "upstream_failure",
        }
    }

    /// HTTP status the transport layer reports for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidQuery => 400,
            Self::CapabilityUnsupported { .. } => 501,
            Self::Configuration(_) => 500,
            Self::Upstream { .. } => 502,
        }
    }

    /// Wire representation
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
            upstream_status: match self {
                Self::Upstream { status, .. } => *status,
                _ => None,
            },
        }
    }

    /// Rebuild an error from its wire representation.
    ///
    /// Details that are not carried on the wire (provider name, requested
    /// kind) are recovered from `provider`/`kind` as supplied by the caller.
    pub fn from_body(body: ErrorBody, provider: &str, kind: ResultKind) -> Self {
        match body.error.as_str() {
            "invalid_query" => Self::InvalidQuery,
            "capability_unsupported" => Self::CapabilityUnsupported {
                provider: provider.to_string(),
                kind,
            },
            "configuration_error" => Self::Configuration(
                body.message
                    .strip_prefix("configuration error: ")
                    .unwrap_or(&body.message)
                    .to_string(),
            ),
            _ => Self::Upstream {
                status: body.upstream_status,
                message: body.message,
            },
        }
    }
}

/// JSON error body: `{ "error": code, "message": text }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl From<ProviderError> for SearchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingCredential { .. } => Self::Configuration(err.to_string()),
            ProviderError::Http { status, .. } => Self::Upstream {
                status: Some(status),
                message: err.to_string(),
            },
            other => Self::Upstream {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_statuses() {
        assert_eq!(SearchError::InvalidQuery.code(), "invalid_query");
        assert_eq!(SearchError::InvalidQuery.http_status(), 400);

        let unsupported = SearchError::CapabilityUnsupported {
            provider: "duckduckgo".to_string(),
            kind: ResultKind::Image,
        };
        assert_eq!(unsupported.http_status(), 501);
        assert_eq!(
            unsupported.to_string(),
            "image search is not supported by the duckduckgo provider"
        );
    }

    #[test]
    fn test_missing_credential_maps_to_configuration() {
        let err: SearchError = ProviderError::MissingCredential {
            provider: "serper".to_string(),
            variable: "SERPER_API_KEY",
        }
        .into();
        assert!(matches!(err, SearchError::Configuration(_)));
        assert!(err.to_string().contains("SERPER_API_KEY"));
    }

    #[test]
    fn test_http_failure_carries_status() {
        let err: SearchError = ProviderError::Http {
            provider: "serper".to_string(),
            status: 403,
            body: "Unauthorized".to_string(),
        }
        .into();
        match err {
            SearchError::Upstream { status, message } => {
                assert_eq!(status, Some(403));
                assert!(message.contains("403"));
                assert!(message.contains("Unauthorized"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_body_round_trip_keeps_kind() {
        let original = SearchError::Configuration("SERPER_API_KEY missing".to_string());
        let rebuilt = SearchError::from_body(original.to_body(), "serper", ResultKind::Web);
        assert_eq!(rebuilt, original);

        let upstream = SearchError::Upstream {
            status: Some(500),
            message: "boom".to_string(),
        };
        let rebuilt = SearchError::from_body(upstream.to_body(), "serper", ResultKind::Web);
        assert_eq!(rebuilt, upstream);
    }
}
