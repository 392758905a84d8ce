use thiserror::Error;

/// Errors returned by geocoding and routing.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider understood the request but found no match.
    #[error("no match for '{query}'")]
    NotFound { query: String },

    /// The provider is unconfigured, unreachable, or refused the request.
    #[error("geocoding provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    /// Caller-supplied input was rejected before reaching the provider.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Client construction failed on bad settings such as the base URL.
    #[error("invalid geocoding configuration: {0}")]
    Config(String),

    /// Network or TLS failure, or a non-2xx status, from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GeocodeError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        GeocodeError::ProviderUnavailable {
            reason: reason.into(),
        }
    }

    /// `true` when the failure lies with the provider rather than the input.
    /// Routed distance falls back to straight-line on these.
    #[must_use]
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            GeocodeError::ProviderUnavailable { .. }
                | GeocodeError::Http(_)
                | GeocodeError::Deserialize { .. }
        )
    }
}
