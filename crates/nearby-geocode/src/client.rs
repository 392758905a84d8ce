use std::sync::Arc;
use std::time::Duration;

use nearby_core::{AppConfig, CoordinateError, Coordinates};

use crate::distance::{DistanceStrategy, RoutedDistance, StraightLineDistance};
use crate::error::GeocodeError;
use crate::google::GoogleMapsProvider;
use crate::provider::GeocodeProvider;
use crate::types::{DistanceEstimate, GeocodeResult, TravelMode};

/// Provider settings resolved from [`AppConfig`].
#[derive(Clone)]
pub struct GeocodeConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub routing_enabled: bool,
}

impl std::fmt::Debug for GeocodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("routing_enabled", &self.routing_enabled)
            .finish()
    }
}

impl GeocodeConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.maps_api_key.clone(),
            base_url: config.maps_base_url.clone(),
            timeout_secs: config.geocode_timeout_secs,
            user_agent: config.geocode_user_agent.clone(),
            routing_enabled: config.routing_enabled,
        }
    }
}

/// Geocoding, reverse geocoding and distance estimation.
///
/// Without a provider, geocoding reports [`GeocodeError::ProviderUnavailable`]
/// and distances are straight-line. The distance strategy is fixed at
/// construction.
#[derive(Clone)]
pub struct GeocodeClient {
    provider: Option<Arc<dyn GeocodeProvider>>,
    distance: Arc<dyn DistanceStrategy>,
}

impl std::fmt::Debug for GeocodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeClient")
            .field("provider_configured", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}

impl GeocodeClient {
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn GeocodeProvider>>,
        routing_enabled: bool,
        routing_timeout: Duration,
    ) -> Self {
        let distance: Arc<dyn DistanceStrategy> = match &provider {
            Some(provider) if routing_enabled => {
                Arc::new(RoutedDistance::new(Arc::clone(provider), routing_timeout))
            }
            _ => Arc::new(StraightLineDistance),
        };
        Self { provider, distance }
    }

    /// Builds a client backed by Google Maps when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] or [`GeocodeError::Config`] if the HTTP
    /// provider cannot be constructed.
    pub fn from_config(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        let provider: Option<Arc<dyn GeocodeProvider>> = match &config.api_key {
            Some(key) => Some(Arc::new(GoogleMapsProvider::with_base_url(
                key,
                config.timeout_secs,
                &config.user_agent,
                &config.base_url,
            )?)),
            None => {
                tracing::info!("no maps API key configured; geocoding disabled");
                None
            }
        };
        Ok(Self::new(
            provider,
            config.routing_enabled,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// # Errors
    ///
    /// - [`GeocodeError::InvalidInput`] for a blank address.
    /// - [`GeocodeError::NotFound`] when nothing matches.
    /// - A provider failure when no provider is configured or it fails.
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::InvalidInput {
                field: "address",
                reason: "must not be blank".to_string(),
            });
        }

        let result = self.provider()?.geocode(address).await;
        log_outcome("geocode", address, &result);
        result
    }

    /// # Errors
    ///
    /// - [`GeocodeError::InvalidInput`] for out-of-range coordinates.
    /// - [`GeocodeError::NotFound`] when nothing matches.
    /// - A provider failure when no provider is configured or it fails.
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodeResult, GeocodeError> {
        let at = Coordinates::new(latitude, longitude)
            .validate()
            .map_err(|e| invalid_coordinate(e, e.field()))?;

        let result = self.provider()?.reverse_geocode(at).await;
        log_outcome("reverse_geocode", &at.to_string(), &result);
        result
    }

    /// Routed distance when a provider answers, straight-line otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidInput`] only, for out-of-range
    /// coordinates. Provider problems never surface here.
    pub async fn distance_between(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> Result<DistanceEstimate, GeocodeError> {
        let from = from.validate().map_err(|e| {
            let field = match e {
                CoordinateError::Latitude(_) => "fromLat",
                CoordinateError::Longitude(_) => "fromLon",
            };
            invalid_coordinate(e, field)
        })?;
        let to = to.validate().map_err(|e| {
            let field = match e {
                CoordinateError::Latitude(_) => "toLat",
                CoordinateError::Longitude(_) => "toLon",
            };
            invalid_coordinate(e, field)
        })?;

        Ok(self.distance.estimate(from, to, mode).await)
    }

    fn provider(&self) -> Result<&Arc<dyn GeocodeProvider>, GeocodeError> {
        self.provider
            .as_ref()
            .ok_or_else(|| GeocodeError::unavailable("no geocoding provider configured"))
    }
}

fn invalid_coordinate(e: CoordinateError, field: &'static str) -> GeocodeError {
    GeocodeError::InvalidInput {
        field,
        reason: e.to_string(),
    }
}

fn log_outcome(operation: &str, query: &str, result: &Result<GeocodeResult, GeocodeError>) {
    match result {
        Ok(found) => tracing::debug!(operation, query, place_id = %found.place_id, "geocoded"),
        Err(GeocodeError::NotFound { .. }) => {
            tracing::info!(operation, query, "no geocoding match");
        }
        Err(e) => tracing::warn!(operation, query, error = %e, "geocoding failed"),
    }
}
