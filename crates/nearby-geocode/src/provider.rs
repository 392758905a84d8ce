use async_trait::async_trait;
use nearby_core::Coordinates;

use crate::error::GeocodeError;
use crate::types::{DistanceEstimate, GeocodeResult, TravelMode};

/// Geocoding and routing backend.
///
/// Implementations report "no match" as [`GeocodeError::NotFound`] and every
/// provider-side failure as a variant for which
/// [`GeocodeError::is_provider_failure`] holds.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError>;

    async fn reverse_geocode(&self, at: Coordinates) -> Result<GeocodeResult, GeocodeError>;

    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> Result<DistanceEstimate, GeocodeError>;
}
