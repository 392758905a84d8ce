//! Distance estimation strategies.
//!
//! [`StraightLineDistance`] is always available. [`RoutedDistance`] asks a
//! provider for a road route and falls back to straight-line when the
//! provider fails or does not answer in time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nearby_core::{distance_km, Coordinates};

use crate::provider::GeocodeProvider;
use crate::types::{DistanceEstimate, RouteType, TravelMode};

/// Assumed travel time per straight-line kilometre.
pub const STRAIGHT_LINE_MINUTES_PER_KM: f64 = 2.0;

#[async_trait]
pub trait DistanceStrategy: Send + Sync {
    async fn estimate(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> DistanceEstimate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineDistance;

impl StraightLineDistance {
    #[must_use]
    pub fn compute(from: Coordinates, to: Coordinates) -> DistanceEstimate {
        let km = distance_km(from, to);
        DistanceEstimate {
            distance_km: km,
            duration_minutes: km * STRAIGHT_LINE_MINUTES_PER_KM,
            route_type: RouteType::StraightLine,
            distance_text: None,
            duration_text: None,
        }
    }
}

#[async_trait]
impl DistanceStrategy for StraightLineDistance {
    async fn estimate(
        &self,
        from: Coordinates,
        to: Coordinates,
        _mode: TravelMode,
    ) -> DistanceEstimate {
        Self::compute(from, to)
    }
}

pub struct RoutedDistance {
    provider: Arc<dyn GeocodeProvider>,
    timeout: Duration,
}

impl RoutedDistance {
    #[must_use]
    pub fn new(provider: Arc<dyn GeocodeProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl DistanceStrategy for RoutedDistance {
    async fn estimate(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> DistanceEstimate {
        match tokio::time::timeout(self.timeout, self.provider.route(from, to, mode)).await {
            Ok(Ok(estimate)) => estimate,
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    %from,
                    %to,
                    mode = %mode,
                    "routing failed; using straight-line distance"
                );
                StraightLineDistance::compute(from, to)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    %from,
                    %to,
                    "routing timed out; using straight-line distance"
                );
                StraightLineDistance::compute(from, to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeocodeError;
    use crate::types::GeocodeResult;

    struct StubProvider {
        route: fn() -> Result<DistanceEstimate, GeocodeError>,
        delay: Duration,
    }

    #[async_trait]
    impl GeocodeProvider for StubProvider {
        async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
            Err(GeocodeError::NotFound {
                query: address.to_string(),
            })
        }

        async fn reverse_geocode(&self, at: Coordinates) -> Result<GeocodeResult, GeocodeError> {
            Err(GeocodeError::NotFound {
                query: at.to_string(),
            })
        }

        async fn route(
            &self,
            _from: Coordinates,
            _to: Coordinates,
            _mode: TravelMode,
        ) -> Result<DistanceEstimate, GeocodeError> {
            tokio::time::sleep(self.delay).await;
            (self.route)()
        }
    }

    const FROM: Coordinates = Coordinates::new(0.0, 0.0);
    const TO: Coordinates = Coordinates::new(0.0, 0.1);

    fn routed(
        route: fn() -> Result<DistanceEstimate, GeocodeError>,
        delay: Duration,
    ) -> RoutedDistance {
        RoutedDistance::new(
            Arc::new(StubProvider { route, delay }),
            Duration::from_millis(100),
        )
    }

    fn assert_straight_line(estimate: &DistanceEstimate) {
        assert_eq!(estimate.route_type, RouteType::StraightLine);
        assert!((estimate.distance_km - 11.1).abs() < 0.5);
        assert!(
            (estimate.duration_minutes - 2.0 * estimate.distance_km).abs() < 1e-9,
            "{estimate:?}"
        );
    }

    #[tokio::test]
    async fn straight_line_duration_is_two_minutes_per_km() {
        let estimate = StraightLineDistance
            .estimate(FROM, TO, TravelMode::Walking)
            .await;
        assert_straight_line(&estimate);
        assert!(estimate.distance_text.is_none());
    }

    #[tokio::test]
    async fn routed_answer_is_used() {
        let strategy = routed(
            || {
                Ok(DistanceEstimate {
                    distance_km: 14.2,
                    duration_minutes: 21.0,
                    route_type: RouteType::Routed,
                    distance_text: Some("14.2 km".to_string()),
                    duration_text: Some("21 mins".to_string()),
                })
            },
            Duration::ZERO,
        );
        let estimate = strategy.estimate(FROM, TO, TravelMode::Driving).await;
        assert_eq!(estimate.route_type, RouteType::Routed);
        assert!((estimate.distance_km - 14.2).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let strategy = routed(
            || Err(GeocodeError::unavailable("REQUEST_DENIED")),
            Duration::ZERO,
        );
        assert_straight_line(&strategy.estimate(FROM, TO, TravelMode::Driving).await);
    }

    #[tokio::test]
    async fn slow_provider_falls_back() {
        let strategy = routed(
            || unreachable!("route should be cancelled by the timeout"),
            Duration::from_secs(5),
        );
        assert_straight_line(&strategy.estimate(FROM, TO, TravelMode::Driving).await);
    }
}
