//! Google Maps Geocoding and Distance Matrix client.
//!
//! Both APIs answer HTTP 200 with a `"status"` field in the JSON body; the
//! status is mapped onto [`GeocodeError`] before the payload is decoded.

use std::time::Duration;

use async_trait::async_trait;
use nearby_core::Coordinates;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeocodeError;
use crate::provider::GeocodeProvider;
use crate::types::{AddressComponent, DistanceEstimate, GeocodeResult, RouteType, TravelMode};

const GEOCODE_PATH: &str = "maps/api/geocode/json";
const DISTANCE_MATRIX_PATH: &str = "maps/api/distancematrix/json";

/// Google Maps provider rooted at a configurable base URL, so tests can point
/// it at a mock server.
pub struct GoogleMapsProvider {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for GoogleMapsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsProvider")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GoogleMapsProvider {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`GeocodeError::Config`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative endpoint paths append.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GeocodeError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| GeocodeError::Config(format!("invalid endpoint path '{path}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn request_json(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<serde_json::Value, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Maps the envelope `"status"` onto an error. `query` names the request
    /// in `NotFound`.
    fn check_status(body: &serde_json::Value, query: &str) -> Result<(), GeocodeError> {
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("MISSING_STATUS");
        match status {
            "OK" => Ok(()),
            "ZERO_RESULTS" | "NOT_FOUND" => Err(GeocodeError::NotFound {
                query: query.to_string(),
            }),
            other => {
                let detail = body
                    .get("error_message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("no detail");
                Err(GeocodeError::unavailable(format!("{other}: {detail}")))
            }
        }
    }

    async fn geocode_query(
        &self,
        params: &[(&str, &str)],
        query: &str,
    ) -> Result<GeocodeResult, GeocodeError> {
        let url = self.build_url(GEOCODE_PATH, params)?;
        let body = self.request_json(&url, "geocode").await?;
        Self::check_status(&body, query)?;

        let envelope: GeocodeEnvelope =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("geocode({query})"),
                source: e,
            })?;

        envelope
            .results
            .into_iter()
            .next()
            .map(GeocodeResult::from)
            .ok_or_else(|| GeocodeError::NotFound {
                query: query.to_string(),
            })
    }
}

#[async_trait]
impl GeocodeProvider for GoogleMapsProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        self.geocode_query(&[("address", address)], address).await
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<GeocodeResult, GeocodeError> {
        let latlng = at.to_string();
        self.geocode_query(&[("latlng", &latlng)], &latlng).await
    }

    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> Result<DistanceEstimate, GeocodeError> {
        let origins = from.to_string();
        let destinations = to.to_string();
        let url = self.build_url(
            DISTANCE_MATRIX_PATH,
            &[
                ("origins", &origins),
                ("destinations", &destinations),
                ("mode", mode.as_str()),
                ("units", "metric"),
            ],
        )?;
        let query = format!("{origins} -> {destinations}");

        let body = self.request_json(&url, "distancematrix").await?;
        Self::check_status(&body, &query)?;

        let envelope: DistanceMatrixEnvelope =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("distancematrix({query})"),
                source: e,
            })?;

        let element = envelope
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| GeocodeError::unavailable("distance matrix returned no elements"))?;

        match element.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(GeocodeError::NotFound { query }),
            other => return Err(GeocodeError::unavailable(format!("element status {other}"))),
        }

        let (Some(distance), Some(duration)) = (element.distance, element.duration) else {
            return Err(GeocodeError::unavailable(
                "distance matrix element missing distance or duration",
            ));
        };

        Ok(DistanceEstimate {
            distance_km: distance.value / 1000.0,
            duration_minutes: duration.value / 60.0,
            route_type: RouteType::Routed,
            distance_text: Some(distance.text),
            duration_text: Some(duration.text),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GeocodeEnvelope {
    #[serde(default)]
    results: Vec<WireGeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct WireGeocodeResult {
    formatted_address: String,
    #[serde(default)]
    place_id: String,
    geometry: WireGeometry,
    #[serde(default)]
    address_components: Vec<WireAddressComponent>,
}

#[derive(Debug, Deserialize)]
struct WireGeometry {
    location: WireLatLng,
}

#[derive(Debug, Deserialize)]
struct WireLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct WireAddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl From<WireGeocodeResult> for GeocodeResult {
    fn from(wire: WireGeocodeResult) -> Self {
        Self {
            latitude: wire.geometry.location.lat,
            longitude: wire.geometry.location.lng,
            formatted_address: wire.formatted_address,
            place_id: wire.place_id,
            address_components: wire
                .address_components
                .into_iter()
                .map(|c| AddressComponent {
                    long_name: c.long_name,
                    short_name: c.short_name,
                    types: c.types,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixEnvelope {
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    #[serde(default)]
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: f64,
}

#[cfg(test)]
#[path = "google_test.rs"]
mod tests;
