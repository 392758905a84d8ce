//! Geocoding, reverse geocoding and distance estimation behind a provider
//! seam, with a Google Maps implementation.

pub mod client;
pub mod distance;
pub mod error;
pub mod google;
pub mod provider;
pub mod types;

pub use client::{GeocodeClient, GeocodeConfig};
pub use distance::{DistanceStrategy, RoutedDistance, StraightLineDistance};
pub use error::GeocodeError;
pub use google::GoogleMapsProvider;
pub use provider::GeocodeProvider;
pub use types::{AddressComponent, DistanceEstimate, GeocodeResult, RouteType, TravelMode};
