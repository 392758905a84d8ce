//! Raw search requests and their validated, defaulted form.

use nearby_core::Coordinates;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Distance,
    Rating,
    Popularity,
    Newest,
}

impl SortBy {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "distance" => Some(SortBy::Distance),
            "rating" => Some(SortBy::Rating),
            "popularity" => Some(SortBy::Popularity),
            "newest" => Some(SortBy::Newest),
            _ => None,
        }
    }

    /// Distance ordering needs an origin; without one it degrades to newest.
    #[must_use]
    pub fn resolve(requested: Option<Self>, has_origin: bool) -> Self {
        match requested {
            Some(SortBy::Distance) | None if has_origin => SortBy::Distance,
            Some(SortBy::Distance) | None => SortBy::Newest,
            Some(other) => other,
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortBy::Distance => write!(f, "distance"),
            SortBy::Rating => write!(f, "rating"),
            SortBy::Popularity => write!(f, "popularity"),
            SortBy::Newest => write!(f, "newest"),
        }
    }
}

/// Coarse price tier derived from commission rate and minimum order amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Low,
    Medium,
    High,
}

impl PriceRange {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(PriceRange::Low),
            "medium" => Some(PriceRange::Medium),
            "high" => Some(PriceRange::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceRange::Low => write!(f, "low"),
            PriceRange::Medium => write!(f, "medium"),
            PriceRange::High => write!(f, "high"),
        }
    }
}

/// Search input as received on the wire. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub free_text: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    pub rating_min: Option<f64>,
    pub price_range: Option<String>,
    pub open_now_only: Option<bool>,
    #[serde(rename = "acceptsCOD")]
    pub accepts_cod: Option<bool>,
    pub has_offers: Option<bool>,
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated search input with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub free_text: Option<String>,
    pub category: Option<String>,
    pub origin: Option<Coordinates>,
    pub radius_km: f64,
    pub rating_min: f64,
    pub price_range: Option<PriceRange>,
    pub open_now_only: bool,
    pub accepts_cod: Option<bool>,
    pub has_offers: Option<bool>,
    pub sort_by: SortBy,
    pub limit: usize,
    pub offset: usize,
}

impl SearchRequest {
    /// Validates the request and applies defaults.
    ///
    /// `limit` is clamped into `1..=100` rather than rejected; every other
    /// out-of-range value is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first offending field.
    pub fn validate(&self) -> Result<SearchCriteria, ValidationError> {
        let origin = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(
                Coordinates::new(latitude, longitude)
                    .validate()
                    .map_err(|e| ValidationError::new(e.field(), e.to_string()))?,
            ),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ValidationError::new(
                    "longitude",
                    "required when latitude is given",
                ))
            }
            (None, Some(_)) => {
                return Err(ValidationError::new(
                    "latitude",
                    "required when longitude is given",
                ))
            }
        };

        let radius_km = self.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(ValidationError::new(
                "radiusKm",
                format!("must be a non-negative number, got {radius_km}"),
            ));
        }

        let rating_min = self.rating_min.unwrap_or(0.0);
        if !(0.0..=MAX_RATING).contains(&rating_min) {
            return Err(ValidationError::new(
                "ratingMin",
                format!("must be between 0 and 5, got {rating_min}"),
            ));
        }

        let offset = self.offset.unwrap_or(0);
        let offset = usize::try_from(offset).map_err(|_| {
            ValidationError::new("offset", format!("must be non-negative, got {offset}"))
        })?;

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let limit = usize::try_from(limit)
            .map_err(|_| ValidationError::new("limit", format!("out of range: {limit}")))?;

        let price_range = match self.price_range.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(PriceRange::parse(raw).ok_or_else(|| {
                ValidationError::new(
                    "priceRange",
                    format!("expected one of low, medium, high; got '{raw}'"),
                )
            })?),
        };

        let requested_sort = match self.sort_by.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(SortBy::parse(raw).ok_or_else(|| {
                ValidationError::new(
                    "sortBy",
                    format!("expected one of distance, rating, popularity, newest; got '{raw}'"),
                )
            })?),
        };

        Ok(SearchCriteria {
            free_text: self
                .free_text
                .clone()
                .filter(|text| !text.trim().is_empty()),
            category: non_blank(self.category.as_deref()),
            sort_by: SortBy::resolve(requested_sort, origin.is_some()),
            origin,
            radius_km,
            rating_min,
            price_range,
            open_now_only: self.open_now_only.unwrap_or(false),
            accepts_cod: self.accepts_cod,
            has_offers: self.has_offers,
            limit,
            offset,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
