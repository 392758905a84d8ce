//! Display-oriented fields attached to each matching business.

use nearby_core::BusinessRecord;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::criteria::PriceRange;

const BASE_DELIVERY_MINUTES: f64 = 30.0;
const DELIVERY_MINUTES_PER_KM: f64 = 5.0;

/// A business as returned by search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub business: BusinessRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_text: Option<String>,
    pub rating_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_text: Option<String>,
    pub price_range_category: PriceRange,
    pub is_currently_open: bool,
}

/// Builds a [`SearchResult`] from a record, its distance from the origin (if
/// any) and its open-now state.
#[must_use]
pub fn enrich(
    business: BusinessRecord,
    distance_km: Option<f64>,
    is_currently_open: bool,
) -> SearchResult {
    let estimated_delivery_minutes = distance_km.map(delivery_minutes);

    SearchResult {
        distance_text: distance_km.map(distance_text),
        rating_text: rating_text(business.average_rating, business.review_count),
        estimated_delivery_text: estimated_delivery_minutes.map(delivery_text),
        price_range_category: price_range_for(
            business.min_order_amount,
            business.commission_rate,
        ),
        estimated_delivery_minutes,
        distance_km,
        is_currently_open,
        business,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn distance_text(km: f64) -> String {
    if km < 1.0 {
        format!("{}m away", (km * 1000.0).round() as u32)
    } else {
        format!("{km:.1}km away")
    }
}

fn rating_text(rating: f64, reviews: u32) -> String {
    if reviews == 0 {
        "No reviews yet".to_string()
    } else {
        format!("{rating:.1} ({reviews} reviews)")
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn delivery_minutes(km: f64) -> u32 {
    (BASE_DELIVERY_MINUTES + DELIVERY_MINUTES_PER_KM * km.max(0.0)).round() as u32
}

fn delivery_text(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} mins");
    }
    let (hours, rest) = (minutes / 60, minutes % 60);
    if rest == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {rest}m")
    }
}

/// Fixed tiering on minimum order amount and commission percentage.
#[must_use]
pub fn price_range_for(min_order_amount: Decimal, commission_rate: Decimal) -> PriceRange {
    if min_order_amount < Decimal::from(100) && commission_rate < Decimal::from(3) {
        PriceRange::Low
    } else if min_order_amount < Decimal::from(500) && commission_rate < Decimal::from(5) {
        PriceRange::Medium
    } else {
        PriceRange::High
    }
}
