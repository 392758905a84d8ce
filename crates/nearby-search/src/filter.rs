//! The predicate handed to a [`BusinessRepository`](crate::BusinessRepository).
//!
//! A [`BusinessFilter`] is a plain value. In-memory stores evaluate it with
//! [`BusinessFilter::matches`]; SQL stores translate the same fields into
//! `WHERE` clauses.

use nearby_core::{distance_km, BusinessRecord, Coordinates};

use crate::criteria::SearchCriteria;

/// Great-circle neighbourhood around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRadius {
    pub center: Coordinates,
    pub radius_km: f64,
}

impl GeoRadius {
    #[must_use]
    pub fn distance_to(&self, point: Coordinates) -> f64 {
        distance_km(self.center, point)
    }

    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        self.distance_to(point) <= self.radius_km
    }
}

/// Repository-side predicate. Approval and activity are always required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessFilter {
    pub within: Option<GeoRadius>,
    pub category: Option<String>,
    pub rating_min: Option<f64>,
    pub accepts_cod: Option<bool>,
    pub has_offers: Option<bool>,
    pub text: Option<String>,
}

impl BusinessFilter {
    /// Every approved, active business. Used for the category histogram.
    #[must_use]
    pub fn active_corpus() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn matches(&self, record: &BusinessRecord) -> bool {
        if !record.is_searchable() {
            return false;
        }
        if let Some(radius) = &self.within {
            if !radius.contains(record.coordinates) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !record.categories.iter().any(|tag| tag == category) {
                return false;
            }
        }
        if let Some(rating_min) = self.rating_min {
            if record.average_rating < rating_min {
                return false;
            }
        }
        if self.accepts_cod.is_some_and(|want| record.accepts_cod != want) {
            return false;
        }
        if self.has_offers.is_some_and(|want| record.has_offers != want) {
            return false;
        }
        match &self.text {
            Some(query) => matches_text(record, query),
            None => true,
        }
    }
}

/// Case-insensitive substring test of the whole query against name or
/// description. The query is not split into terms.
#[must_use]
pub fn matches_text(record: &BusinessRecord, query: &str) -> bool {
    let needle = query.to_lowercase();
    record.name.to_lowercase().contains(&needle)
        || record.description.to_lowercase().contains(&needle)
}

/// How a search splits work between the repository and the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    pub repository_filter: BusinessFilter,
    /// Radius the engine enforces on computed distances.
    pub radius: Option<GeoRadius>,
    /// Whether the repository was asked to apply the radius itself.
    pub radius_delegated: bool,
}

impl FilterPlan {
    /// Without a spatial index the repository returns the superset and the
    /// engine applies the radius.
    #[must_use]
    pub fn build(criteria: &SearchCriteria, spatial_index: bool) -> Self {
        let radius = criteria.origin.map(|center| GeoRadius {
            center,
            radius_km: criteria.radius_km,
        });
        let radius_delegated = spatial_index && radius.is_some();

        let repository_filter = BusinessFilter {
            within: if radius_delegated { radius } else { None },
            category: criteria.category.clone(),
            rating_min: (criteria.rating_min > 0.0).then_some(criteria.rating_min),
            accepts_cod: criteria.accepts_cod,
            has_offers: criteria.has_offers,
            text: criteria.free_text.clone(),
        };

        Self {
            repository_filter,
            radius,
            radius_delegated,
        }
    }

    /// Re-check applied to every candidate regardless of delegation.
    #[must_use]
    pub fn within_radius(&self, distance: Option<f64>) -> bool {
        match (&self.radius, distance) {
            (Some(radius), Some(d)) => d <= radius.radius_km,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}
