use std::cmp::Ordering;

use crate::criteria::SortBy;
use crate::enrich::SearchResult;

/// Stable in-place sort. Ties keep their incoming order; results without a
/// distance sort after those with one.
pub fn sort_results(results: &mut [SearchResult], sort_by: SortBy) {
    match sort_by {
        SortBy::Distance => results.sort_by(|a, b| by_distance(a.distance_km, b.distance_km)),
        SortBy::Rating => results.sort_by(|a, b| {
            b.business
                .average_rating
                .total_cmp(&a.business.average_rating)
        }),
        SortBy::Popularity => {
            results.sort_by(|a, b| b.business.review_count.cmp(&a.business.review_count));
        }
        SortBy::Newest => {
            results.sort_by(|a, b| b.business.created_at.cmp(&a.business.created_at));
        }
    }
}

fn by_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
