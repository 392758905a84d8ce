use std::collections::{HashMap, HashSet};

use nearby_core::BusinessRecord;
use serde::Serialize;

pub const MAX_POPULAR_CATEGORIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Tag histogram over `corpus`, most frequent first, ties in first-seen
/// order. A tag repeated within one record counts once.
#[must_use]
pub fn popular_categories(corpus: &[BusinessRecord]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in corpus {
        let mut seen_in_record = HashSet::new();
        for tag in &record.categories {
            if !seen_in_record.insert(tag.as_str()) {
                continue;
            }
            if let Some(&slot) = index.get(tag.as_str()) {
                counts[slot].count += 1;
            } else {
                index.insert(tag.as_str(), counts.len());
                counts.push(CategoryCount {
                    category: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(MAX_POPULAR_CATEGORIES);
    counts
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use nearby_core::{Coordinates, LiveStatus, OperatingHours};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    fn tagged(tags: &[&str]) -> BusinessRecord {
        BusinessRecord {
            id: Uuid::new_v4(),
            name: "tagged".to_string(),
            description: String::new(),
            categories: tags.iter().map(ToString::to_string).collect(),
            coordinates: Coordinates::new(0.0, 0.0),
            operating_hours: OperatingHours::new(),
            status: LiveStatus::Online,
            average_rating: 0.0,
            review_count: 0,
            accepts_cod: false,
            has_offers: false,
            verified: false,
            commission_rate: Decimal::ZERO,
            min_order_amount: Decimal::ZERO,
            created_at: Utc::now(),
            is_approved: true,
            is_active: true,
        }
    }

    #[test]
    fn counts_descending_with_first_seen_ties() {
        let corpus = vec![
            tagged(&["food", "bakery"]),
            tagged(&["beauty"]),
            tagged(&["beauty", "spa"]),
            tagged(&["bakery"]),
        ];
        let popular = popular_categories(&corpus);
        let summary: Vec<(&str, usize)> = popular
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            summary,
            [("bakery", 2), ("beauty", 2), ("food", 1), ("spa", 1)]
        );
    }

    #[test]
    fn duplicate_tag_in_one_record_counts_once() {
        let popular = popular_categories(&[tagged(&["spa", "spa", "spa"])]);
        assert_eq!(
            popular,
            [CategoryCount {
                category: "spa".to_string(),
                count: 1
            }]
        );
    }

    #[test]
    fn caps_at_ten_entries() {
        let tags: Vec<String> = (0..15).map(|i| format!("tag-{i}")).collect();
        let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let popular = popular_categories(&[tagged(&refs)]);
        assert_eq!(popular.len(), MAX_POPULAR_CATEGORIES);
        assert_eq!(popular[0].category, "tag-0");
        assert_eq!(popular[9].category, "tag-9");
    }

    #[test]
    fn empty_corpus_is_empty() {
        assert!(popular_categories(&[]).is_empty());
    }
}
