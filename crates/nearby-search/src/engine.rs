use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use nearby_core::{distance_km, BusinessRecord};
use serde::Serialize;

use crate::categories::CategoryCount;
use crate::criteria::{SearchCriteria, SearchRequest};
use crate::enrich::{enrich, SearchResult};
use crate::error::{RepositoryError, SearchError};
use crate::filter::FilterPlan;
use crate::open_now::{evaluate, Clock, OpenState, SystemClock};
use crate::pagination::paginate;
use crate::ranking::sort_results;
use crate::repository::BusinessRepository;

/// Engine-level settings resolved from application config.
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    /// Offset applied to the clock before evaluating opening hours.
    pub utc_offset: FixedOffset,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }
}

impl SearchSettings {
    /// Returns `None` when the offset is not a valid UTC offset.
    #[must_use]
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(|utc_offset| Self { utc_offset })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_count: usize,
    pub popular_categories: Vec<CategoryCount>,
    pub has_more: bool,
}

/// Runs a search end to end against a [`BusinessRepository`].
#[derive(Clone)]
pub struct SearchEngine {
    repository: Arc<dyn BusinessRepository>,
    clock: Arc<dyn Clock>,
    settings: SearchSettings,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("spatial_index", &self.repository.supports_spatial_index())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    #[must_use]
    pub fn new(repository: Arc<dyn BusinessRepository>, settings: SearchSettings) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn repository(&self) -> &Arc<dyn BusinessRepository> {
        &self.repository
    }

    /// Validates `request` and runs it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] for malformed input and
    /// [`SearchError::Repository`] when the store fails.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let criteria = request.validate()?;
        self.search_criteria(&criteria).await
    }

    /// Runs already-validated criteria.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Repository`] when the store fails.
    pub async fn search_criteria(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<SearchResponse, SearchError> {
        let plan = FilterPlan::build(criteria, self.repository.supports_spatial_index());
        let (candidates, popular_categories) = tokio::try_join!(
            self.repository.find_by_filter(&plan.repository_filter),
            self.repository.category_counts(),
        )
        .inspect_err(|e: &RepositoryError| {
            tracing::error!(error = %e, "business repository lookup failed");
        })?;

        tracing::debug!(
            candidates = candidates.len(),
            radius_delegated = plan.radius_delegated,
            "fetched search candidates"
        );

        let now = self
            .clock
            .now()
            .with_timezone(&self.settings.utc_offset)
            .naive_local();

        let mut results: Vec<SearchResult> = candidates
            .into_iter()
            .filter_map(|business| {
                let distance = criteria
                    .origin
                    .map(|origin| distance_km(origin, business.coordinates));
                if !plan.within_radius(distance) {
                    return None;
                }

                let open = open_state(&business, now).is_open();
                if criteria.open_now_only && !open {
                    return None;
                }

                Some(enrich(business, distance, open))
            })
            .collect();

        if let Some(price_range) = criteria.price_range {
            results.retain(|r| r.price_range_category == price_range);
        }

        sort_results(&mut results, criteria.sort_by);

        let page = paginate(results, criteria.offset, criteria.limit);

        tracing::info!(
            total = page.total,
            returned = page.items.len(),
            sort_by = %criteria.sort_by,
            "search completed"
        );

        Ok(SearchResponse {
            results: page.items,
            total_count: page.total,
            popular_categories,
            has_more: page.has_more,
        })
    }
}

fn open_state(business: &BusinessRecord, now: chrono::NaiveDateTime) -> OpenState {
    let state = evaluate(&business.operating_hours, business.status, now);
    if state == OpenState::OpenByDefault {
        tracing::warn!(
            business_id = %business.id,
            business = %business.name,
            "unreadable operating hours; treating as open"
        );
    }
    state
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;
    use nearby_core::{Coordinates, DayHours, LiveStatus, OperatingHours};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::criteria::SortBy;
    use crate::filter::{BusinessFilter, GeoRadius};
    use crate::open_now::FixedClock;
    use crate::repository::InMemoryBusinessRepository;

    fn business(name: &str, latitude: f64, hours: OperatingHours) -> BusinessRecord {
        BusinessRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            categories: vec!["food".to_string()],
            coordinates: Coordinates::new(latitude, 77.59),
            operating_hours: hours,
            status: LiveStatus::Online,
            average_rating: 4.0,
            review_count: 1,
            accepts_cod: false,
            has_offers: false,
            verified: false,
            commission_rate: Decimal::ONE,
            min_order_amount: Decimal::from(50),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            is_approved: true,
            is_active: true,
        }
    }

    /// Pretends to have a spatial index but ignores the radius entirely.
    struct SloppySpatialRepository(InMemoryBusinessRepository);

    #[async_trait::async_trait]
    impl BusinessRepository for SloppySpatialRepository {
        async fn find_by_filter(
            &self,
            filter: &BusinessFilter,
        ) -> Result<Vec<BusinessRecord>, RepositoryError> {
            let widened = BusinessFilter {
                within: None::<GeoRadius>,
                ..filter.clone()
            };
            self.0.find_by_filter(&widened).await
        }

        fn supports_spatial_index(&self) -> bool {
            true
        }
    }

    struct FailingRepository;

    #[async_trait::async_trait]
    impl BusinessRepository for FailingRepository {
        async fn find_by_filter(
            &self,
            _filter: &BusinessFilter,
        ) -> Result<Vec<BusinessRecord>, RepositoryError> {
            Err(RepositoryError::new("connection refused"))
        }
    }

    /// Serves candidates from memory, a canned histogram, and counts lookups.
    struct AggregatingRepository {
        inner: InMemoryBusinessRepository,
        lookups: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl BusinessRepository for AggregatingRepository {
        async fn find_by_filter(
            &self,
            filter: &BusinessFilter,
        ) -> Result<Vec<BusinessRecord>, RepositoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_filter(filter).await
        }

        async fn category_counts(&self) -> Result<Vec<CategoryCount>, RepositoryError> {
            Ok(vec![CategoryCount {
                category: "food".to_string(),
                count: 42,
            }])
        }
    }

    fn origin_request(radius_km: f64) -> SearchRequest {
        SearchRequest {
            latitude: Some(12.97),
            longitude: Some(77.59),
            radius_km: Some(radius_km),
            ..SearchRequest::default()
        }
    }

    #[tokio::test]
    async fn popular_categories_come_from_repository_aggregate() {
        let repo = Arc::new(AggregatingRepository {
            inner: InMemoryBusinessRepository::new(vec![business(
                "near",
                12.975,
                OperatingHours::new(),
            )]),
            lookups: AtomicUsize::new(0),
        });
        let engine = SearchEngine::new(repo.clone(), SearchSettings::default());

        let response = engine.search(&origin_request(5.0)).await.expect("search");
        assert_eq!(response.total_count, 1);
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 1, "no corpus scan");
        assert_eq!(
            response.popular_categories,
            [CategoryCount {
                category: "food".to_string(),
                count: 42,
            }]
        );
    }

    #[tokio::test]
    async fn radius_is_rechecked_when_repository_ignores_it() {
        let repo = SloppySpatialRepository(InMemoryBusinessRepository::new(vec![
            business("near", 12.975, OperatingHours::new()),
            business("far", 13.5, OperatingHours::new()),
        ]));
        let engine = SearchEngine::new(Arc::new(repo), SearchSettings::default());

        let response = engine.search(&origin_request(5.0)).await.expect("search");
        assert_eq!(response.total_count, 1);
        assert_eq!(response.results[0].business.name, "near");
        assert!(response.results[0].distance_km.unwrap() <= 5.0);
    }

    #[tokio::test]
    async fn open_now_uses_configured_offset() {
        let hours = OperatingHours::every_day(&DayHours::new("09:00", "17:00"));
        let repo = InMemoryBusinessRepository::new(vec![business("shop", 12.97, hours)]);
        // 05:00 UTC is 10:30 at UTC+05:30.
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 3, 5, 0, 0).unwrap());
        let request = SearchRequest {
            open_now_only: Some(true),
            ..SearchRequest::default()
        };

        let utc = SearchEngine::new(Arc::new(repo.clone()), SearchSettings::default())
            .with_clock(Arc::new(clock));
        assert_eq!(utc.search(&request).await.unwrap().total_count, 0);

        let ist = SearchEngine::new(
            Arc::new(repo),
            SearchSettings::from_offset_minutes(330).unwrap(),
        )
        .with_clock(Arc::new(clock));
        let response = ist.search(&request).await.unwrap();
        assert_eq!(response.total_count, 1);
        assert!(response.results[0].is_currently_open);
    }

    #[tokio::test]
    async fn closed_businesses_are_kept_without_open_now_filter() {
        let repo = InMemoryBusinessRepository::new(vec![business(
            "closed",
            12.97,
            OperatingHours::new(),
        )]);
        let engine = SearchEngine::new(Arc::new(repo), SearchSettings::default());
        let response = engine.search(&SearchRequest::default()).await.unwrap();
        assert_eq!(response.total_count, 1);
        assert!(!response.results[0].is_currently_open);
    }

    #[tokio::test]
    async fn price_range_filters_after_enrichment() {
        let mut pricey = business("pricey", 12.97, OperatingHours::new());
        pricey.min_order_amount = Decimal::from(900);
        let repo = InMemoryBusinessRepository::new(vec![
            business("cheap", 12.97, OperatingHours::new()),
            pricey,
        ]);
        let engine = SearchEngine::new(Arc::new(repo), SearchSettings::default());
        let request = SearchRequest {
            price_range: Some("high".to_string()),
            ..SearchRequest::default()
        };
        let response = engine.search(&request).await.unwrap();
        assert_eq!(response.total_count, 1);
        assert_eq!(response.results[0].business.name, "pricey");
    }

    #[tokio::test]
    async fn validation_errors_pass_through() {
        let engine = SearchEngine::new(
            Arc::new(InMemoryBusinessRepository::default()),
            SearchSettings::default(),
        );
        let err = engine.search(&origin_request(-2.0)).await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(ref v) if v.field == "radiusKm"));
    }

    #[tokio::test]
    async fn repository_failures_surface() {
        let engine = SearchEngine::new(Arc::new(FailingRepository), SearchSettings::default());
        let err = engine.search(&SearchRequest::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::Repository(_)));
    }

    #[test]
    fn settings_reject_impossible_offsets() {
        assert!(SearchSettings::from_offset_minutes(330).is_some());
        assert!(SearchSettings::from_offset_minutes(24 * 60).is_none());
    }

    #[tokio::test]
    async fn sort_defaults_to_newest_without_origin() {
        let mut newer = business("newer", 12.97, OperatingHours::new());
        newer.created_at = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let repo = InMemoryBusinessRepository::new(vec![
            business("older", 12.97, OperatingHours::new()),
            newer,
        ]);
        let engine = SearchEngine::new(Arc::new(repo), SearchSettings::default());
        let criteria = SearchRequest::default().validate().unwrap();
        assert_eq!(criteria.sort_by, SortBy::Newest);
        let response = engine.search_criteria(&criteria).await.unwrap();
        assert_eq!(response.results[0].business.name, "newer");
        assert!(response.results[0].distance_km.is_none());
    }
}
