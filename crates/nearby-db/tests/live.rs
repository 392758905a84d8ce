//! Live integration tests for nearby-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` pointing at a server where the
//! harness may create databases, so they are ignored by default:
//!
//! ```text
//! cargo test -p nearby-db --test live -- --ignored
//! ```

use chrono::{Duration, TimeZone, Utc};
use nearby_core::{BusinessRecord, Coordinates, DayHours, LiveStatus, OperatingHours};
use nearby_db::{
    category_counts, import_businesses, list_businesses, ImportCounts, PgBusinessRepository,
};
use nearby_search::{
    popular_categories, BusinessFilter, BusinessRepository, CategoryCount, GeoRadius,
    SearchEngine, SearchRequest, SearchSettings, MAX_POPULAR_CATEGORIES,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ORIGIN: Coordinates = Coordinates::new(12.97, 77.59);

fn business(name: &str, categories: &[&str], lat_offset: f64) -> BusinessRecord {
    BusinessRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{name} description"),
        categories: categories.iter().map(ToString::to_string).collect(),
        coordinates: Coordinates::new(ORIGIN.latitude + lat_offset, ORIGIN.longitude),
        operating_hours: OperatingHours::every_day(&DayHours::new("08:00", "20:00")),
        status: LiveStatus::Online,
        average_rating: 4.2,
        review_count: 10,
        accepts_cod: true,
        has_offers: false,
        verified: true,
        commission_rate: Decimal::new(25, 1),
        min_order_amount: Decimal::from(120),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        is_approved: true,
        is_active: true,
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn import_inserts_then_updates(pool: sqlx::PgPool) {
    let mut records = vec![
        business("Glow Salon", &["beauty"], 0.01),
        business("Corner Bakery", &["food"], 0.02),
    ];

    let first = import_businesses(&pool, &records).await.expect("import");
    assert_eq!(
        first,
        ImportCounts {
            inserted: 2,
            updated: 0
        }
    );

    records[0].name = "Glow Salon & Spa".to_string();
    let second = import_businesses(&pool, &records).await.expect("re-import");
    assert_eq!(
        second,
        ImportCounts {
            inserted: 0,
            updated: 2
        }
    );

    let rows = list_businesses(&pool, &BusinessFilter::active_corpus())
        .await
        .expect("list");
    assert!(rows.iter().any(|r| r.name == "Glow Salon & Spa"));
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn filter_predicates_translate_to_sql(pool: sqlx::PgPool) {
    let mut hidden = business("Hidden Salon", &["beauty"], 0.0);
    hidden.is_approved = false;
    let mut offers = business("50% Off Bakery", &["food"], 0.001);
    offers.has_offers = true;
    offers.accepts_cod = false;
    offers.created_at += Duration::days(1);

    import_businesses(
        &pool,
        &[
            business("Near Salon", &["beauty", "spa"], 0.01),
            business("Far Salon", &["beauty"], 0.2),
            hidden,
            offers,
        ],
    )
    .await
    .expect("import");

    let within = BusinessFilter {
        within: Some(GeoRadius {
            center: ORIGIN,
            radius_km: 5.0,
        }),
        category: Some("beauty".to_string()),
        ..BusinessFilter::default()
    };
    let rows = list_businesses(&pool, &within).await.expect("radius query");
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Near Salon"]);

    let literal_percent = BusinessFilter {
        text: Some("50%".to_string()),
        ..BusinessFilter::default()
    };
    let rows = list_businesses(&pool, &literal_percent).await.expect("text query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "50% Off Bakery");

    let flags = BusinessFilter {
        has_offers: Some(true),
        accepts_cod: Some(false),
        ..BusinessFilter::default()
    };
    assert_eq!(list_businesses(&pool, &flags).await.unwrap().len(), 1);

    let everything = list_businesses(&pool, &BusinessFilter::active_corpus())
        .await
        .unwrap();
    assert_eq!(everything.len(), 3, "unapproved rows are never returned");
    assert_eq!(everything[0].name, "50% Off Bakery", "newest first");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn category_counts_match_in_memory_histogram(pool: sqlx::PgPool) {
    let mut hidden = business("Hidden Spa", &["spa", "spa"], 0.0);
    hidden.is_active = false;
    let mut newest = business("Corner Bakery", &["food", "beauty"], 0.02);
    newest.created_at += Duration::days(2);
    let mut newer = business("Nail Bar", &["spa", "spa"], 0.03);
    newer.created_at += Duration::days(1);

    import_businesses(
        &pool,
        &[
            business("Glow Salon", &["beauty", "spa"], 0.01),
            newest,
            newer,
            hidden,
        ],
    )
    .await
    .expect("import");

    let rows = category_counts(&pool, MAX_POPULAR_CATEGORIES)
        .await
        .expect("aggregate");
    let from_sql: Vec<CategoryCount> = rows.into_iter().map(CategoryCount::from).collect();

    let corpus: Vec<_> = list_businesses(&pool, &BusinessFilter::active_corpus())
        .await
        .expect("list")
        .into_iter()
        .map(nearby_core::BusinessRecord::from)
        .collect();
    assert_eq!(from_sql, popular_categories(&corpus));
    assert_eq!(from_sql[0].category, "beauty", "ties keep newest-first order");
    assert_eq!(from_sql[1].count, 2, "repeated tags count once per business");
}

// ---------------------------------------------------------------------------
// Repository + engine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn engine_runs_against_postgres(pool: sqlx::PgPool) {
    import_businesses(
        &pool,
        &[
            business("Near Salon", &["beauty"], 0.01),
            business("Nearer Salon", &["beauty"], 0.005),
            business("Far Salon", &["beauty"], 0.2),
        ],
    )
    .await
    .expect("import");

    let repository = PgBusinessRepository::new(pool);
    assert!(repository.supports_spatial_index());
    repository.health_check().await.expect("healthy");

    let engine = SearchEngine::new(Arc::new(repository), SearchSettings::default());
    let response = engine
        .search(&SearchRequest {
            category: Some("beauty".to_string()),
            latitude: Some(ORIGIN.latitude),
            longitude: Some(ORIGIN.longitude),
            radius_km: Some(5.0),
            ..SearchRequest::default()
        })
        .await
        .expect("search");

    let names: Vec<&str> = response
        .results
        .iter()
        .map(|r| r.business.name.as_str())
        .collect();
    assert_eq!(names, ["Nearer Salon", "Near Salon"]);
    assert_eq!(response.popular_categories[0].count, 3);
}
