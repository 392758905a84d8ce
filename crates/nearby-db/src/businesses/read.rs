//! Read operations for the `businesses` table.

use nearby_core::EARTH_RADIUS_KM;
use nearby_search::BusinessFilter;
use sqlx::PgPool;

use super::types::{BusinessRow, CategoryCountRow};

/// Every optional predicate is bound as a nullable parameter and skipped when
/// `NULL`, so one statement serves every filter shape.
///
/// `$1` is the Earth radius; `$2..$4` the search circle; `$5` category;
/// `$6` rating floor; `$7`/`$8` flags; `$9` an escaped `ILIKE` pattern.
const LIST_BUSINESSES_SQL: &str = "\
    SELECT id, name, description, categories, latitude, longitude, \
           operating_hours, status, average_rating, review_count, \
           accepts_cod, has_offers, verified, commission_rate, \
           min_order_amount, is_approved, is_active, created_at \
    FROM businesses \
    WHERE is_approved = TRUE \
      AND is_active = TRUE \
      AND ($2::float8 IS NULL OR \
           $1::float8 * 2 * asin(sqrt(LEAST(1.0, \
               power(sin(radians(latitude - $2::float8) / 2), 2) + \
               cos(radians($2::float8)) * cos(radians(latitude)) * \
               power(sin(radians(longitude - $3::float8) / 2), 2)))) <= $4::float8) \
      AND ($5::text IS NULL OR $5::text = ANY(categories)) \
      AND ($6::float8 IS NULL OR average_rating >= $6::float8) \
      AND ($7::bool IS NULL OR accepts_cod = $7::bool) \
      AND ($8::bool IS NULL OR has_offers = $8::bool) \
      AND ($9::text IS NULL \
           OR name ILIKE $9::text ESCAPE '\\' \
           OR description ILIKE $9::text ESCAPE '\\') \
    ORDER BY created_at DESC, id";

/// Tag histogram over approved, active rows. Ties keep the order in which a
/// tag first appears scanning newest first, matching `popular_categories`
/// over the output of [`list_businesses`]. A tag repeated within one row
/// counts once.
const CATEGORY_COUNTS_SQL: &str = "\
    WITH ranked AS ( \
        SELECT categories, row_number() OVER (ORDER BY created_at DESC, id) AS rn \
        FROM businesses \
        WHERE is_approved = TRUE AND is_active = TRUE \
    ), tags AS ( \
        SELECT DISTINCT ON (r.rn, t.tag) r.rn, t.tag, t.ord \
        FROM ranked r, unnest(r.categories) WITH ORDINALITY AS t(tag, ord) \
        ORDER BY r.rn, t.tag, t.ord \
    ) \
    SELECT tag AS category, COUNT(*) AS count \
    FROM tags \
    GROUP BY tag \
    ORDER BY COUNT(*) DESC, MIN(ARRAY[rn, ord]) \
    LIMIT $1";

/// Approved, active businesses matching `filter`, newest first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_businesses(
    pool: &PgPool,
    filter: &BusinessFilter,
) -> Result<Vec<BusinessRow>, sqlx::Error> {
    let center = filter.within.map(|w| w.center);
    let text_pattern = filter
        .text
        .as_deref()
        .map(|text| format!("%{}%", escape_like(text)));

    sqlx::query_as::<_, BusinessRow>(LIST_BUSINESSES_SQL)
        .bind(EARTH_RADIUS_KM)
        .bind(center.map(|c| c.latitude))
        .bind(center.map(|c| c.longitude))
        .bind(filter.within.map(|w| w.radius_km))
        .bind(filter.category.as_deref())
        .bind(filter.rating_min)
        .bind(filter.accepts_cod)
        .bind(filter.has_offers)
        .bind(text_pattern)
        .fetch_all(pool)
        .await
}

/// Most common categories across the searchable corpus, at most `limit`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn category_counts(
    pool: &PgPool,
    limit: usize,
) -> Result<Vec<CategoryCountRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryCountRow>(CATEGORY_COUNTS_SQL)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await
}

/// Escapes `ILIKE` wildcards so user text matches literally. Pair with
/// `ESCAPE '\'`.
#[must_use]
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
