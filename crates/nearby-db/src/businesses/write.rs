//! Write operations for the `businesses` table.

use nearby_core::BusinessRecord;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

/// Rows inserted and rows updated by [`import_businesses`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub inserted: u64,
    pub updated: u64,
}

/// Upsert business records keyed by `id`.
///
/// All upserts run inside a single transaction; if any operation fails the
/// entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::InvalidRecord`] when a record cannot be stored, or
/// [`DbError::Sqlx`] if any database operation fails.
pub async fn import_businesses(
    pool: &PgPool,
    businesses: &[BusinessRecord],
) -> Result<ImportCounts, DbError> {
    let mut tx = pool.begin().await?;
    let mut counts = ImportCounts::default();

    for business in businesses {
        let review_count =
            i32::try_from(business.review_count).map_err(|_| DbError::InvalidRecord {
                id: business.id,
                reason: format!("review count {} overflows", business.review_count),
            })?;

        let is_new: bool = sqlx::query_scalar(
            "INSERT INTO businesses (id, name, description, categories, latitude, longitude, \
                 operating_hours, status, average_rating, review_count, accepts_cod, has_offers, \
                 verified, commission_rate, min_order_amount, is_approved, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             ON CONFLICT (id) DO UPDATE SET \
                 name             = EXCLUDED.name, \
                 description      = EXCLUDED.description, \
                 categories       = EXCLUDED.categories, \
                 latitude         = EXCLUDED.latitude, \
                 longitude        = EXCLUDED.longitude, \
                 operating_hours  = EXCLUDED.operating_hours, \
                 status           = EXCLUDED.status, \
                 average_rating   = EXCLUDED.average_rating, \
                 review_count     = EXCLUDED.review_count, \
                 accepts_cod      = EXCLUDED.accepts_cod, \
                 has_offers       = EXCLUDED.has_offers, \
                 verified         = EXCLUDED.verified, \
                 commission_rate  = EXCLUDED.commission_rate, \
                 min_order_amount = EXCLUDED.min_order_amount, \
                 is_approved      = EXCLUDED.is_approved, \
                 is_active        = EXCLUDED.is_active, \
                 updated_at       = NOW() \
             RETURNING (xmax = 0) AS is_new",
        )
        .bind(business.id)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.categories)
        .bind(business.coordinates.latitude)
        .bind(business.coordinates.longitude)
        .bind(Json(&business.operating_hours))
        .bind(business.status.to_string())
        .bind(business.average_rating)
        .bind(review_count)
        .bind(business.accepts_cod)
        .bind(business.has_offers)
        .bind(business.verified)
        .bind(business.commission_rate)
        .bind(business.min_order_amount)
        .bind(business.is_approved)
        .bind(business.is_active)
        .bind(business.created_at)
        .fetch_one(&mut *tx)
        .await?;

        if is_new {
            counts.inserted += 1;
        } else {
            counts.updated += 1;
        }
    }

    tx.commit().await?;

    tracing::info!(
        inserted = counts.inserted,
        updated = counts.updated,
        "imported businesses"
    );

    Ok(counts)
}
