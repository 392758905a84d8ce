//! Row type for the `businesses` table.

use chrono::{DateTime, Utc};
use nearby_core::{BusinessRecord, Coordinates, LiveStatus, OperatingHours};
use nearby_search::CategoryCount;
use rust_decimal::Decimal;
use sqlx::types::Json;
use uuid::Uuid;

/// A row from the `businesses` table. `updated_at` is not read back.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BusinessRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub operating_hours: Json<OperatingHours>,
    pub status: String,
    pub average_rating: f64,
    pub review_count: i32,
    pub accepts_cod: bool,
    pub has_offers: bool,
    pub verified: bool,
    pub commission_rate: Decimal,
    pub min_order_amount: Decimal,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessRow> for BusinessRecord {
    fn from(row: BusinessRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            categories: row.categories,
            coordinates: Coordinates::new(row.latitude, row.longitude),
            operating_hours: row.operating_hours.0,
            status: LiveStatus::parse(&row.status),
            average_rating: row.average_rating,
            // The column is CHECKed non-negative.
            review_count: u32::try_from(row.review_count).unwrap_or(0),
            accepts_cod: row.accepts_cod,
            has_offers: row.has_offers,
            verified: row.verified,
            commission_rate: row.commission_rate,
            min_order_amount: row.min_order_amount,
            created_at: row.created_at,
            is_approved: row.is_approved,
            is_active: row.is_active,
        }
    }
}

/// One row of the category histogram.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryCountRow {
    pub category: String,
    pub count: i64,
}

impl From<CategoryCountRow> for CategoryCount {
    fn from(row: CategoryCountRow) -> Self {
        Self {
            category: row.category,
            count: usize::try_from(row.count).unwrap_or(0),
        }
    }
}
