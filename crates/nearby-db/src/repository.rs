use async_trait::async_trait;
use nearby_core::BusinessRecord;
use nearby_search::{
    BusinessFilter, BusinessRepository, CategoryCount, RepositoryError, MAX_POPULAR_CATEGORIES,
};
use sqlx::PgPool;

use crate::businesses::{category_counts, list_businesses};

/// [`BusinessRepository`] over the `businesses` table. The radius predicate
/// is evaluated in SQL.
#[derive(Debug, Clone)]
pub struct PgBusinessRepository {
    pool: PgPool,
}

impl PgBusinessRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepository for PgBusinessRepository {
    async fn find_by_filter(
        &self,
        filter: &BusinessFilter,
    ) -> Result<Vec<BusinessRecord>, RepositoryError> {
        let rows = list_businesses(&self.pool, filter)
            .await
            .map_err(|e| RepositoryError::with_source("failed to list businesses", e))?;
        Ok(rows.into_iter().map(BusinessRecord::from).collect())
    }

    fn supports_spatial_index(&self) -> bool {
        true
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, RepositoryError> {
        let rows = category_counts(&self.pool, MAX_POPULAR_CATEGORIES)
            .await
            .map_err(|e| RepositoryError::with_source("failed to count categories", e))?;
        Ok(rows.into_iter().map(CategoryCount::from).collect())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| RepositoryError::with_source("database health check failed", e))
    }
}
