use std::sync::Arc;

use async_trait::async_trait;
use nearby_core::BusinessRecord;

use crate::categories::{popular_categories, CategoryCount};
use crate::error::RepositoryError;
use crate::filter::BusinessFilter;

/// Source of business snapshots.
///
/// Implementations must only return approved, active businesses that satisfy
/// `filter`. A repository that reports a spatial index is trusted to apply
/// `filter.within`; the engine still re-checks computed distances.
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn find_by_filter(
        &self,
        filter: &BusinessFilter,
    ) -> Result<Vec<BusinessRecord>, RepositoryError>;

    fn supports_spatial_index(&self) -> bool {
        false
    }

    /// Popular categories over every approved, active business. The default
    /// loads the whole corpus; stores that can aggregate should override it.
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, RepositoryError> {
        let corpus = self
            .find_by_filter(&BusinessFilter::active_corpus())
            .await?;
        Ok(popular_categories(&corpus))
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Repository over a fixed list of records, used by the CLI `--fixture` mode
/// and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBusinessRepository {
    businesses: Arc<Vec<BusinessRecord>>,
}

impl InMemoryBusinessRepository {
    #[must_use]
    pub fn new(businesses: Vec<BusinessRecord>) -> Self {
        Self {
            businesses: Arc::new(businesses),
        }
    }
}

#[async_trait]
impl BusinessRepository for InMemoryBusinessRepository {
    async fn find_by_filter(
        &self,
        filter: &BusinessFilter,
    ) -> Result<Vec<BusinessRecord>, RepositoryError> {
        Ok(self
            .businesses
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
