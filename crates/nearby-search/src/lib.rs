//! Business discovery: request validation, filter planning, open-now
//! evaluation, enrichment, ranking, category popularity and pagination,
//! orchestrated by [`SearchEngine`].

pub mod categories;
pub mod criteria;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod open_now;
pub mod pagination;
pub mod ranking;
pub mod repository;

pub use categories::{popular_categories, CategoryCount, MAX_POPULAR_CATEGORIES};
pub use criteria::{PriceRange, SearchCriteria, SearchRequest, SortBy};
pub use engine::{SearchEngine, SearchResponse, SearchSettings};
pub use enrich::{enrich, SearchResult};
pub use error::{RepositoryError, SearchError, ValidationError};
pub use filter::{matches_text, BusinessFilter, FilterPlan, GeoRadius};
pub use open_now::{Clock, FixedClock, OpenState, SystemClock};
pub use pagination::{paginate, Page};
pub use ranking::sort_results;
pub use repository::{BusinessRepository, InMemoryBusinessRepository};
