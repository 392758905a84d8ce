use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use nearby_search::{
    BusinessRepository, InMemoryBusinessRepository, SearchEngine, SearchRequest, SearchSettings,
};

/// Flags mirror the fields of a `POST /api/v1/search` body.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query matched against name and description
    #[arg(long, short = 'q')]
    pub query: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
    #[arg(long)]
    pub radius_km: Option<f64>,
    #[arg(long)]
    pub rating_min: Option<f64>,
    /// low, medium or high
    #[arg(long)]
    pub price_range: Option<String>,
    #[arg(long)]
    pub open_now: bool,
    /// Filter on cash-on-delivery support (true or false)
    #[arg(long)]
    pub accepts_cod: Option<bool>,
    /// Filter on running offers (true or false)
    #[arg(long)]
    pub has_offers: Option<bool>,
    /// distance, rating, popularity or newest
    #[arg(long)]
    pub sort_by: Option<String>,
    #[arg(long)]
    pub limit: Option<i64>,
    #[arg(long)]
    pub offset: Option<i64>,
    /// Search a JSON snapshot instead of Postgres
    #[arg(long)]
    pub fixture: Option<PathBuf>,
    /// Local time offset used for open-now checks
    #[arg(
        long,
        env = "NEARBY_SEARCH_UTC_OFFSET_MINUTES",
        default_value_t = 0,
        allow_hyphen_values = true
    )]
    pub utc_offset_minutes: i32,
}

impl SearchArgs {
    /// `--open-now` only narrows the search when set.
    #[must_use]
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            free_text: self.query.clone(),
            category: self.category.clone(),
            latitude: self.lat,
            longitude: self.lon,
            radius_km: self.radius_km,
            rating_min: self.rating_min,
            price_range: self.price_range.clone(),
            open_now_only: self.open_now.then_some(true),
            accepts_cod: self.accepts_cod,
            has_offers: self.has_offers,
            sort_by: self.sort_by.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

pub(crate) async fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let settings = SearchSettings::from_offset_minutes(args.utc_offset_minutes)
        .with_context(|| format!("invalid UTC offset: {} minutes", args.utc_offset_minutes))?;

    let repository: Arc<dyn BusinessRepository> = match &args.fixture {
        Some(path) => {
            let snapshot = nearby_core::load_business_snapshot(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::debug!(businesses = snapshot.businesses.len(), "loaded fixture");
            Arc::new(InMemoryBusinessRepository::new(snapshot.businesses))
        }
        None => {
            let config = nearby_core::load_app_config()?;
            let pool_config = nearby_db::PoolConfig::from_app_config(&config);
            let pool = nearby_db::connect_pool(&config.database_url, pool_config).await?;
            Arc::new(nearby_db::PgBusinessRepository::new(pool))
        }
    };

    let engine = SearchEngine::new(repository, settings);
    let response = engine.search(&args.to_request()).await?;
    crate::print_json(&response)
}
