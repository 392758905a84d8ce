mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use nearby_geocode::{GeocodeClient, GeocodeConfig};
use nearby_search::{SearchEngine, SearchSettings};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nearby_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = nearby_db::PoolConfig::from_app_config(&config);
    let pool = nearby_db::connect_pool(&config.database_url, pool_config).await?;
    nearby_db::run_migrations(&pool).await?;

    let settings = search_settings(config.search_utc_offset_minutes)?;
    let repository = nearby_db::PgBusinessRepository::new(pool);
    let engine = SearchEngine::new(Arc::new(repository), settings);
    let geocoder = GeocodeClient::from_config(&GeocodeConfig::from_app_config(&config))?;

    let app = build_app(
        AppState { engine, geocoder },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, "starting nearby-server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn search_settings(utc_offset_minutes: i32) -> anyhow::Result<SearchSettings> {
    SearchSettings::from_offset_minutes(utc_offset_minutes).with_context(|| {
        format!("invalid NEARBY_SEARCH_UTC_OFFSET_MINUTES: {utc_offset_minutes}")
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
