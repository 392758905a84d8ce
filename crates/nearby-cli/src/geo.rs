//! Geocoding and distance commands. These read provider settings from flags
//! or the environment and never touch the database.

use anyhow::Context;
use clap::Args;
use nearby_core::Coordinates;
use nearby_geocode::{GeocodeClient, GeocodeConfig, TravelMode};

#[derive(Debug, Args)]
pub struct ProviderArgs {
    /// Maps API key; without one only straight-line distances are available
    #[arg(long, env = "NEARBY_MAPS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    #[arg(
        long,
        env = "NEARBY_MAPS_BASE_URL",
        default_value = "https://maps.googleapis.com"
    )]
    pub base_url: String,
    #[arg(long, env = "NEARBY_GEOCODE_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
    #[arg(
        long,
        env = "NEARBY_GEOCODE_USER_AGENT",
        default_value = "nearby/0.1 (business-discovery)"
    )]
    pub user_agent: String,
    /// Skip routed distances and always use straight-line estimates
    #[arg(long)]
    pub no_routing: bool,
}

impl ProviderArgs {
    #[must_use]
    pub fn to_config(&self) -> GeocodeConfig {
        GeocodeConfig {
            api_key: self.api_key.clone().filter(|key| !key.trim().is_empty()),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
            routing_enabled: !self.no_routing,
        }
    }

    fn client(&self) -> anyhow::Result<GeocodeClient> {
        let config = self.to_config();
        GeocodeClient::from_config(&config).context("building geocoding client")
    }
}

#[derive(Debug, Args)]
pub struct DistanceArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub from_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub from_lon: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub to_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub to_lon: f64,
    /// driving, walking, bicycling or transit
    #[arg(long, default_value = "driving", value_parser = parse_mode)]
    pub mode: TravelMode,
    #[command(flatten)]
    pub provider: ProviderArgs,
}

fn parse_mode(raw: &str) -> Result<TravelMode, String> {
    TravelMode::parse(raw).ok_or_else(|| format!("unsupported travel mode: {raw}"))
}

pub(crate) async fn run_geocode(address: &str, provider: &ProviderArgs) -> anyhow::Result<()> {
    let result = provider.client()?.geocode(address).await?;
    crate::print_json(&result)
}

pub(crate) async fn run_reverse_geocode(
    lat: f64,
    lon: f64,
    provider: &ProviderArgs,
) -> anyhow::Result<()> {
    let result = provider.client()?.reverse_geocode(lat, lon).await?;
    crate::print_json(&result)
}

pub(crate) async fn run_distance(args: &DistanceArgs) -> anyhow::Result<()> {
    let client = args.provider.client()?;
    let estimate = client
        .distance_between(
            Coordinates::new(args.from_lat, args.from_lon),
            Coordinates::new(args.to_lat, args.to_lon),
            args.mode,
        )
        .await?;
    tracing::debug!(route_type = ?estimate.route_type, mode = %args.mode, "distance estimated");
    crate::print_json(&estimate)
}
