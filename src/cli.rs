use axum::http::HeaderName;
use clap::Parser;
use reqwest::Url;

use crate::api::geolocation;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[clap(long, default_value = "0.0.0.0:8080", env = "BIND_ADDRESS")]
    pub bind_address: String,

    /// Deployed service version, only logged.
    #[clap(long, env = "SERVICE_VERSION")]
    pub service_version: Option<String>,

    /// Take the client address from this header instead of the peer address.
    ///
    /// For example, `X-Forwarded-For` when running behind a reverse proxy.
    #[clap(long, env = "CLIENT_IP_HEADER")]
    pub client_ip_header: Option<HeaderName>,

    /// Timeout of every outgoing request.
    #[clap(long, default_value = "10s", env = "REQUEST_TIMEOUT")]
    pub request_timeout: humantime::Duration,

    /// Timeout of the whole incoming request.
    ///
    /// Keep it above three request timeouts: geolocation, then two price days one after another.
    #[clap(long, default_value = "45s", env = "RESPONSE_TIMEOUT")]
    pub response_timeout: humantime::Duration,

    /// Maximum number of upstream responses kept in memory.
    #[clap(long, default_value = "10000", env = "CACHE_CAPACITY")]
    pub cache_capacity: u64,

    #[clap(flatten)]
    pub forecast: ForecastArgs,

    #[clap(flatten)]
    pub price: PriceArgs,

    #[clap(flatten)]
    pub geolocation: GeolocationArgs,
}

#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Time zone of the forecast hours, must match the one of the price API.
    #[clap(long = "forecast-timezone", default_value = "CET", env = "FORECAST_TIMEZONE")]
    pub timezone: String,

    #[clap(id = "forecast_ttl", long = "forecast-ttl", default_value = "4h", env = "FORECAST_TTL")]
    pub ttl: humantime::Duration,
}

#[derive(clap::Args)]
pub struct PriceArgs {
    /// Electricity price area.
    #[clap(long = "price-region", default_value = "SE4", env = "PRICE_REGION")]
    pub region: String,

    #[clap(id = "price_ttl", long = "price-ttl", default_value = "1h", env = "PRICE_TTL")]
    pub ttl: humantime::Duration,
}

#[derive(clap::Args)]
pub struct GeolocationArgs {
    #[clap(
        long = "geolocation-base-url",
        default_value = geolocation::Api::DEFAULT_BASE_URL,
        env = "GEOLOCATION_BASE_URL"
    )]
    pub base_url: Url,

    #[clap(
        id = "geolocation_ttl",
        long = "geolocation-ttl",
        default_value = "24h",
        env = "GEOLOCATION_TTL"
    )]
    pub ttl: humantime::Duration,
}
