//! [Open-Meteo](https://open-meteo.com/en/docs) wind forecast client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use itertools::izip;
use reqwest::Url;
use serde::Deserialize;
use serde_with::{DefaultOnNull, serde_as};

use crate::{
    api::client::Client,
    core::{
        forecast::{ForecastPoint, MAX_FORECAST_HOURS},
        location::Coordinates,
    },
    prelude::*,
};

#[async_trait]
pub trait Forecaster: Send + Sync {
    /// Get up to [`MAX_FORECAST_HOURS`] successive hours of the wind forecast.
    async fn get_forecast(&self, coordinates: Coordinates) -> Result<Vec<ForecastPoint>>;
}

#[derive(bon::Builder)]
pub struct Api {
    client: Arc<Client>,

    /// Time zone of the returned hour labels.
    #[builder(into)]
    timezone: String,

    ttl: Duration,
}

impl Api {
    const BASE_URL: &'static str = "https://api.open-meteo.com/v1/forecast";

    fn url(&self, coordinates: Coordinates) -> Result<Url> {
        Ok(Url::parse_with_params(
            Self::BASE_URL,
            &[
                ("latitude", format!("{:.2}", coordinates.latitude)),
                ("longitude", format!("{:.2}", coordinates.longitude)),
                ("windspeed_unit", "ms".to_owned()),
                ("timezone", self.timezone.clone()),
                ("hourly", "windspeed_10m,windgusts_10m".to_owned()),
            ],
        )?)
    }
}

#[async_trait]
impl Forecaster for Api {
    #[instrument(skip_all, fields(coordinates = %coordinates))]
    async fn get_forecast(&self, coordinates: Coordinates) -> Result<Vec<ForecastPoint>> {
        let body = self.client.get(self.url(coordinates)?, self.ttl).await?;
        let forecast = parse_forecast(&body)?;
        info!(n_hours = forecast.len(), "fetched the forecast");
        Ok(forecast)
    }
}

/// Zip the hourly arrays, the shortest one wins.
fn parse_forecast(body: &[u8]) -> Result<Vec<ForecastPoint>> {
    let hourly = serde_json::from_slice::<Response>(body)
        .context("failed to deserialize the forecast")?
        .hourly;
    if hourly.time.len() != hourly.wind_speeds.len() || hourly.time.len() != hourly.wind_gusts.len()
    {
        warn!(
            n_times = hourly.time.len(),
            n_wind_speeds = hourly.wind_speeds.len(),
            n_wind_gusts = hourly.wind_gusts.len(),
            "misaligned forecast arrays",
        );
    }
    Ok(izip!(hourly.time, hourly.wind_speeds, hourly.wind_gusts)
        .take(MAX_FORECAST_HOURS)
        .map(|(hour, wind_speed, wind_gust)| ForecastPoint::new(hour, wind_speed, wind_gust))
        .collect())
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    hourly: Hourly,
}

#[serde_as]
#[derive(Default, Deserialize)]
#[serde(default)]
struct Hourly {
    time: Vec<String>,

    #[serde_as(as = "Vec<DefaultOnNull>")]
    #[serde(rename = "windspeed_10m")]
    wind_speeds: Vec<f64>,

    #[serde_as(as = "Vec<DefaultOnNull>")]
    #[serde(rename = "windgusts_10m")]
    wind_gusts: Vec<f64>,
}
