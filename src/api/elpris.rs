//! [Elpriset just nu](https://www.elprisetjustnu.se/elpris-api) spot price client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::Url;
use serde::Deserialize;

use crate::{api::client::Client, core::price::PricePoint, prelude::*};

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Get today's and tomorrow's prices, in this order.
    ///
    /// Either day failing fails the whole call.
    #[instrument(skip_all, fields(today = %today))]
    async fn get_upcoming_prices(&self, today: NaiveDate) -> Result<Vec<PricePoint>> {
        let mut prices = self.get_prices(today).await?;
        let tomorrow = today.checked_add_days(Days::new(1)).context("date overflow")?;
        prices.extend(self.get_prices(tomorrow).await?);
        Ok(prices)
    }

    /// Get all hourly prices on the specified day.
    async fn get_prices(&self, on: NaiveDate) -> Result<Vec<PricePoint>>;
}

#[derive(bon::Builder)]
pub struct Api {
    client: Arc<Client>,

    /// Price area code, such as `SE4`.
    #[builder(into)]
    region: String,

    ttl: Duration,
}

impl Api {
    fn url(&self, on: NaiveDate) -> Result<Url> {
        let url = format!(
            "https://www.elprisetjustnu.se/api/v1/prices/{}_{}.json",
            on.format("%Y/%m-%d"),
            self.region,
        );
        Url::parse(&url).with_context(|| format!("invalid price URL `{url}`"))
    }
}

#[async_trait]
impl PriceProvider for Api {
    #[instrument(skip_all, fields(on = %on, region = %self.region))]
    async fn get_prices(&self, on: NaiveDate) -> Result<Vec<PricePoint>> {
        let body = self.client.get(self.url(on)?, self.ttl).await?;
        let prices = parse_prices(&body)?;
        info!(n_prices = prices.len(), "fetched the prices");
        Ok(prices)
    }
}

fn parse_prices(body: &[u8]) -> Result<Vec<PricePoint>> {
    Ok(serde_json::from_slice::<Vec<Price>>(body)
        .context("failed to deserialize the prices")?
        .into_iter()
        .map(|price| PricePoint::from_start_time(&price.time_start, price.sek_per_kwh))
        .collect())
}

#[derive(Deserialize)]
struct Price {
    time_start: String,

    #[serde(rename = "SEK_per_kWh")]
    sek_per_kwh: f64,
}
