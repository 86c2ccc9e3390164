use crate::core::{forecast::ForecastPoint, price::PricePoint};

/// Forecast hour with the matching spot price attached.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedEntry {
    pub hour: String,
    pub wind_speed: f64,
    pub wind_gust: f64,

    /// Zero when there is no price for the hour.
    pub price: f64,
}

impl From<ForecastPoint> for MergedEntry {
    fn from(point: ForecastPoint) -> Self {
        Self {
            hour: point.hour,
            wind_speed: point.wind_speed,
            wind_gust: point.wind_gust,
            price: 0.0,
        }
    }
}

#[must_use]
#[derive(Debug)]
pub struct Merged {
    pub entries: Vec<MergedEntry>,

    /// Number of price points which found their hour.
    pub n_matched_prices: usize,
}

/// Attach the prices to the forecast by the hour key.
///
/// Every price goes to the first entry with the equal hour.
/// A later price for an already priced hour overwrites the earlier one.
pub fn merge(forecast: Vec<ForecastPoint>, prices: &[PricePoint]) -> Merged {
    let mut entries: Vec<MergedEntry> = forecast.into_iter().map(MergedEntry::from).collect();
    let mut n_matched_prices = 0;
    for price in prices {
        if let Some(entry) = entries.iter_mut().find(|entry| entry.hour == price.hour) {
            entry.price = price.price;
            n_matched_prices += 1;
        }
    }
    Merged { entries, n_matched_prices }
}
