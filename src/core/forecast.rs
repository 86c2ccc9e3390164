/// Three days of hourly data.
pub const MAX_FORECAST_HOURS: usize = 72;

/// Hourly wind forecast, speeds are in meters per second.
#[derive(Clone, Debug, PartialEq, derive_more::Constructor)]
pub struct ForecastPoint {
    /// Local hour label, for example `2023-02-15T14:00`.
    pub hour: String,

    pub wind_speed: f64,
    pub wind_gust: f64,
}
