/// Length of the `YYYY-MM-DDTHH:MM` prefix shared with the forecast hour labels.
pub const HOUR_KEY_LENGTH: usize = 16;

/// Hourly spot price in the currency per kilowatt-hour.
#[derive(Clone, Debug, PartialEq)]
pub struct PricePoint {
    pub hour: String,
    pub price: f64,
}

impl PricePoint {
    /// Build the point from the full start timestamp, such as `2023-02-15T14:00:00+01:00`.
    pub fn from_start_time(start_time: &str, price: f64) -> Self {
        Self { hour: hour_key(start_time).to_owned(), price }
    }
}

/// Truncate the timestamp to the hour key.
///
/// Shorter timestamps are kept as is, and so are those where the cut would split a character.
#[must_use]
pub fn hour_key(timestamp: &str) -> &str {
    timestamp.get(..HOUR_KEY_LENGTH).unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_key_truncates_offset() {
        assert_eq!(hour_key("2023-02-15T14:00:00+01:00"), "2023-02-15T14:00");
    }

    #[test]
    fn hour_key_keeps_short_timestamp() {
        assert_eq!(hour_key("2023-02-15"), "2023-02-15");
    }

    #[test]
    fn from_start_time_ok() {
        let point = PricePoint::from_start_time("2023-02-15T23:00:00+01:00", 0.45);
        assert_eq!(point, PricePoint { hour: "2023-02-15T23:00".to_owned(), price: 0.45 });
    }
}
