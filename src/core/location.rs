use std::fmt::{Display, Formatter};

use crate::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, derive_more::Constructor)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse the `lat` and `long` query parameters.
    pub fn try_parse(latitude: &str, longitude: &str) -> Result<Self> {
        let latitude = latitude
            .trim()
            .parse()
            .with_context(|| format!("`{latitude}` is not a valid latitude"))?;
        let longitude = longitude
            .trim()
            .parse()
            .with_context(|| format!("`{longitude}` is not a valid longitude"))?;
        let coordinates = Self { latitude, longitude };
        ensure!(
            coordinates.latitude.is_finite() && coordinates.longitude.is_finite(),
            "coordinates must be finite numbers",
        );
        Ok(coordinates)
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Origin {
    /// Coordinates were passed explicitly, normally by the browser's geolocation API.
    Browser,

    /// Coordinates were resolved from the client IP address.
    Geolocated { city: String, country: String },
}

/// Where the forecast is requested for, and how we know it.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub coordinates: Coordinates,
    pub origin: Origin,
}

impl Location {
    pub const fn browser(coordinates: Coordinates) -> Self {
        Self { coordinates, origin: Origin::Browser }
    }

    pub const fn geolocated(coordinates: Coordinates, city: String, country: String) -> Self {
        Self { coordinates, origin: Origin::Geolocated { city, country } }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.origin {
            Origin::Browser => write!(f, "browser location ({})", self.coordinates),
            Origin::Geolocated { city, country } => {
                write!(f, "{city}, {country} ({})", self.coordinates)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn try_parse_ok() -> Result {
        let coordinates = Coordinates::try_parse("55.60", " 13.0038")?;
        assert_abs_diff_eq!(coordinates.latitude, 55.6);
        assert_abs_diff_eq!(coordinates.longitude, 13.0038);
        Ok(())
    }

    #[test]
    fn try_parse_negative_ok() -> Result {
        let coordinates = Coordinates::try_parse("-33.87", "-151.21")?;
        assert_abs_diff_eq!(coordinates.latitude, -33.87);
        assert_abs_diff_eq!(coordinates.longitude, -151.21);
        Ok(())
    }

    #[test]
    fn try_parse_err() {
        assert!(Coordinates::try_parse("north", "13.0").is_err());
        assert!(Coordinates::try_parse("55.6", "").is_err());
        assert!(Coordinates::try_parse("NaN", "13.0").is_err());
    }

    #[test]
    fn display_browser_location() {
        let location = Location::browser(Coordinates::new(55.6049, 13.0038));
        assert_eq!(location.to_string(), "browser location (55.60, 13.00)");
    }

    #[test]
    fn display_geolocated_location() {
        let location = Location::geolocated(
            Coordinates::new(59.3293, 18.0686),
            "Stockholm".to_owned(),
            "Sweden".to_owned(),
        );
        assert_eq!(location.to_string(), "Stockholm, Sweden (59.33, 18.07)");
    }
}
