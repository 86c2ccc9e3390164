//! Client IP geolocation via [ip-api](https://ip-api.com/docs/api:json).

use std::{net::IpAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    api::client::Client,
    core::location::{Coordinates, Location},
    prelude::*,
};

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self, ip: IpAddr) -> Result<Location>;
}

#[derive(bon::Builder)]
pub struct Api {
    client: Arc<Client>,

    /// Base URL, the IP address gets appended to it.
    base_url: Url,

    ttl: Duration,
}

impl Api {
    pub const DEFAULT_BASE_URL: &'static str = "http://ip-api.com/json/";

    fn url(&self, ip: IpAddr) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("`{}` cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .push(&ip.to_string());
        url.set_query(Some("fields=status,message,country,city,lat,lon"));
        Ok(url)
    }
}

#[async_trait]
impl Geolocator for Api {
    #[instrument(skip_all, fields(ip = %ip))]
    async fn locate(&self, ip: IpAddr) -> Result<Location> {
        let body = self.client.get(self.url(ip)?, self.ttl).await?;
        let location = parse_location(&body)?;
        info!(%location, "located");
        Ok(location)
    }
}

fn parse_location(body: &[u8]) -> Result<Location> {
    let response = serde_json::from_slice::<Response>(body)
        .context("failed to deserialize the geolocation response")?;
    match response {
        Response::Success { country, city, latitude, longitude } => {
            Ok(Location::geolocated(Coordinates::new(latitude, longitude), city, country))
        }
        Response::Fail { message } => Err(anyhow!("geolocation failed: {message}")),
    }
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Response {
    Success {
        country: String,
        city: String,

        #[serde(rename = "lat")]
        latitude: f64,

        #[serde(rename = "lon")]
        longitude: f64,
    },

    Fail {
        #[serde(default)]
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::location::Origin;

    #[test]
    fn url_ok() -> Result {
        let api = Api::builder()
            .client(Arc::new(Client::try_new(Duration::from_secs(10), 100)?))
            .base_url(Url::parse(Api::DEFAULT_BASE_URL)?)
            .ttl(Duration::from_secs(86400))
            .build();
        let url = api.url(IpAddr::V4(Ipv4Addr::new(81, 2, 69, 142)))?;
        assert_eq!(
            url.as_str(),
            "http://ip-api.com/json/81.2.69.142?fields=status,message,country,city,lat,lon",
        );
        Ok(())
    }

    #[test]
    fn parse_success_ok() -> Result {
        // language=json
        let body = r#"{
            "status": "success",
            "country": "Sweden",
            "city": "Malmö",
            "lat": 55.6059,
            "lon": 13.0007
        }"#;
        let location = parse_location(body.as_bytes())?;
        assert_abs_diff_eq!(location.coordinates.latitude, 55.6059);
        assert_abs_diff_eq!(location.coordinates.longitude, 13.0007);
        assert_eq!(
            location.origin,
            Origin::Geolocated { city: "Malmö".to_owned(), country: "Sweden".to_owned() },
        );
        Ok(())
    }

    #[test]
    fn parse_fail_err() {
        // language=json
        let body = br#"{"status": "fail", "message": "private range"}"#;
        let error = parse_location(body).unwrap_err();
        assert_eq!(error.to_string(), "geolocation failed: private range");
    }
}
