mod rejection;

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::{ConnectInfo, Query, Request, State},
    http::{HeaderName, Method, header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::Deserialize;

use self::rejection::Rejection;
use crate::{
    api::{elpris::PriceProvider, geolocation::Geolocator, open_meteo::Forecaster},
    core::{
        location::{Coordinates, Location},
        merge::{Merged, merge},
    },
    prelude::*,
    render,
};

#[derive(bon::Builder)]
pub struct AppState {
    forecaster: Box<dyn Forecaster>,
    price_provider: Box<dyn PriceProvider>,
    geolocator: Box<dyn Geolocator>,

    /// Header to take the client address from, when running behind a proxy.
    ///
    /// The peer address is used when unset.
    client_ip_header: Option<HeaderName>,
}

pub fn router(state: AppState) -> Router {
    Router::new().fallback(handle).with_state(Arc::new(state))
}

#[instrument(skip_all, fields(method = %request.method(), path = request.uri().path()))]
async fn handle(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, _) = request.into_parts();
    match state.try_handle(&parts).await {
        Ok(response) => response,
        Err(rejection) => {
            warn!("rejected: {rejection}");
            rejection.into_response()
        }
    }
}

impl AppState {
    async fn try_handle(&self, request: &Parts) -> Result<Response, Rejection> {
        if request.method != Method::GET && request.method != Method::HEAD {
            return Err(Rejection::MethodNotAllowed);
        }
        let client_ip = self.client_ip(request)?;
        let location = self.locate(request, client_ip).await?;
        info!(%client_ip, %location, "resolved the location");

        let response = match Page::from_path(request.uri.path()) {
            Page::Root => html_response(render::root(&location)),
            Page::Empty => ().into_response(),
            Page::Json => {
                let merged = self.fetch_merged(location.coordinates).await?;
                let body = render::json(&merged.entries);
                ([(header::CONTENT_TYPE, render::JSON_CONTENT_TYPE)], body).into_response()
            }
            Page::Html => {
                let merged = self.fetch_merged(location.coordinates).await?;
                html_response(render::html(&merged.entries, &location))
            }
        };
        Ok(response)
    }

    fn client_ip(&self, request: &Parts) -> Result<IpAddr, Rejection> {
        let address = match &self.client_ip_header {
            Some(header_name) => request
                .headers
                .get(header_name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .unwrap_or_default()
                .trim()
                .to_owned(),
            None => request
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(address)| address.ip().to_string())
                .unwrap_or_default(),
        };
        address.parse().map_err(|_| Rejection::ClientAddress(address))
    }

    /// Take the explicit coordinates from the query, or geolocate the client.
    async fn locate(&self, request: &Parts, client_ip: IpAddr) -> Result<Location, Rejection> {
        let Query(query) = Query::<CoordinatesQuery>::try_from_uri(&request.uri)
            .map_err(|rejection| Rejection::Coordinates(anyhow!("{}", rejection.body_text())))?;
        match (query.latitude, query.longitude) {
            (Some(latitude), Some(longitude)) => Coordinates::try_parse(&latitude, &longitude)
                .map(Location::browser)
                .map_err(Rejection::Coordinates),
            (None, None) => {
                self.geolocator.locate(client_ip).await.map_err(Rejection::Geolocation)
            }
            _ => Err(Rejection::Coordinates(anyhow!("both `lat` and `long` are required"))),
        }
    }

    #[instrument(skip_all, fields(coordinates = %coordinates))]
    async fn fetch_merged(&self, coordinates: Coordinates) -> Result<Merged, Rejection> {
        let today = Local::now().date_naive();
        let (forecast, prices) = tokio::try_join!(
            self.forecaster.get_forecast(coordinates),
            self.price_provider.get_upcoming_prices(today),
        )
        .map_err(Rejection::Upstream)?;
        let n_hours = forecast.len();
        let merged = merge(forecast, &prices);
        if merged.n_matched_prices == 0 && n_hours != 0 && !prices.is_empty() {
            warn!(n_hours, n_prices = prices.len(), "none of the prices matched the forecast hours");
        } else {
            debug!(n_hours, n_prices = prices.len(), merged.n_matched_prices, "merged");
        }
        Ok(merged)
    }
}

fn html_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, render::HTML_CONTENT_TYPE)], body).into_response()
}

#[derive(Deserialize)]
struct CoordinatesQuery {
    #[serde(rename = "lat")]
    latitude: Option<String>,

    #[serde(rename = "long")]
    longitude: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Page {
    /// Navigation page.
    Root,

    Json,
    Html,

    /// Unknown `/wind…` page.
    Empty,
}

impl Page {
    fn from_path(path: &str) -> Self {
        match path {
            "/wind" | "/wind.json" => Self::Json,
            "/wind.html" => Self::Html,
            _ if path.starts_with("/wind") => Self::Empty,
            _ => Self::Root,
        }
    }
}
