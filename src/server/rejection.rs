use std::fmt::{Display, Formatter};

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::prelude::*;

/// Reason the request could not be served.
#[derive(Debug)]
pub enum Rejection {
    MethodNotAllowed,

    /// The client address is missing or is not an IP address.
    ClientAddress(String),

    Coordinates(Error),
    Geolocation(Error),

    /// The forecast or price API has failed.
    Upstream(Error),
}

impl Rejection {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ClientAddress(_) | Self::Coordinates(_) => StatusCode::BAD_REQUEST,
            Self::Geolocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MethodNotAllowed => write!(f, "This method is not allowed"),
            Self::ClientAddress(address) => write!(f, "unable to parse the client IP {address:?}"),
            Self::Coordinates(error) => write!(f, "invalid coordinates: {error:#}"),
            Self::Geolocation(error) => write!(f, "unable to geolocate the client IP: {error:#}"),
            Self::Upstream(error) => write!(f, "{error:#}"),
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), format!("{self}\n")).into_response();
        if matches!(self, Self::MethodNotAllowed) {
            response.headers_mut().insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}
