mod api;
mod cli;
mod core;
mod prelude;
mod render;
mod server;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::{Parser, crate_version};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    api::{client::Client, elpris, geolocation, open_meteo},
    cli::Args,
    prelude::*,
    server::AppState,
};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    let args = Args::parse();
    info!(
        version = crate_version!(),
        service_version = args.service_version.as_deref().unwrap_or("unknown"),
        args.bind_address,
        "starting…",
    );

    let request_timeout: Duration = args.request_timeout.into();
    let response_timeout: Duration = args.response_timeout.into();
    if response_timeout <= 3 * request_timeout {
        warn!(?response_timeout, ?request_timeout, "upstream failures may time out the response");
    }

    let client = Arc::new(Client::try_new(request_timeout, args.cache_capacity)?);
    let state = AppState::builder()
        .forecaster(Box::new(
            open_meteo::Api::builder()
                .client(Arc::clone(&client))
                .timezone(args.forecast.timezone)
                .ttl(args.forecast.ttl.into())
                .build(),
        ))
        .price_provider(Box::new(
            elpris::Api::builder()
                .client(Arc::clone(&client))
                .region(args.price.region)
                .ttl(args.price.ttl.into())
                .build(),
        ))
        .geolocator(Box::new(
            geolocation::Api::builder()
                .client(client)
                .base_url(args.geolocation.base_url)
                .ttl(args.geolocation.ttl.into())
                .build(),
        ))
        .maybe_client_ip_header(args.client_ip_header)
        .build();

    let listener =
        TcpListener::bind(&args.bind_address).await.context("failed to bind to the address")?;
    let app = server::router(state)
        .layer((TraceLayer::new_for_http(), TimeoutLayer::new(response_timeout)));

    info!("serving…");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("done!");
    Ok(())
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {error:#}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!("failed to install the signal handler: {error:#}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
