//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

mod client;
mod config;
mod http;
mod router;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use client::HttpTransport;
use config::Cli;
use dvr_rip::task::spawn_periodic;
use router::Router;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive("dvrd=info".parse().unwrap())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        error!(%error, "fatal configuration error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), config::ConfigError> {
    let neighbors = config::load_neighbors(&cli.file)?;
    let own_network = config::parse_own_network(&cli.network)?;
    let own_address = format!("127.0.0.1:{}", cli.port);

    info!(
        own_address = %own_address,
        own_network = %own_network,
        neighbor_count = neighbors.len(),
        "starting router"
    );

    let router = Arc::new(Router::new(
        own_address.clone(),
        own_network.to_string(),
        neighbors,
        cli.interval,
    ));

    let transport = Arc::new(HttpTransport::new(own_address));

    let advertiser_router = router.clone();
    let advertiser_transport = transport.clone();
    let _advertiser_task = spawn_periodic(Duration::from_secs(cli.interval), move || {
        let router = advertiser_router.clone();
        let transport = advertiser_transport.clone();
        async move {
            router.advertise(transport.as_ref()).await;
        }
    });

    let expiry_router = router.clone();
    let _expiry_task = spawn_periodic(Duration::from_secs(5), move || {
        let router = expiry_router.clone();
        async move {
            router.expire_stale_routes().await;
        }
    });

    let app = http::app(router);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cli.port))
        .await
        .map_err(|source| config::ConfigError::PortBindFailed {
            port: cli.port,
            source,
        })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("http server terminated unexpectedly");

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("shutdown signal received");
}
