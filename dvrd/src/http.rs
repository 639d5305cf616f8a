//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! The inbound half of the HTTP transport plus the introspection endpoint.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use dvr_rip::relax::{Advertised, Outcome};
use dvr_rip::route::{Cost, Route};
use dvr_rip::statistics::Statistics;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::router::SharedRouter;

#[derive(Deserialize)]
struct UpdateRequest {
    sender_address: String,
    routing_table: BTreeMap<String, Advertised>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct RoutesResponse {
    my_address: String,
    my_network: String,
    update_interval: u64,
    vizinhos: BTreeMap<String, Cost>,
    routing_table: BTreeMap<String, Route>,
    statistics: Statistics,
}

pub fn app(router: SharedRouter) -> axum::Router {
    axum::Router::new()
        .route("/receive_update", post(receive_update))
        .route("/routes", get(routes))
        .layer(TraceLayer::new_for_http())
        .with_state(router)
}

async fn receive_update(
    State(router): State<SharedRouter>,
    body: Bytes,
) -> impl IntoResponse {
    let request: UpdateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: error.to_string(),
                }),
            )
                .into_response();
        }
    };

    let outcome = router
        .ingest(&request.sender_address, &request.routing_table)
        .await;
    let status = match outcome {
        Outcome::Ignored => "ignored",
        Outcome::Applied { .. } => "success",
    };
    (StatusCode::OK, Json(StatusResponse { status })).into_response()
}

async fn routes(State(router): State<SharedRouter>) -> impl IntoResponse {
    let vizinhos = router.neighbors().iter().map(|(addr, cost)| (addr.to_string(), cost)).collect();
    let response = RoutesResponse {
        my_address: router.own_address.clone(),
        my_network: router.own_network().await,
        update_interval: router.update_interval,
        vizinhos,
        routing_table: router.snapshot().await,
        statistics: router.statistics().await,
    };
    Json(response)
}
