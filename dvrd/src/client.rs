//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! The outbound half of the HTTP transport: posts advertisements to
//! neighbors with a bounded timeout, never retrying within a tick.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use dvr_rip::relax::Advertised;
use dvr_rip::transport::{SendError, Transport};
use serde::Serialize;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct UpdateRequest<'a> {
    sender_address: &'a str,
    routing_table: &'a BTreeMap<String, Advertised>,
}

pub struct HttpTransport {
    client: reqwest::Client,
    sender_address: String,
}

impl HttpTransport {
    pub fn new(sender_address: String) -> HttpTransport {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("reqwest client builder never fails with these options");
        HttpTransport {
            client,
            sender_address,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        neighbor: &str,
        projection: &BTreeMap<String, Advertised>,
    ) -> Result<(), SendError> {
        let body = UpdateRequest {
            sender_address: &self.sender_address,
            routing_table: projection,
        };
        let response = self
            .client
            .post(format!("http://{neighbor}/receive_update"))
            .json(&body)
            .send()
            .await
            .map_err(|error| SendError(error.to_string()))?;

        if !response.status().is_success() {
            return Err(SendError(format!(
                "neighbor responded with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
