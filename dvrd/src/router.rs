//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! The single router instance shared by the HTTP transport and the periodic
//! tasks. Owns the one lock the whole process contends on.

use std::collections::BTreeMap;
use std::sync::Arc;

use dvr_rip::advertiser::{self, AdvertiseReport};
use dvr_rip::expiry;
use dvr_rip::relax::{self, Advertised, Outcome};
use dvr_rip::route::Route;
use dvr_rip::statistics::Statistics;
use dvr_rip::table::{NeighborConfig, RoutingTable};
use dvr_rip::transport::Transport;
use tokio::sync::Mutex;

/// Route timeout used by the expiry scanner, fixed per the wire protocol.
pub const ROUTE_TIMEOUT: chrono::Duration = chrono::Duration::seconds(90);

pub struct Router {
    pub own_address: String,
    pub update_interval: u64,
    neighbors: NeighborConfig,
    table: Mutex<RoutingTable>,
    statistics: Mutex<Statistics>,
}

impl Router {
    pub fn new(
        own_address: String,
        own_network: String,
        neighbors: NeighborConfig,
        update_interval: u64,
    ) -> Router {
        let table = RoutingTable::init(&own_address, own_network, &neighbors);
        Router {
            own_address,
            update_interval,
            neighbors,
            table: Mutex::new(table),
            statistics: Mutex::new(Statistics::new()),
        }
    }

    pub fn neighbors(&self) -> &NeighborConfig {
        &self.neighbors
    }

    /// Applies an inbound advertisement from `sender`. The lock is held only
    /// for the duration of the in-memory relaxation; no I/O happens here.
    pub async fn ingest(
        &self,
        sender: &str,
        advertised: &BTreeMap<String, Advertised>,
    ) -> Outcome {
        let outcome = {
            let mut table = self.table.lock().await;
            relax::ingest(&mut table, &self.neighbors, sender, advertised)
        };
        self.statistics.lock().await.record_ingest(outcome);
        outcome
    }

    /// One advertiser tick: snapshot + summarize under the lock, then send
    /// outside of it via `transport`.
    pub async fn advertise(&self, transport: &dyn Transport) -> AdvertiseReport {
        let report = {
            let table = self.table.lock().await;
            advertiser::advertise(&table, &self.neighbors, transport).await
        };
        self.statistics.lock().await.record_advertise(report);
        report
    }

    /// One expiry scan.
    pub async fn expire_stale_routes(&self) -> u64 {
        let expired = {
            let mut table = self.table.lock().await;
            expiry::scan(&mut table, ROUTE_TIMEOUT)
        };
        self.statistics.lock().await.record_expiry(expired);
        expired
    }

    /// A deep copy of the table, for the introspection endpoint.
    pub async fn snapshot(&self) -> BTreeMap<String, Route> {
        self.table.lock().await.snapshot()
    }

    pub async fn own_network(&self) -> String {
        self.table.lock().await.own_network().to_string()
    }

    pub async fn statistics(&self) -> Statistics {
        *self.statistics.lock().await
    }
}

pub type SharedRouter = Arc<Router>;
