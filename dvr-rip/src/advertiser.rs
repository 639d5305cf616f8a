//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! The periodic advertiser: summarizes the table once per tick and pushes a
//! split-horizon projection of it to every configured neighbor.

use std::collections::BTreeMap;

use tracing::warn;

use crate::debug::Debug;
use crate::relax::Advertised;
use crate::summarize::summarize;
use crate::table::{NeighborConfig, RoutingTable};
use crate::transport::Transport;

/// Builds `summarized`'s view as seen by neighbor `n`: every entry whose
/// next hop is `n` is dropped, since advertising a route back to the peer
/// that is the reason it exists would only ever create or prolong a loop.
fn project_for(n: &str, summarized: &BTreeMap<String, crate::route::Route>) -> BTreeMap<String, Advertised> {
    summarized
        .iter()
        .filter(|(_, route)| route.next_hop != n)
        .map(|(network, route)| {
            (
                network.clone(),
                Advertised {
                    cost: route.cost,
                    next_hop: route.next_hop.clone(),
                },
            )
        })
        .collect()
}

/// How many of a tick's sends landed, for the ambient statistics block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AdvertiseReport {
    pub sent: usize,
    pub failed: usize,
}

/// One advertiser tick: summarize `table`, then send a per-neighbor
/// split-horizon projection to every configured neighbor via `transport`.
///
/// A neighbor that fails to receive its update is logged and skipped; it is
/// never retried within the same tick, and a failure here never aborts the
/// loop for the remaining neighbors.
pub async fn advertise(
    table: &RoutingTable,
    neighbors: &NeighborConfig,
    transport: &dyn Transport,
) -> AdvertiseReport {
    Debug::AdvertiserTick {
        neighbor_count: neighbors.len(),
    }
    .log();

    let snapshot = table.snapshot();
    let summarized = summarize(table.own_network(), &snapshot);

    let mut report = AdvertiseReport::default();
    for (addr, _) in neighbors.iter() {
        let projection = project_for(addr, &summarized);
        match transport.send(addr, &projection).await {
            Ok(()) => report.sent += 1,
            Err(error) => {
                warn!(neighbor = addr, %error, "failed to send advertisement");
                report.failed += 1;
            }
        }
    }
    report
}
