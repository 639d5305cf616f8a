//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! The Bellman-Ford relaxation step: applying one neighbor's advertisement to
//! the local routing table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::debug::Debug;
use crate::route::{Cost, Route};
use crate::table::{NeighborConfig, RoutingTable};

/// One entry of an inbound advertisement, as carried over the wire.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Advertised {
    pub cost: Cost,
    pub next_hop: String,
}

/// The outcome of ingesting an advertisement, used by the transport adapter
/// to pick an HTTP status and by the observability layer to count outcomes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// `sender` is not a configured neighbor; nothing was applied.
    Ignored,
    /// `sender` is a configured neighbor; `changed` reports whether any
    /// table entry was actually created or modified.
    Applied { changed: bool },
}

/// Applies an advertisement received from `sender` to `table`.
///
/// This is the sole mutator that knows about the wire-level advertisement
/// shape; the table itself (`RoutingTable::upsert` et al.) knows nothing
/// about where a given call originates.
pub fn ingest(
    table: &mut RoutingTable,
    neighbors: &NeighborConfig,
    sender: &str,
    advertised: &BTreeMap<String, Advertised>,
) -> Outcome {
    let Some(edge_cost) = neighbors.cost(sender) else {
        Debug::AdvertisementIgnored(sender).log();
        return Outcome::Ignored;
    };

    let own_network = table.own_network().to_string();
    let mut changed = false;

    for (network, adv) in advertised {
        if *network == own_network {
            continue;
        }

        let candidate_cost = edge_cost.saturating_add(adv.cost);
        match table.get(network) {
            None => {
                // Case A: unknown network. Never materialize a route that
                // was never reachable.
                if !candidate_cost.is_infinite() {
                    table.upsert(network.clone(), Route::new(candidate_cost, sender));
                    Debug::RouteLearned(network, candidate_cost, sender).log();
                    changed = true;
                }
            }
            Some(current) => {
                if candidate_cost < current.cost {
                    // Case B: strictly better path, possibly via a new next hop.
                    table.upsert(network.clone(), Route::new(candidate_cost, sender));
                    Debug::RouteBetterPath(network, candidate_cost, sender).log();
                    changed = true;
                } else if current.is_via(sender) && candidate_cost != current.cost {
                    // Case C: the incumbent next hop has revised its cost,
                    // for better or for worse (including poisoning to
                    // INFINITY). Keep the next hop, update the cost.
                    table.set_cost(network, candidate_cost);
                    table.touch(network);
                    Debug::RouteRevised(network, candidate_cost, sender).log();
                    changed = true;
                }
                // Equal cost via a different next hop: the incumbent is
                // retained (tie-breaking towards stability).
            }
        }
    }

    Outcome::Applied { changed }
}
