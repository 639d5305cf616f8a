//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! Outbound view compression: aggregate same-next-hop destinations into a
//! supernet when it is safe to do so. Pure function of a table snapshot; it
//! never mutates state.

use std::collections::BTreeMap;

use tracing::error;

use crate::prefix::{common_prefix_length, mask, Prefix};
use crate::route::Route;

/// Minimum common-prefix length required before two or more destinations
/// sharing a next hop may be folded into one supernet. Below this, the
/// supernet would claim address space well beyond what actually funnels
/// through this next hop.
const SAFETY_FLOOR: u8 = 16;

/// Produces the summarized outbound view of `snapshot`.
///
/// Table keys that do not parse as a CIDR (namely the per-neighbor bootstrap
/// entries seeded at startup, see `crate::table::RoutingTable::init`) cannot
/// participate in prefix aggregation; they are passed through unchanged,
/// exactly as a singleton group would be.
pub fn summarize(own_network: &str, snapshot: &BTreeMap<String, Route>) -> BTreeMap<String, Route> {
    let mut by_next_hop: BTreeMap<&str, Vec<(&str, &Route)>> = BTreeMap::new();
    for (network, route) in snapshot {
        if network == own_network {
            continue;
        }
        by_next_hop
            .entry(route.next_hop.as_str())
            .or_default()
            .push((network.as_str(), route));
    }

    let mut out = BTreeMap::new();
    for (_, group) in by_next_hop {
        if group.len() == 1 {
            let (network, route) = group[0];
            out.insert(network.to_string(), route.clone());
            continue;
        }

        match aggregate(&group) {
            Some((supernet, route)) => {
                out.insert(supernet, route);
            }
            None => {
                for (network, route) in group {
                    out.insert(network.to_string(), route.clone());
                }
            }
        }
    }

    if let Some(route) = snapshot.get(own_network) {
        out.insert(own_network.to_string(), route.clone());
    }

    out
}

/// Attempts to aggregate a multi-route group into a single supernet entry.
/// Returns `None` if aggregation is unsafe or any member's key isn't a
/// parseable CIDR, in which case the caller emits the group unaggregated.
fn aggregate(group: &[(&str, &Route)]) -> Option<(String, Route)> {
    let mut prefixes = Vec::with_capacity(group.len());
    for (network, _) in group {
        match Prefix::parse(network) {
            Ok(prefix) => prefixes.push(prefix),
            Err(err) => {
                error!(network, %err, "skipping unparseable table key during summarization");
                return None;
            }
        }
    }

    let min = prefixes.iter().map(Prefix::addr_u32).min().unwrap();
    let max = prefixes.iter().map(Prefix::addr_u32).max().unwrap();
    let common_len = common_prefix_length(min, max);
    if common_len < SAFETY_FLOOR {
        return None;
    }

    let supernet = Prefix::canonicalize(min & mask(common_len), common_len);
    if prefixes.iter().any(|p| !supernet.covers(p)) {
        return None;
    }
    let cost = group.iter().map(|(_, route)| route.cost).max().unwrap();
    let next_hop = group[0].1.next_hop.clone();
    Some((supernet.to_string(), Route::new(cost, next_hop)))
}
