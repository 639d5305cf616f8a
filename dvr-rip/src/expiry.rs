//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! The staleness scanner: demotes routes that haven't been refreshed within
//! `route_timeout` to `INFINITY`.

use chrono::Utc;

use crate::debug::Debug;
use crate::route::INFINITY;
use crate::table::RoutingTable;

/// One pass over `table`: any non-own-network entry whose `last_update` is
/// older than `route_timeout` and whose cost isn't already `INFINITY` is
/// demoted. `last_update` is deliberately left untouched, so the entry stays
/// in its unreachable state until a fresh advertisement arrives.
///
/// Returns how many entries were demoted this pass, for the statistics block.
pub fn scan(table: &mut RoutingTable, route_timeout: chrono::Duration) -> u64 {
    Debug::ExpiryTick.log();

    let own_network = table.own_network().to_string();
    let now = Utc::now();
    let stale: Vec<String> = table
        .iter()
        .filter(|(network, route)| {
            *network != own_network
                && !route.cost.is_infinite()
                && now - route.last_update > route_timeout
        })
        .map(|(network, _)| network.to_string())
        .collect();

    let count = stale.len() as u64;
    for network in stale {
        table.set_cost(&network, INFINITY);
        Debug::RouteExpired(&network).log();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Cost, Route};
    use crate::table::NeighborConfig;

    fn table_with_stale_route() -> RoutingTable {
        let mut neighbors = NeighborConfig::new();
        neighbors.insert("127.0.0.1:5001", Cost::new(1)).unwrap();
        let mut table = RoutingTable::init("127.0.0.1:5000", "10.0.0.0/24", &neighbors);

        let mut stale_route = Route::new(Cost::new(2), "127.0.0.1:5001");
        stale_route.last_update = Utc::now() - chrono::Duration::seconds(91);
        table.upsert("10.0.1.0/24", stale_route);
        table
    }

    #[test]
    fn s4_expiry_demotes_stale_route_to_infinity() {
        let mut table = table_with_stale_route();
        scan(&mut table, chrono::Duration::seconds(90));
        assert_eq!(table.get("10.0.1.0/24").unwrap().cost, INFINITY);
    }

    #[test]
    fn fresh_routes_are_left_alone() {
        let mut neighbors = NeighborConfig::new();
        neighbors.insert("127.0.0.1:5001", Cost::new(1)).unwrap();
        let mut table = RoutingTable::init("127.0.0.1:5000", "10.0.0.0/24", &neighbors);
        table.upsert("10.0.1.0/24", Route::new(Cost::new(2), "127.0.0.1:5001"));

        scan(&mut table, chrono::Duration::seconds(90));
        assert_eq!(table.get("10.0.1.0/24").unwrap().cost, Cost::new(2));
    }

    #[test]
    fn own_network_never_expires() {
        let mut table = table_with_stale_route();
        // Force the own-network last_update far into the past to prove it's
        // still skipped; upsert on own network is a no-op so we can't stage
        // this through the public API -- the invariant is enforced purely
        // by `scan` filtering the own-network key out.
        scan(&mut table, chrono::Duration::seconds(0));
        assert_eq!(table.get("10.0.0.0/24").unwrap().cost, Cost::new(0));
    }

    #[test]
    fn does_not_refresh_last_update_on_expiry() {
        let mut table = table_with_stale_route();
        let before = table.get("10.0.1.0/24").unwrap().last_update;
        scan(&mut table, chrono::Duration::seconds(90));
        let after = table.get("10.0.1.0/24").unwrap().last_update;
        assert_eq!(before, after);
    }
}
