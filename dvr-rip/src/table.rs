//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;

use crate::error::NeighborConfigError;
use crate::route::{Cost, Route};

/// The immutable (post-startup) neighbor list: address -> configured edge cost.
#[derive(Clone, Debug, Default)]
pub struct NeighborConfig(BTreeMap<String, Cost>);

impl NeighborConfig {
    pub fn new() -> NeighborConfig {
        NeighborConfig(BTreeMap::new())
    }

    /// Inserts or replaces the cost for `addr`. Per the neighbor CSV reader's
    /// "last wins" policy, a later insert for the same address silently
    /// replaces an earlier one.
    pub fn insert(
        &mut self,
        addr: impl Into<String>,
        cost: Cost,
    ) -> Result<(), NeighborConfigError> {
        if cost.value() == 0 || cost.is_infinite() {
            return Err(NeighborConfigError::CostOutOfRange(cost));
        }
        self.0.insert(addr.into(), cost);
        Ok(())
    }

    pub fn contains(&self, addr: &str) -> bool {
        self.0.contains_key(addr)
    }

    pub fn cost(&self, addr: &str) -> Option<Cost> {
        self.0.get(addr).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Cost)> {
        self.0.iter().map(|(addr, cost)| (addr.as_str(), *cost))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The in-memory `network -> route` mapping.
///
/// Table keys are, in the common case, canonical IPv4 CIDR strings (see
/// `crate::prefix`). The entries seeded at startup for each configured
/// neighbor (see `init`) are the one deliberate exception: they are keyed by
/// the neighbor's own `host:port` address, exactly mirroring the reference
/// implementation, because a neighbor's address is not itself a network
/// identifier until the neighbor advertises one. Code that needs prefix
/// arithmetic over a key (the summarizer, mainly) must treat a key that
/// fails to parse as a CIDR as an opaque, unaggregatable entry rather than
/// erroring out -- see `crate::summarize`.
///
/// `RoutingTable` itself holds no lock: the single-writer discipline required
/// by the concurrency model is layered on top by whoever owns the table (see
/// `dvrd::router::Router`), so this type stays a plain, independently
/// testable value.
#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    own_network: String,
    routes: BTreeMap<String, Route>,
}

impl RoutingTable {
    /// Seeds the table with the self-route for `own_network` plus one route
    /// per configured neighbor, per the lifecycle rules in the data model.
    pub fn init(
        own_address: &str,
        own_network: impl Into<String>,
        neighbors: &NeighborConfig,
    ) -> RoutingTable {
        let own_network = own_network.into();
        let mut routes = BTreeMap::new();
        routes.insert(own_network.clone(), Route::new(Cost::new(0), own_address));
        for (addr, cost) in neighbors.iter() {
            routes.insert(addr.to_string(), Route::new(cost, addr));
        }
        RoutingTable {
            own_network,
            routes,
        }
    }

    pub fn own_network(&self) -> &str {
        &self.own_network
    }

    pub fn get(&self, network: &str) -> Option<Route> {
        self.routes.get(network).cloned()
    }

    /// A deep copy of the entire table.
    pub fn snapshot(&self) -> BTreeMap<String, Route> {
        self.routes.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(net, route)| (net.as_str(), route))
    }

    /// Assigns `route` to `network`, clamping its cost to `INFINITY` per
    /// invariant 4. The self-route is never touched (invariant 2).
    pub fn upsert(&mut self, network: impl Into<String>, mut route: Route) {
        let network = network.into();
        if network == self.own_network {
            return;
        }
        route.cost = Cost::new(route.cost.value() as u32);
        self.routes.insert(network, route);
    }

    /// Sets `network`'s cost without refreshing `last_update` -- used by the
    /// expiry scanner, which deliberately leaves the timestamp stale so the
    /// route stays in its unreachable state until a new advertisement
    /// arrives.
    pub fn set_cost(&mut self, network: &str, cost: Cost) {
        if network == self.own_network {
            return;
        }
        if let Some(route) = self.routes.get_mut(network) {
            route.cost = cost;
        }
    }

    /// Refreshes `last_update` to now, used by the relaxation engine whenever
    /// it applies a change to an entry.
    pub fn touch(&mut self, network: &str) {
        if network == self.own_network {
            return;
        }
        if let Some(route) = self.routes.get_mut(network) {
            route.touch();
        }
    }

    pub fn contains(&self, network: &str) -> bool {
        self.routes.contains_key(network)
    }
}
