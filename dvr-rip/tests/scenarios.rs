//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! End-to-end scenarios exercising the full engine wiring (table + relax +
//! summarize + advertiser + expiry) without a real network, via an in-memory
//! loopback transport that delivers a projection straight into the
//! recipient's table.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dvr_rip::relax::{self, Advertised};
use dvr_rip::route::{Cost, INFINITY};
use dvr_rip::table::{NeighborConfig, RoutingTable};
use dvr_rip::transport::{SendError, Transport};
use dvr_rip::{advertiser, expiry};
use tokio::sync::Mutex;

struct Node {
    address: String,
    neighbors: NeighborConfig,
    table: Mutex<RoutingTable>,
}

/// Delivers a projection directly into the target node's table, standing in
/// for an HTTP POST to `/receive_update`.
struct Loopback {
    nodes: Vec<Arc<Node>>,
    sender_address: String,
}

#[async_trait]
impl Transport for Loopback {
    async fn send(
        &self,
        neighbor: &str,
        projection: &BTreeMap<String, Advertised>,
    ) -> Result<(), SendError> {
        let target = self
            .nodes
            .iter()
            .find(|n| n.address == neighbor)
            .ok_or_else(|| SendError(format!("no such node {neighbor}")))?;
        let mut table = target.table.lock().await;
        relax::ingest(&mut table, &target.neighbors, &self.sender_address, projection);
        Ok(())
    }
}

fn two_node_network() -> (Arc<Node>, Arc<Node>) {
    let mut neighbors_a = NeighborConfig::new();
    neighbors_a.insert("127.0.0.1:5001", Cost::new(1)).unwrap();
    let mut neighbors_b = NeighborConfig::new();
    neighbors_b.insert("127.0.0.1:5000", Cost::new(1)).unwrap();

    let a = Arc::new(Node {
        address: "127.0.0.1:5000".to_string(),
        table: Mutex::new(RoutingTable::init(
            "127.0.0.1:5000",
            "10.0.0.0/24",
            &neighbors_a,
        )),
        neighbors: neighbors_a,
    });
    let b = Arc::new(Node {
        address: "127.0.0.1:5001".to_string(),
        table: Mutex::new(RoutingTable::init(
            "127.0.0.1:5001",
            "10.0.1.0/24",
            &neighbors_b,
        )),
        neighbors: neighbors_b,
    });
    (a, b)
}

async fn tick(a: &Arc<Node>, b: &Arc<Node>) {
    let transport_from_a = Loopback {
        nodes: vec![a.clone(), b.clone()],
        sender_address: a.address.clone(),
    };
    let transport_from_b = Loopback {
        nodes: vec![a.clone(), b.clone()],
        sender_address: b.address.clone(),
    };
    let table_a = a.table.lock().await;
    advertiser::advertise(&table_a, &a.neighbors, &transport_from_a).await;
    drop(table_a);
    let table_b = b.table.lock().await;
    advertiser::advertise(&table_b, &b.neighbors, &transport_from_b).await;
    drop(table_b);
}

#[tokio::test]
async fn s1_two_node_bootstrap_converges_after_one_period() {
    let (a, b) = two_node_network();

    tick(&a, &b).await;

    let a_table = a.table.lock().await;
    let route = a_table.get("10.0.1.0/24").unwrap();
    assert_eq!(route.cost, Cost::new(2));
    assert_eq!(route.next_hop, "127.0.0.1:5001");
    drop(a_table);

    let b_table = b.table.lock().await;
    let route = b_table.get("10.0.0.0/24").unwrap();
    assert_eq!(route.cost, Cost::new(2));
    assert_eq!(route.next_hop, "127.0.0.1:5000");
}

#[tokio::test]
async fn s2_split_horizon_never_advertises_a_route_back_to_its_source() {
    let (a, b) = two_node_network();
    tick(&a, &b).await;

    // A second tick would poison B if A echoed back 10.0.1.0/24 (learned via
    // B) in its advertisement to B; split horizon in `advertiser::advertise`
    // prevents that, so B's route stays stable and does not count to
    // infinity.
    tick(&a, &b).await;

    let b_table = b.table.lock().await;
    let route = b_table.get("10.0.0.0/24").unwrap();
    assert_eq!(route.cost, Cost::new(2));
    assert!(!route.cost.is_infinite());
}

#[tokio::test]
async fn s4_expiry_then_advertiser_propagates_infinity() {
    let (a, b) = two_node_network();
    tick(&a, &b).await;

    // Simulate B going silent: force A's route to 10.0.1.0/24 stale enough
    // to expire, bypassing the real 90s wait.
    {
        let mut table_a = a.table.lock().await;
        let mut route = table_a.get("10.0.1.0/24").unwrap();
        route.last_update = chrono::Utc::now() - chrono::Duration::seconds(91);
        table_a.upsert("10.0.1.0/24", route);
    }

    {
        let mut table_a = a.table.lock().await;
        expiry::scan(&mut table_a, chrono::Duration::seconds(90));
    }

    let table_a = a.table.lock().await;
    assert_eq!(table_a.get("10.0.1.0/24").unwrap().cost, INFINITY);
}

#[tokio::test]
async fn s7_advertisement_from_unknown_sender_is_ignored() {
    let (a, _b) = two_node_network();
    let mut advertised = BTreeMap::new();
    advertised.insert(
        "192.168.0.0/24".to_string(),
        Advertised {
            cost: Cost::new(1),
            next_hop: "10.9.9.9:1234".to_string(),
        },
    );

    let mut table_a = a.table.lock().await;
    let outcome = relax::ingest(&mut table_a, &a.neighbors, "10.9.9.9:1234", &advertised);
    assert_eq!(outcome, relax::Outcome::Ignored);
    assert!(!table_a.contains("192.168.0.0/24"));
}
