//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::{debug, info};

use crate::route::Cost;

/// Centralizes the text and level of every lifecycle log message the engine
/// emits, so call sites stay a one-line `Debug::Foo(..).log()` and the
/// wording can't drift between them.
#[derive(Debug)]
pub enum Debug<'a> {
    RouteLearned(&'a str, Cost, &'a str),
    RouteBetterPath(&'a str, Cost, &'a str),
    RouteRevised(&'a str, Cost, &'a str),
    RouteExpired(&'a str),
    AdvertisementIgnored(&'a str),
    AdvertiserTick { neighbor_count: usize },
    ExpiryTick,
}

impl<'a> Debug<'a> {
    pub fn log(&self) {
        match self {
            Debug::RouteLearned(network, cost, via) => {
                info!(network, %cost, via, "learned new route");
            }
            Debug::RouteBetterPath(network, cost, via) => {
                info!(network, %cost, via, "found strictly better route");
            }
            Debug::RouteRevised(network, cost, via) => {
                info!(network, %cost, via, "revised incumbent route");
            }
            Debug::RouteExpired(network) => {
                info!(network, "route expired, cost set to infinity");
            }
            Debug::AdvertisementIgnored(sender) => {
                info!(sender, "ignoring advertisement from unconfigured neighbor");
            }
            Debug::AdvertiserTick { neighbor_count } => {
                debug!(neighbor_count, "advertiser tick");
            }
            Debug::ExpiryTick => {
                debug!("expiry scanner tick");
            }
        }
    }
}
