//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! The seam between the engine and the outside world: everything the
//! advertiser needs to hand a projection to a neighbor, without knowing
//! anything about HTTP, sockets, or serialization.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::relax::Advertised;

/// Why a send to a neighbor failed. The advertiser never treats this as
/// fatal: a failed send is logged and counted, and the loop moves on to the
/// next neighbor and the next tick.
#[derive(Debug)]
pub struct SendError(pub String);

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SendError {}

/// Delivers an advertisement to a single neighbor.
///
/// The engine only ever needs to push a pre-built projection to an address;
/// the concrete wire format (JSON over HTTP, for this daemon) lives entirely
/// on the implementing side in the binary crate.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        neighbor: &str,
        projection: &BTreeMap<String, Advertised>,
    ) -> Result<(), SendError>;
}
