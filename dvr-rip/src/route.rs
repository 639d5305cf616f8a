//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The classic distance-vector unreachable marker (RIP's historical value).
pub const INFINITY: Cost = Cost(16);

/// A route cost, always clamped to `[0, INFINITY]` on construction.
///
/// Keeping the clamp inside the constructor (rather than scattered across
/// call sites) is what makes invariant 4 ("cost >= INFINITY is stored as
/// exactly INFINITY") impossible to violate by accident.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cost(u8);

impl Cost {
    pub fn new(value: u32) -> Cost {
        Cost(value.min(INFINITY.0 as u32) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_infinite(&self) -> bool {
        *self >= INFINITY
    }

    /// `self + other`, saturating (clamping) at `INFINITY`.
    pub fn saturating_add(self, other: Cost) -> Cost {
        Cost::new(self.0 as u32 + other.0 as u32)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single routing table entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub cost: Cost,
    pub next_hop: String,
    pub last_update: DateTime<Utc>,
}

impl Route {
    pub fn new(cost: Cost, next_hop: impl Into<String>) -> Route {
        Route {
            cost,
            next_hop: next_hop.into(),
            last_update: Utc::now(),
        }
    }

    /// Whether this route's next hop matches `addr`, i.e. it was learned
    /// (directly or transitively) through that neighbor.
    pub fn is_via(&self, addr: &str) -> bool {
        self.next_hop == addr
    }

    pub(crate) fn touch(&mut self) {
        self.last_update = Utc::now();
    }
}
