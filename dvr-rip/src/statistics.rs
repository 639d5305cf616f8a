//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! Ambient, non-authoritative counters surfaced over `/routes`. Never read
//! by the engine itself; a pure observability side channel.

use serde::{Deserialize, Serialize};

use crate::advertiser::AdvertiseReport;
use crate::relax::Outcome;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub advertisements_received: u64,
    pub advertisements_ignored: u64,
    pub advertisements_applied: u64,
    pub advertisements_sent: u64,
    pub advertisements_failed: u64,
    pub routes_expired: u64,
}

impl Statistics {
    pub fn new() -> Statistics {
        Statistics::default()
    }

    pub fn record_ingest(&mut self, outcome: Outcome) {
        self.advertisements_received += 1;
        match outcome {
            Outcome::Ignored => self.advertisements_ignored += 1,
            Outcome::Applied { .. } => self.advertisements_applied += 1,
        }
    }

    pub fn record_advertise(&mut self, report: AdvertiseReport) {
        self.advertisements_sent += report.sent as u64;
        self.advertisements_failed += report.failed as u64;
    }

    pub fn record_expiry(&mut self, expired_count: u64) {
        self.routes_expired += expired_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ingest_tallies_by_outcome() {
        let mut stats = Statistics::new();
        stats.record_ingest(Outcome::Ignored);
        stats.record_ingest(Outcome::Applied { changed: true });
        stats.record_ingest(Outcome::Applied { changed: false });
        assert_eq!(stats.advertisements_received, 3);
        assert_eq!(stats.advertisements_ignored, 1);
        assert_eq!(stats.advertisements_applied, 2);
    }

    #[test]
    fn record_advertise_accumulates_across_ticks() {
        let mut stats = Statistics::new();
        stats.record_advertise(AdvertiseReport { sent: 2, failed: 1 });
        stats.record_advertise(AdvertiseReport { sent: 3, failed: 0 });
        assert_eq!(stats.advertisements_sent, 5);
        assert_eq!(stats.advertisements_failed, 1);
    }
}
