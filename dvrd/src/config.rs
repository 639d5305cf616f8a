//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! Startup configuration: the command-line surface and the neighbor CSV
//! reader. Every failure in this module is fatal, descriptive, and reported
//! before `main` exits with a non-zero status -- nothing here ever panics.

use std::path::{Path, PathBuf};

use clap::Parser;
use dvr_rip::error::NeighborConfigError;
use dvr_rip::prefix::Prefix;
use dvr_rip::route::Cost;
use dvr_rip::table::NeighborConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "dvrd", about = "A distance-vector routing daemon")]
pub struct Cli {
    /// TCP port to listen on.
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Path to the neighbor CSV file (header `vizinho,custo`).
    #[arg(short, long)]
    pub file: PathBuf,

    /// This node's served CIDR, e.g. 10.0.0.0/24.
    #[arg(long)]
    pub network: String,

    /// Advertiser period, in seconds.
    #[arg(long, default_value_t = 5)]
    pub interval: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read neighbor file {path}: {source}")]
    NeighborFileUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed neighbor row in {path}: {source}")]
    NeighborRowMalformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid neighbor cost in {path}: {source}")]
    NeighborCostInvalid {
        path: PathBuf,
        #[source]
        source: NeighborConfigError,
    },
    #[error("malformed served network {network:?}: {source}")]
    NetworkMalformed {
        network: String,
        #[source]
        source: dvr_rip::error::PrefixError,
    },
    #[error("failed to bind port {port}: {source}")]
    PortBindFailed {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct NeighborRow {
    vizinho: String,
    custo: u32,
}

/// Reads the neighbor CSV at `path` into a [`NeighborConfig`].
///
/// The header must name its columns `vizinho,custo`; each row gives a
/// `host:port` address and its edge cost. A later row for an address already
/// seen replaces the earlier one (last wins).
pub fn load_neighbors(path: &Path) -> Result<NeighborConfig, ConfigError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|source| ConfigError::NeighborFileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let mut neighbors = NeighborConfig::new();
    for result in reader.deserialize() {
        let row: NeighborRow = result.map_err(|source| ConfigError::NeighborRowMalformed {
            path: path.to_path_buf(),
            source,
        })?;
        neighbors
            .insert(row.vizinho, Cost::new(row.custo))
            .map_err(|source| ConfigError::NeighborCostInvalid {
                path: path.to_path_buf(),
                source,
            })?;
    }
    Ok(neighbors)
}

/// Validates and canonicalizes the `--network` flag.
pub fn parse_own_network(network: &str) -> Result<Prefix, ConfigError> {
    Prefix::parse(network).map_err(|source| ConfigError::NetworkMalformed {
        network: network.to_string(),
        source,
    })
}
