// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Observed replication records produced from status responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A secondary cluster as reported by its primary
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SecondaryInfo {
    #[serde(default)]
    pub api_address: String,
    #[serde(default)]
    pub cluster_address: String,
    #[serde(default)]
    pub connection_status: String,
    #[serde(default)]
    pub last_heartbeat: String,
    #[serde(default)]
    pub node_id: String,
}

/// A primary cluster as reported by one of its secondaries
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimaryInfo {
    #[serde(default)]
    pub api_address: String,
    #[serde(default)]
    pub cluster_address: String,
    #[serde(default)]
    pub connection_status: String,
    #[serde(default)]
    pub last_heartbeat: String,
}

/// Observed state of a cluster acting as primary.
///
/// `known_secondaries` (discovered node identifiers) and `secondaries`
/// (configured secondary records) are independent sets; neither is assumed
/// to contain the other.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimaryStatus {
    pub primary_cluster_addr: String,
    pub cluster_id: String,
    pub mode: String,
    pub state: String,
    pub known_secondaries: BTreeSet<String>,
    pub secondaries: Vec<SecondaryInfo>,
}

/// Observed state of a cluster acting as secondary
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SecondaryStatus {
    pub primary_cluster_addr: String,
    pub cluster_id: String,
    pub mode: String,
    pub state: String,
    pub known_primary_cluster_addrs: BTreeSet<String>,
    pub primaries: Vec<PrimaryInfo>,
}

/// A projected record together with the decision to drop it from local state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection<R> {
    pub record: R,
    /// True exactly when the observed mode is `disabled`
    pub should_purge: bool,
}
