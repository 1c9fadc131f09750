// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Control-plane paths used by the replication endpoints
pub mod paths {
    /// Prefix shared by every replication endpoint
    pub const REPLICATION_BASE: &str = "/sys/replication/";
    /// API version prefix prepended to logical paths on the wire
    pub const API_PREFIX: &str = "/v1";
    /// Unauthenticated health endpoint, already version-prefixed
    pub const HEALTH: &str = "/v1/sys/health";
}

/// Query parameters that let standby nodes answer health requests
pub const HEALTH_QUERY: [(&str, &str); 2] = [("standbyok", "true"), ("perfstandbyok", "true")];

/// HTTP headers understood by the control plane
pub mod headers {
    pub const TOKEN: &str = "X-Vault-Token";
    pub const NAMESPACE: &str = "X-Vault-Namespace";
}

/// Convergence polling defaults
pub mod poll {
    /// Health requests issued before giving up
    pub const MAX_ATTEMPTS: u32 = 10;
    /// Constant delay between two health requests, in seconds
    pub const INTERVAL_SECS: u64 = 1;
}

/// Environment variables read by [`crate::config::Config`]
pub mod env {
    pub const VAULT_ADDR: &str = "VAULT_ADDR";
    pub const VAULT_TOKEN: &str = "VAULT_TOKEN";
    pub const VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
    pub const REPLICATION_TYPE: &str = "REPLICATION_TYPE";
    pub const REPLICATION_WAIT_FOR: &str = "REPLICATION_WAIT_FOR";
    pub const POLL_ATTEMPTS: &str = "REPLICATION_POLL_ATTEMPTS";
    pub const POLL_INTERVAL_SECS: &str = "REPLICATION_POLL_INTERVAL_SECS";
    pub const POLL_DEADLINE_SECS: &str = "REPLICATION_POLL_DEADLINE_SECS";
}
