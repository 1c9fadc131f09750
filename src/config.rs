// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::env as vars;
use crate::replication::poller::{Backoff, PollerConfig};
use crate::types::{ReplicationType, TargetState};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    /// Base address of the cluster's API, e.g. `https://vault.example.com:8200`
    pub vault_addr: Url,
    pub token: String,
    pub namespace: Option<String>,
    pub replication_type: ReplicationType,
    /// State to wait for before reporting status
    pub wait_for: Option<TargetState>,
    pub poller: PollerConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("vault_addr", &self.vault_addr.as_str())
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("replication_type", &self.replication_type)
            .field("wait_for", &self.wait_for)
            .field("poller", &self.poller)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup(vars::VAULT_ADDR)
            .with_context(|| format!("{} environment variable not set", vars::VAULT_ADDR))?;
        let vault_addr = Url::parse(&addr).with_context(|| format!("invalid {}", vars::VAULT_ADDR))?;

        let token = lookup(vars::VAULT_TOKEN)
            .with_context(|| format!("{} environment variable not set", vars::VAULT_TOKEN))?;

        let namespace = lookup(vars::VAULT_NAMESPACE).filter(|ns| !ns.is_empty());

        let replication_type = lookup(vars::REPLICATION_TYPE)
            .unwrap_or_else(|| ReplicationType::Dr.as_str().to_string())
            .parse::<ReplicationType>()?;

        let wait_for = lookup(vars::REPLICATION_WAIT_FOR)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<TargetState>().map_err(|e| anyhow!(e)))
            .transpose()
            .with_context(|| format!("invalid {}", vars::REPLICATION_WAIT_FOR))?;

        let mut poller = PollerConfig::default();
        if let Some(attempts) = lookup(vars::POLL_ATTEMPTS) {
            poller.max_attempts = attempts
                .parse()
                .with_context(|| format!("invalid {}", vars::POLL_ATTEMPTS))?;
        }
        if let Some(secs) = lookup(vars::POLL_INTERVAL_SECS) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid {}", vars::POLL_INTERVAL_SECS))?;
            poller.backoff = Backoff::Constant(Duration::from_secs(secs));
        }
        if let Some(secs) = lookup(vars::POLL_DEADLINE_SECS) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid {}", vars::POLL_DEADLINE_SECS))?;
            poller.deadline = Some(Duration::from_secs(secs));
        }

        Ok(Config {
            vault_addr,
            token,
            namespace,
            replication_type,
            wait_for,
            poller,
        })
    }
}
