// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Convergence polling against the health endpoint.
//!
//! Enable and disable writes are accepted asynchronously, so the mode change
//! is observed through the health endpoint, which any node (including
//! standbys) can answer. The poller issues at most `max_attempts` health
//! requests, sleeping according to [`Backoff`] between them.

use crate::constants::{poll, HEALTH_QUERY};
use crate::error::{ReplicationError, Result};
use crate::types::{ReplicationType, TargetState};
use crate::vault::ApiClient;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Delay schedule between two health requests
#[derive(Clone, Debug, PartialEq)]
pub enum Backoff {
    Constant(Duration),
    Exponential {
        initial: Duration,
        max: Duration,
        factor: f64,
    },
}

impl Backoff {
    /// Delay applied after the given failed attempt (1-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Constant(interval) => *interval,
            Backoff::Exponential {
                initial,
                max,
                factor,
            } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                // A factor below 1 would shrink (or negate) the delay
                let secs = initial.as_secs_f64() * factor.max(1.0).powi(exponent);
                if !secs.is_finite() || secs >= max.as_secs_f64() {
                    *max
                } else {
                    Duration::from_secs_f64(secs)
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PollerConfig {
    /// Health requests issued before giving up
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// Upper bound on the wall-clock time of one wait
    pub deadline: Option<Duration>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_attempts: poll::MAX_ATTEMPTS,
            backoff: Backoff::Constant(Duration::from_secs(poll::INTERVAL_SECS)),
            deadline: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConvergencePoller {
    config: PollerConfig,
}

impl ConvergencePoller {
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    /// Block until the health endpoint reports `target` for `ty`.
    ///
    /// `path` names the transition being confirmed and is only used for error
    /// reporting.
    #[instrument(skip(self, client, cancel), fields(replication_type = %ty, target_state = %target))]
    pub async fn wait_for<C: ApiClient>(
        &self,
        client: &C,
        ty: ReplicationType,
        target: TargetState,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let field = ty.health_mode_field();
        let expected = target.expected_mode();
        let deadline = self.config.deadline.map(|d| Instant::now() + d);
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempts = 0;
        let mut last_error = String::new();

        debug!("Waiting for replication state to be {}", target);

        while attempts < max_attempts {
            attempts += 1;

            let observed = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(path)),
                _ = until(deadline) => {
                    last_error = "deadline exceeded".to_string();
                    break;
                }
                observed = observe_mode(client, &field) => observed,
            };

            match observed {
                Ok(mode) if mode == expected => {
                    debug!("Replication state: {}", mode);
                    return Ok(());
                }
                Ok(mode) => {
                    debug!("Replication state: {}", mode);
                    last_error = format!("{} is {}, want {}", field, mode, expected);
                }
                Err(e) => last_error = e,
            }

            if attempts == max_attempts {
                break;
            }

            let delay = self.config.backoff.delay_for_attempt(attempts);
            warn!("Replication pending, retrying in {:?}", delay);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(path)),
                _ = until(deadline) => {
                    last_error = "deadline exceeded".to_string();
                    break;
                }
                _ = sleep(delay) => {}
            }
        }

        Err(ReplicationError::ConvergenceTimeout {
            path: path.to_string(),
            attempts,
            last_error,
        })
    }
}

fn cancelled(path: &str) -> ReplicationError {
    ReplicationError::Cancelled {
        path: path.to_string(),
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// One health request; any failure is reported as a retryable description.
///
/// Non-5xx statuses still carry the node state (a DR secondary answers 472),
/// so their body is decoded like a 200.
async fn observe_mode<C: ApiClient>(client: &C, field: &str) -> std::result::Result<String, String> {
    let (status, body) = client
        .health(&HEALTH_QUERY)
        .await
        .map_err(|e| e.to_string())?;

    if status.is_server_error() {
        return Err(format!("health endpoint returned {}", status));
    }

    let data: Map<String, Value> = serde_json::from_slice(&body)
        .map_err(|e| format!("failed to decode health response ({}): {}", status, e))?;

    data.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("health response has no string field {}", field))
}
