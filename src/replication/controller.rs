// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Replication controller - drives enable/disable transitions and secondary tokens.

use crate::error::{ReplicationError, Result};
use crate::replication::paths::{self, Role};
use crate::replication::poller::{ConvergencePoller, PollerConfig};
use crate::replication::projector;
use crate::types::{PrimaryStatus, Projection, ReplicationType, SecondaryStatus, TargetState};
use crate::vault::{ApiClient, ApiResponse};
use serde_json::{Map, Value};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Debug, Default)]
pub struct ControllerConfig {
    pub poller: PollerConfig,
    /// Also wait for convergence on secondary enable/disable
    pub confirm_secondary: bool,
}

/// Outcome of the convergence wait that follows a disable.
///
/// The disable write has already succeeded when this is produced, so an
/// unconfirmed wait is a warning for the caller, not a failed transition.
#[must_use]
#[derive(Debug)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed(ReplicationError),
    /// No wait was requested
    Skipped,
}

impl Confirmation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Confirmation::Confirmed)
    }
}

/// Parameters for joining a primary as secondary
#[derive(Clone, Default)]
pub struct SecondaryEnable {
    pub token: String,
    pub primary_api_addr: Option<String>,
    pub ca_file: Option<String>,
    pub ca_path: Option<String>,
}

impl fmt::Debug for SecondaryEnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondaryEnable")
            .field("token", &"<redacted>")
            .field("primary_api_addr", &self.primary_api_addr)
            .field("ca_file", &self.ca_file)
            .field("ca_path", &self.ca_path)
            .finish()
    }
}

/// Parameters for issuing a secondary token
#[derive(Clone, Debug, Default)]
pub struct TokenRequest {
    pub token_id: String,
    pub ttl: Option<String>,
    pub secondary_public_key: Option<String>,
}

pub struct ReplicationController<C> {
    client: C,
    poller: ConvergencePoller,
    confirm_secondary: bool,
}

impl<C: ApiClient> ReplicationController<C> {
    pub fn new(client: C, config: ControllerConfig) -> Self {
        Self {
            client,
            poller: ConvergencePoller::new(config.poller),
            confirm_secondary: config.confirm_secondary,
        }
    }

    /// Enable `ty` replication as primary and wait until it is running.
    ///
    /// Returns the enable path, which doubles as the durable resource key.
    #[instrument(skip(self, cancel), fields(replication_type = %ty))]
    pub async fn enable_primary(
        &self,
        ty: ReplicationType,
        primary_cluster_addr: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let path = paths::enable(ty, Role::Primary);

        let payload = primary_cluster_addr.filter(|addr| !addr.is_empty()).map(|addr| {
            let mut data = Map::new();
            data.insert("primary_cluster_addr".to_string(), Value::from(addr));
            data
        });

        self.write_checked(&path, payload).await?;
        info!("Replication ({}) enabled", ty);

        self.poller
            .wait_for(&self.client, ty, TargetState::Running, &path, cancel)
            .await?;
        info!("Replication ({}) started", ty);

        Ok(path)
    }

    /// Enable `ty` replication as secondary of the primary that issued `params.token`.
    ///
    /// Every field is sent, unset ones as empty strings.
    #[instrument(skip(self, params, cancel), fields(replication_type = %ty))]
    pub async fn enable_secondary(
        &self,
        ty: ReplicationType,
        params: &SecondaryEnable,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let path = paths::enable(ty, Role::Secondary);

        let mut data = Map::new();
        data.insert("token".to_string(), Value::from(params.token.as_str()));
        for (key, value) in [
            ("primary_api_addr", &params.primary_api_addr),
            ("ca_file", &params.ca_file),
            ("ca_path", &params.ca_path),
        ] {
            data.insert(key.to_string(), Value::from(value.as_deref().unwrap_or("")));
        }

        self.write_checked(&path, Some(data)).await?;
        info!("Replication ({}) enabled", ty);

        if self.confirm_secondary {
            self.poller
                .wait_for(&self.client, ty, TargetState::Secondary, &path, cancel)
                .await?;
            info!("Replication ({}) streaming from primary", ty);
        }

        Ok(path)
    }

    #[instrument(skip(self, cancel), fields(replication_type = %ty))]
    pub async fn disable_primary(
        &self,
        ty: ReplicationType,
        cancel: &CancellationToken,
    ) -> Result<Confirmation> {
        let path = paths::disable(ty, Role::Primary);
        self.write_checked(&path, None).await?;

        let confirmation = self.confirm_disabled(ty, &path, cancel).await;
        info!("Replication ({}) stopped/disabled", ty);
        Ok(confirmation)
    }

    #[instrument(skip(self, cancel), fields(replication_type = %ty))]
    pub async fn disable_secondary(
        &self,
        ty: ReplicationType,
        cancel: &CancellationToken,
    ) -> Result<Confirmation> {
        let path = paths::disable(ty, Role::Secondary);
        self.write_checked(&path, None).await?;

        if !self.confirm_secondary {
            info!("Replication ({}) disabled", ty);
            return Ok(Confirmation::Skipped);
        }

        let confirmation = self.confirm_disabled(ty, &path, cancel).await;
        info!("Replication ({}) stopped/disabled", ty);
        Ok(confirmation)
    }

    async fn confirm_disabled(
        &self,
        ty: ReplicationType,
        path: &str,
        cancel: &CancellationToken,
    ) -> Confirmation {
        match self
            .poller
            .wait_for(&self.client, ty, TargetState::Disabled, path, cancel)
            .await
        {
            Ok(()) => Confirmation::Confirmed,
            Err(e) => {
                warn!("Replication ({}) disable not confirmed: {}", ty, e);
                Confirmation::Unconfirmed(e)
            }
        }
    }

    /// Issue a secondary token and return it.
    ///
    /// The token only exists in the wrapping envelope of this response and
    /// cannot be read back later.
    #[instrument(skip(self, request), fields(replication_type = %ty, token_id = %request.token_id))]
    pub async fn issue_token(&self, ty: ReplicationType, request: &TokenRequest) -> Result<String> {
        let path = paths::token_issue(ty);

        let mut data = Map::new();
        data.insert("id".to_string(), Value::from(request.token_id.as_str()));
        if let Some(ttl) = request.ttl.as_deref().filter(|v| !v.is_empty()) {
            data.insert("ttl".to_string(), Value::from(ttl));
        }
        if let Some(key) = request
            .secondary_public_key
            .as_deref()
            .filter(|v| !v.is_empty())
        {
            data.insert("secondary_public_key".to_string(), Value::from(key));
        }

        let resp = self.write_checked(&path, Some(data)).await?;
        let token = resp
            .as_ref()
            .and_then(ApiResponse::wrapped_token)
            .ok_or_else(|| ReplicationError::malformed("wrap_info.token", "missing from token response"))?
            .to_string();

        info!("Replication token created ({})", ty);
        Ok(token)
    }

    #[instrument(skip(self), fields(replication_type = %ty))]
    pub async fn revoke_token(&self, ty: ReplicationType, token_id: &str) -> Result<()> {
        let path = paths::token_revoke(ty);

        let mut data = Map::new();
        data.insert("id".to_string(), Value::from(token_id));
        self.write_checked(&path, Some(data)).await?;

        info!("Replication token {} revoked ({})", token_id, ty);
        Ok(())
    }

    /// True when a secondary with node id `token_id` is registered on the primary
    #[instrument(skip(self), fields(replication_type = %ty))]
    pub async fn token_exists(&self, ty: ReplicationType, token_id: &str) -> Result<bool> {
        let data = self.status(ty).await?;

        let found = projector::secondaries(&data)?
            .iter()
            .any(|s| s.node_id == token_id);

        if found {
            debug!("Found replication token with id {}", token_id);
        }
        Ok(found)
    }

    /// Like [`Self::token_exists`], but a missing token is an error
    pub async fn ensure_token(&self, ty: ReplicationType, token_id: &str) -> Result<()> {
        if self.token_exists(ty, token_id).await? {
            Ok(())
        } else {
            Err(ReplicationError::NotFound(format!(
                "replication token {} ({})",
                token_id, ty
            )))
        }
    }

    /// Raw status payload for `ty`
    pub async fn status(&self, ty: ReplicationType) -> Result<Map<String, Value>> {
        self.read_checked(&paths::status(ty)).await
    }

    pub async fn read_primary(&self, ty: ReplicationType) -> Result<Projection<PrimaryStatus>> {
        let data = self.status(ty).await?;
        projector::project_primary(&data)
    }

    pub async fn read_secondary(&self, ty: ReplicationType) -> Result<Projection<SecondaryStatus>> {
        let data = self.status(ty).await?;
        projector::project_secondary(&data)
    }

    /// True unless the observed mode for `ty` is `disabled`
    pub async fn is_enabled(&self, ty: ReplicationType) -> Result<bool> {
        let data = self.status(ty).await?;
        let mode = projector::mode(&data)?;
        debug!("Replication ({}) is {}", ty, mode);
        Ok(mode != "disabled")
    }

    /// Wait for `target` outside of a transition
    pub async fn wait_for(
        &self,
        ty: ReplicationType,
        target: TargetState,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.poller
            .wait_for(&self.client, ty, target, &paths::status(ty), cancel)
            .await
    }

    async fn write_checked(
        &self,
        path: &str,
        payload: Option<Map<String, Value>>,
    ) -> Result<Option<ApiResponse>> {
        let resp = self
            .client
            .write(path, payload)
            .await
            .map_err(|e| ReplicationError::RemoteWriteError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        match &resp {
            None => debug!("Response from {} was empty", path),
            Some(r) => {
                if let Some(errors) = r.embedded_errors() {
                    return Err(ReplicationError::RemoteWriteError {
                        path: path.to_string(),
                        message: errors.to_string(),
                    });
                }
            }
        }

        Ok(resp)
    }

    async fn read_checked(&self, path: &str) -> Result<Map<String, Value>> {
        let read_error = |message: String| ReplicationError::RemoteReadError {
            path: path.to_string(),
            message,
        };

        let resp = self
            .client
            .read(path)
            .await
            .map_err(|e| read_error(e.to_string()))?
            .ok_or_else(|| read_error("empty response".to_string()))?;

        if let Some(errors) = resp.embedded_errors() {
            return Err(read_error(errors.to_string()));
        }

        Ok(resp.data.unwrap_or_default())
    }
}
