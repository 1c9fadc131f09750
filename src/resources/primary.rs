// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Primary replication configuration resource.
//!
//! Desired fields: `type` (required) and `primary_cluster_addr` (optional).
//! Observed fields are those of [`crate::types::PrimaryStatus`].

use crate::error::{ReplicationError, Result};
use crate::replication::paths::{self, Role};
use crate::replication::{Confirmation, ReplicationController};
use crate::resources::store::ConfigStore;
use crate::vault::ApiClient;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub async fn create<C, S>(
    ctrl: &ReplicationController<C>,
    store: &mut S,
    cancel: &CancellationToken,
) -> Result<()>
where
    C: ApiClient,
    S: ConfigStore + Send,
{
    let ty = store.replication_type()?;
    let addr = store.get_str("primary_cluster_addr").map(str::to_string);

    match ctrl.enable_primary(ty, addr.as_deref(), cancel).await {
        Ok(id) => store.set_id(Some(id)),
        // The enable write went through; keep the resource so it can be destroyed
        Err(e @ (ReplicationError::ConvergenceTimeout { .. } | ReplicationError::Cancelled { .. })) => {
            store.set_id(Some(paths::enable(ty, Role::Primary)));
            return Err(e);
        }
        Err(e) => return Err(e),
    }

    read(ctrl, store).await
}

pub async fn read<C, S>(ctrl: &ReplicationController<C>, store: &mut S) -> Result<()>
where
    C: ApiClient,
    S: ConfigStore + Send,
{
    let ty = store.replication_type()?;
    let projection = ctrl.read_primary(ty).await?;

    if projection.should_purge {
        debug!("Replication disabled, removing from state");
        store.set_id(None);
        return Ok(());
    }

    store.apply_record(&projection.record)
}

pub async fn delete<C, S>(
    ctrl: &ReplicationController<C>,
    store: &mut S,
    cancel: &CancellationToken,
) -> Result<Confirmation>
where
    C: ApiClient,
    S: ConfigStore + Send,
{
    let ty = store.replication_type()?;
    let confirmation = ctrl.disable_primary(ty, cancel).await?;
    store.set_id(None);
    Ok(confirmation)
}

pub async fn exists<C, S>(ctrl: &ReplicationController<C>, store: &S) -> Result<bool>
where
    C: ApiClient,
    S: ConfigStore + Sync,
{
    ctrl.is_enabled(store.replication_type()?).await
}
