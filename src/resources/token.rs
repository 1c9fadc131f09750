// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secondary token resource.
//!
//! The token is only returned by the issuing call, so `secondary_token` is
//! written once in [`create`] and never refreshed.

use crate::error::Result;
use crate::replication::{ReplicationController, TokenRequest};
use crate::resources::store::ConfigStore;
use crate::vault::ApiClient;
use serde_json::Value;
use tracing::debug;

pub async fn create<C, S>(ctrl: &ReplicationController<C>, store: &mut S) -> Result<()>
where
    C: ApiClient,
    S: ConfigStore + Send,
{
    let ty = store.replication_type()?;
    let request = TokenRequest {
        token_id: store.required_str("token_id")?.to_string(),
        ttl: store.get_str("ttl").map(str::to_string),
        secondary_public_key: store.get_str("secondary_public_key").map(str::to_string),
    };

    let token = ctrl.issue_token(ty, &request).await?;
    store.set_id(Some(request.token_id));
    store.set("secondary_token", Value::String(token));

    Ok(())
}

/// Drops the resource once its secondary is no longer registered on the primary
pub async fn read<C, S>(ctrl: &ReplicationController<C>, store: &mut S) -> Result<()>
where
    C: ApiClient,
    S: ConfigStore + Send,
{
    let ty = store.replication_type()?;
    let token_id = store.required_str("token_id")?.to_string();

    if !ctrl.token_exists(ty, &token_id).await? {
        debug!("Replication token {} not found, removing from state", token_id);
        store.set_id(None);
    }
    Ok(())
}

pub async fn delete<C, S>(ctrl: &ReplicationController<C>, store: &mut S) -> Result<()>
where
    C: ApiClient,
    S: ConfigStore + Send,
{
    let ty = store.replication_type()?;
    let token_id = store.required_str("token_id")?.to_string();

    ctrl.revoke_token(ty, &token_id).await?;
    store.set_id(None);
    Ok(())
}

pub async fn exists<C, S>(ctrl: &ReplicationController<C>, store: &S) -> Result<bool>
where
    C: ApiClient,
    S: ConfigStore + Sync,
{
    let ty = store.replication_type()?;
    ctrl.token_exists(ty, store.required_str("token_id")?).await
}
