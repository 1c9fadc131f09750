// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secondary replication configuration resource.

use crate::error::{ReplicationError, Result};
use crate::replication::paths::{self, Role};
use crate::replication::{Confirmation, ReplicationController, SecondaryEnable};
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
    let params = SecondaryEnable {
        token: store.required_str("token")?.to_string(),
        primary_api_addr: store.get_str("primary_api_addr").map(str::to_string),
        ca_file: store.get_str("ca_file").map(str::to_string),
        ca_path: store.get_str("ca_path").map(str::to_string),
    };

    match ctrl.enable_secondary(ty, &params, cancel).await {
        Ok(id) => store.set_id(Some(id)),
        Err(e @ (ReplicationError::ConvergenceTimeout { .. } | ReplicationError::Cancelled { .. })) => {
            store.set_id(Some(paths::enable(ty, Role::Secondary)));
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
    let projection = ctrl.read_secondary(ty).await?;
    debug!("Read {}: mode={}", paths::status(ty), projection.record.mode);

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
    let confirmation = ctrl.disable_secondary(ty, cancel).await?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replication::ControllerConfig;
    use crate::resources::store::ResourceData;
    use crate::test_utils::{secondary_status_json, MockService};
    use crate::vault::VaultClient;
    use serde_json::json;

    const ENABLE: &str = "/v1/sys/replication/performance/secondary/enable";
    const DISABLE: &str = "/v1/sys/replication/performance/secondary/disable";
    const STATUS: &str = "/v1/sys/replication/performance/status";

    fn controller(mock: &MockService) -> ReplicationController<VaultClient<MockService>> {
        ReplicationController::new(mock.clone().into_client(), ControllerConfig::default())
    }

    #[tokio::test]
    async fn test_create_sends_all_fields_and_projects() {
        let mock = MockService::new()
            .on_put(ENABLE, 204, "")
            .on_get(STATUS, 200, &secondary_status_json("secondary"));
        let ctrl = controller(&mock);
        let mut data = ResourceData::new()
            .with("type", "performance")
            .with("token", "s.wrapped")
            .with("ca_path", "/etc/vault/ca");

        create(&ctrl, &mut data, &CancellationToken::new()).await.unwrap();

        assert_eq!(
            data.id(),
            Some("/sys/replication/performance/secondary/enable")
        );
        assert_eq!(
            mock.requests_to(ENABLE)[0].body,
            Some(json!({
                "token": "s.wrapped",
                "primary_api_addr": "",
                "ca_file": "",
                "ca_path": "/etc/vault/ca"
            }))
        );
        assert_eq!(data.get("mode"), Some(&json!("secondary")));
        assert_eq!(
            data.get("known_primary_cluster_addrs"),
            Some(&json!(["https://primary.example.com:8201"]))
        );
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let mock = MockService::new();
        let ctrl = controller(&mock);
        let mut data = ResourceData::new().with("type", "performance");

        let err = create(&ctrl, &mut data, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ReplicationError::MissingField(f) if f == "token"));
        assert_eq!(data.id(), None);
    }

    #[tokio::test]
    async fn test_create_embedded_errors() {
        let mock = MockService::new().on_put(
            ENABLE,
            200,
            &json!({"data": {"Errors": ["invalid activation token"]}}).to_string(),
        );
        let ctrl = controller(&mock);
        let mut data = ResourceData::new()
            .with("type", "performance")
            .with("token", "s.bad");

        let err = create(&ctrl, &mut data, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ReplicationError::RemoteWriteError { .. }));
        assert_eq!(data.id(), None);
    }

    #[tokio::test]
    async fn test_read_purges_when_disabled() {
        let mock = MockService::new().on_get(STATUS, 200, &secondary_status_json("disabled"));
        let ctrl = controller(&mock);
        let mut data = ResourceData::new().with("type", "performance");
        data.set_id(Some("/sys/replication/performance/secondary/enable".to_string()));

        read(&ctrl, &mut data).await.unwrap();

        assert_eq!(data.id(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let mock = MockService::new().on_put(DISABLE, 204, "");
        let ctrl = controller(&mock);
        let mut data = ResourceData::new().with("type", "performance");
        data.set_id(Some("/sys/replication/performance/secondary/enable".to_string()));

        let confirmation = delete(&ctrl, &mut data, &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(confirmation, Confirmation::Skipped));
        assert_eq!(data.id(), None);
    }

    #[tokio::test]
    async fn test_exists_false_when_disabled() {
        let mock = MockService::new().on_get(STATUS, 200, &secondary_status_json("disabled"));
        let ctrl = controller(&mock);
        let data = ResourceData::new().with("type", "performance");

        assert!(!exists(&ctrl, &data).await.unwrap());
    }
}
