// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vault_replication::config::Config;
use vault_replication::replication::{projector, ControllerConfig, ReplicationController};
use vault_replication::vault::VaultClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, defaulting to info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: vault_addr={}, replication_type={}",
        config.vault_addr, config.replication_type
    );

    let ty = config.replication_type;
    let controller = ReplicationController::new(
        VaultClient::connect(&config),
        ControllerConfig {
            poller: config.poller.clone(),
            confirm_secondary: false,
        },
    );

    // Ctrl-C aborts a pending wait
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    if let Some(target) = config.wait_for {
        info!("Waiting for {} replication to be {}", ty, target);
        if let Err(e) = controller.wait_for(ty, target, &cancel).await {
            error!("Replication ({}) did not reach {}: {}", ty, target, e);
            return Err(e.into());
        }
        info!("Replication ({}) is {}", ty, target);
    }

    let data = controller.status(ty).await?;
    let output = match projector::mode(&data)?.as_str() {
        "secondary" => serde_json::to_string_pretty(&projector::project_secondary(&data)?.record)?,
        _ => serde_json::to_string_pretty(&projector::project_primary(&data)?.record)?,
    };
    println!("{}", output);

    Ok(())
}
