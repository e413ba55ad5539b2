//! Implementation of the `themis health` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::adapters::{create_evidence_store, create_oracle};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, StoreBackend};

#[derive(Args, Debug)]
pub struct HealthArgs {}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub component: &'static str,
    pub backend: &'static str,
    pub reachable: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub healthy: bool,
    pub components: Vec<ComponentHealth>,
}

impl CommandOutput for HealthOutput {
    fn to_human(&self) -> String {
        let rows: Vec<(&str, &str, bool, String)> = self
            .components
            .iter()
            .map(|c| (c.component, c.backend, c.reachable, c.detail.clone()))
            .collect();
        TableFormatter::new().format_health(&rows)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(_args: HealthArgs, config: &Config, json_mode: bool) -> Result<()> {
    let oracle = create_oracle(&config.oracle)?;
    let store = create_evidence_store(&config.evidence_store)?;

    let oracle_health = match oracle.is_available().await {
        Ok(reachable) => ComponentHealth {
            component: "oracle",
            backend: oracle.name(),
            reachable,
            detail: format!("{} ({})", config.oracle.base_url, config.oracle.model),
        },
        Err(err) => ComponentHealth {
            component: "oracle",
            backend: oracle.name(),
            reachable: false,
            detail: err.to_string(),
        },
    };

    let store_detail = match config.evidence_store.backend {
        StoreBackend::Chroma => format!(
            "{} (collection {})",
            config.evidence_store.base_url, config.evidence_store.collection
        ),
        StoreBackend::Memory => config
            .evidence_store
            .fragments_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    };

    let store_health = match store.is_available().await {
        Ok(reachable) => ComponentHealth {
            component: "evidence_store",
            backend: store.name(),
            reachable,
            detail: store_detail,
        },
        Err(err) => ComponentHealth {
            component: "evidence_store",
            backend: store.name(),
            reachable: false,
            detail: err.to_string(),
        },
    };

    let components = vec![oracle_health, store_health];
    let healthy = components.iter().all(|c| c.reachable);

    output(&HealthOutput { healthy, components }, json_mode);

    if !healthy {
        anyhow::bail!("One or more components are unavailable");
    }
    Ok(())
}
