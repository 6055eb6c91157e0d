//! JSON file portal store.
//!
//! The whole registry lives in one document:
//!
//! ```json
//! { "portals": { "Hub": { "name": "Hub", ... } } }
//! ```
//!
//! Saves go to a sibling temp file that is then renamed over the target, so
//! a crash mid-write never leaves a truncated document behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use portal2exit_domain::Portal;

use super::portal_record::PortalRecord;
use crate::infrastructure::ports::{ClockPort, PortalStore, StoreError};

#[derive(Debug, Serialize, Deserialize)]
struct PortalDocument<R> {
    #[serde(default)]
    portals: BTreeMap<String, R>,
}

pub struct JsonPortalStore {
    path: PathBuf,
    clock: Arc<dyn ClockPort>,
}

impl JsonPortalStore {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "portals.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PortalStore for JsonPortalStore {
    fn load_all(&self) -> Result<Vec<Portal>, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "No portal file yet, starting empty");
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::io("load_all", e))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let document: PortalDocument<serde_json::Value> =
            serde_json::from_str(&raw).map_err(StoreError::serialization)?;

        let now = self.clock.now();
        let mut portals = Vec::with_capacity(document.portals.len());
        for (key, value) in document.portals {
            let loaded = serde_json::from_value::<PortalRecord>(value)
                .map_err(|e| StoreError::invalid_record(&key, e))
                .and_then(|record| record.into_portal(now));
            match loaded {
                Ok(portal) => portals.push(portal),
                Err(e) => {
                    tracing::warn!(portal = %key, error = %e, "Skipping unreadable portal record");
                }
            }
        }

        tracing::debug!(count = portals.len(), "Loaded portals");
        Ok(portals)
    }

    fn save_all(&self, portals: &[Portal]) -> Result<(), StoreError> {
        let document = PortalDocument {
            portals: portals
                .iter()
                .map(|p| (p.name().to_string(), PortalRecord::from(p)))
                .collect::<BTreeMap<_, _>>(),
        };
        let json =
            serde_json::to_string_pretty(&document).map_err(StoreError::serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io("create_dir", e))?;
        }
        let temp = self.temp_path();
        std::fs::write(&temp, json).map_err(|e| StoreError::io("write", e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| StoreError::io("rename", e))?;

        tracing::debug!(count = portals.len(), path = %self.path.display(), "Saved portals");
        Ok(())
    }
}
