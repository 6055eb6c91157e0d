//! Periodic portal persistence.
//!
//! Snapshots the registry on a fixed interval and writes it through the
//! `PortalStore` port. The snapshot clones each portal under its own lock,
//! so teleports and edits keep running while the file is written.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::infrastructure::ports::{PortalStore, StoreError};
use crate::stores::PortalRegistry;

pub struct PortalAutosave {
    registry: Arc<PortalRegistry>,
    store: Arc<dyn PortalStore>,
    interval: Duration,
}

impl PortalAutosave {
    pub fn new(
        registry: Arc<PortalRegistry>,
        store: Arc<dyn PortalStore>,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            interval,
        }
    }

    /// Write the current registry synchronously.
    pub fn save_now(&self) -> Result<usize, StoreError> {
        save(&self.registry, self.store.as_ref())
    }

    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the worker (spawned as background task)
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Starting portal autosave");
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        // The first tick completes immediately; nothing has changed yet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let registry = self.registry.clone();
            let store = self.store.clone();
            let result =
                tokio::task::spawn_blocking(move || save(&registry, store.as_ref())).await;
            match result {
                Ok(Ok(count)) => tracing::debug!(count, "Autosaved portals"),
                Ok(Err(e)) => tracing::error!(error = %e, "Portal autosave failed"),
                Err(e) => tracing::error!(error = %e, "Portal autosave task panicked"),
            }
        }
    }
}

fn save(registry: &PortalRegistry, store: &dyn PortalStore) -> Result<usize, StoreError> {
    let portals = registry.snapshot();
    store.save_all(&portals)?;
    Ok(portals.len())
}
