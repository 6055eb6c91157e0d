//! Portal2Exit Engine - standalone portal store keeper.
//!
//! Loads the portal file, keeps the autosave worker running and writes a
//! final snapshot on shutdown. A host bridge embeds `App` instead.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal2exit_engine::infrastructure::{
    app_settings::EngineSettings,
    autosave::PortalAutosave,
    clock::SystemClock,
    persistence::JsonPortalStore,
    ports::{ClockPort, PortalStore},
};
use portal2exit_engine::stores::PortalRegistry;

const DATA_FILE_ENV: &str = "PORTAL2EXIT_DATA_FILE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (local overrides first).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal2exit_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Portal2Exit Engine");

    let settings = EngineSettings::from_env();
    let data_file = std::env::var(DATA_FILE_ENV).unwrap_or_else(|_| "portals.json".into());

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let store: Arc<dyn PortalStore> = Arc::new(JsonPortalStore::new(&data_file, clock));
    let registry = Arc::new(PortalRegistry::new());

    let portals = store
        .load_all()
        .with_context(|| format!("Failed to load portals from {}", data_file))?;
    let loaded = registry.load(portals);
    tracing::info!(loaded, path = %data_file, "Portal registry ready");

    let worker = settings.autosave_interval().map(|interval| {
        PortalAutosave::new(registry.clone(), store.clone(), interval).spawn()
    });
    if worker.is_none() {
        tracing::info!("Autosave disabled");
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutting down");

    if let Some(worker) = worker {
        worker.abort();
    }
    let snapshot = registry.snapshot();
    store
        .save_all(&snapshot)
        .with_context(|| format!("Failed to save portals to {}", data_file))?;
    tracing::info!(saved = snapshot.len(), "Saved portals");

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
