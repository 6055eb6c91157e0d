//! Infrastructure layer - external dependencies.
//!
//! Contains port traits and their implementations:
//! - ports: host, service, storage and testability traits
//! - persistence: JSON file portal store
//! - autosave: periodic registry persistence
//! - clock: system/seeded clock and random sources
//! - app_settings: engine configuration

pub mod app_settings;
pub mod autosave;
pub mod clock;
pub mod persistence;
pub mod ports;
