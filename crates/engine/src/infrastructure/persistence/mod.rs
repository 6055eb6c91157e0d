//! Portal persistence adapters
//!
//! Implements the `PortalStore` port on top of a single JSON document.

mod json_store;
mod portal_record;

pub use json_store::JsonPortalStore;
pub use portal_record::{PortalRecord, RequiredItemRecord};
