//! Permission nodes checked by the engine.

/// Default node required to use portals.
pub const USE: &str = "portal2exit.use";
/// Edit or remove any portal; clear the registry.
pub const ADMIN: &str = "portal2exit.admin";
/// Ignore the per-player portal limit.
pub const UNLIMITED: &str = "portal2exit.unlimited";
/// Use portals without paying.
pub const BYPASS_COST: &str = "portal2exit.bypass.cost";
/// Create portals.
pub const CREATE: &str = "portal2exit.create";
