//! Time and randomness, injected so cooldowns and exit selection are testable.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source for random exit selection.
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn gen_index(&self, len: usize) -> usize;
}
