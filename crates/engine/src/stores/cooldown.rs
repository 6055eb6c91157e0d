//! Per-actor teleport cooldowns.
//!
//! Entries are evicted lazily when read after they expire; nothing runs in
//! the background.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use portal2exit_domain::ActorId;

use crate::infrastructure::ports::ClockPort;

pub struct CooldownStore {
    last_use: DashMap<ActorId, DateTime<Utc>>,
    duration: chrono::Duration,
    clock: Arc<dyn ClockPort>,
}

impl CooldownStore {
    pub fn new(duration: Duration, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            last_use: DashMap::new(),
            duration: chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    pub fn is_on_cooldown(&self, actor: ActorId) -> bool {
        self.remaining(actor).is_some()
    }

    /// Whole seconds left, rounded up; 0 when not on cooldown.
    pub fn remaining_seconds(&self, actor: ActorId) -> u64 {
        self.remaining(actor)
            .map(|left| {
                let millis = u64::try_from(left.num_milliseconds()).unwrap_or(0);
                millis.div_ceil(1000)
            })
            .unwrap_or(0)
    }

    /// Stamp the current time as the actor's last use.
    pub fn set(&self, actor: ActorId) {
        self.last_use.insert(actor, self.clock.now());
    }

    pub fn clear(&self, actor: ActorId) {
        self.last_use.remove(&actor);
    }

    pub fn clear_all(&self) {
        self.last_use.clear();
    }

    /// Number of tracked actors, expired or not.
    pub fn tracked(&self) -> usize {
        self.last_use.len()
    }

    fn remaining(&self, actor: ActorId) -> Option<chrono::Duration> {
        let now = self.clock.now();
        let last = self.last_use.get(&actor).map(|entry| *entry.value())?;
        let elapsed = now - last;
        if elapsed >= self.duration {
            // Only evict if nobody re-stamped the entry in the meantime.
            self.last_use
                .remove_if(&actor, |_, stamped| now - *stamped >= self.duration);
            return None;
        }
        Some(self.duration - elapsed)
    }
}
