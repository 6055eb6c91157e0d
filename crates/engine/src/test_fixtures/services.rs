//! Fake economy and kit services.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use portal2exit_domain::ActorId;

use crate::infrastructure::ports::{EconomyError, EconomyService, KitService};

/// Balances in a map; withdrawals and deposits can be made to fail.
#[derive(Default)]
pub struct LedgerEconomy {
    balances: Mutex<HashMap<ActorId, f64>>,
    fail_withdraw: bool,
    fail_deposit: bool,
}

impl LedgerEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, actor: ActorId, amount: f64) -> Self {
        self.balances.lock().unwrap().insert(actor, amount);
        self
    }

    pub fn failing_withdrawals(mut self) -> Self {
        self.fail_withdraw = true;
        self
    }

    pub fn failing_deposits(mut self) -> Self {
        self.fail_deposit = true;
        self
    }

    pub fn balance_of(&self, actor: ActorId) -> f64 {
        self.balances.lock().unwrap().get(&actor).copied().unwrap_or(0.0)
    }
}

impl EconomyService for LedgerEconomy {
    fn balance(&self, actor: ActorId) -> f64 {
        self.balance_of(actor)
    }

    fn withdraw(&self, actor: ActorId, amount: f64) -> Result<(), EconomyError> {
        if self.fail_withdraw {
            return Err(EconomyError::transaction("withdrawals disabled"));
        }
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(actor).or_insert(0.0);
        if *balance < amount {
            return Err(EconomyError::transaction("insufficient funds"));
        }
        *balance -= amount;
        Ok(())
    }

    fn deposit(&self, actor: ActorId, amount: f64) -> Result<(), EconomyError> {
        if self.fail_deposit {
            return Err(EconomyError::transaction("deposits disabled"));
        }
        *self.balances.lock().unwrap().entry(actor).or_insert(0.0) += amount;
        Ok(())
    }

    fn format(&self, amount: f64) -> String {
        format!("${amount:.2}")
    }
}

/// Remembers which kits were granted.
#[derive(Default)]
pub struct RecordingKits {
    received: Mutex<HashSet<(ActorId, String)>>,
    applied: Mutex<Vec<(ActorId, String)>>,
    unknown: HashSet<String>,
}

impl RecordingKits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_received(self, actor: ActorId, kit: &str) -> Self {
        self.received.lock().unwrap().insert((actor, kit.to_string()));
        self
    }

    /// Kits the service refuses to apply.
    pub fn with_unknown(mut self, kit: &str) -> Self {
        self.unknown.insert(kit.to_string());
        self
    }

    pub fn applied(&self) -> Vec<(ActorId, String)> {
        self.applied.lock().unwrap().clone()
    }
}

impl KitService for RecordingKits {
    fn has_received(&self, actor: ActorId, kit: &str) -> bool {
        self.received.lock().unwrap().contains(&(actor, kit.to_string()))
    }

    fn apply(&self, actor: ActorId, kit: &str) -> bool {
        if self.unknown.contains(kit) {
            return false;
        }
        self.applied.lock().unwrap().push((actor, kit.to_string()));
        self.received.lock().unwrap().insert((actor, kit.to_string()));
        true
    }
}
