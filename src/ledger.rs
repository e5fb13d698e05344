//! In-memory balance tracking for the host chain stand-in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::identity::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InsufficientFunds { needed: u128, available: u128 },
    Overflow,
}

/// Balance store for all accounts.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Ledger {
    balances: HashMap<Address, u128>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    pub fn balance_of(&self, who: Address) -> u128 {
        self.balances.get(&who).copied().unwrap_or(0)
    }

    /// Credit (add) balance to an account
    pub fn credit(&mut self, who: Address, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let current = self.balance_of(who);
        let updated = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.balances.insert(who, updated);
        Ok(())
    }

    /// Debit (subtract) balance from an account
    pub fn debit(&mut self, who: Address, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let current = self.balance_of(who);
        if current < amount {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available: current,
            });
        }
        let updated = current - amount;
        if updated == 0 {
            self.balances.remove(&who);
        } else {
            self.balances.insert(who, updated);
        }
        Ok(())
    }

    /// Move balance from one account to another. No partial state on
    /// failure: the debit is checked before anything mutates.
    pub fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        self.debit(from, amount)?;
        if let Err(e) = self.credit(to, amount) {
            // Rollback on error
            self.credit(from, amount).ok();
            return Err(e);
        }
        Ok(())
    }

    /// Set balance directly (for genesis/test wiring)
    pub fn set_balance(&mut self, who: Address, amount: u128) {
        if amount == 0 {
            self.balances.remove(&who);
        } else {
            self.balances.insert(who, amount);
        }
    }

    pub fn total_supply(&self) -> u128 {
        self.balances.values().sum()
    }
}
