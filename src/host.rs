//! The host chain, as seen from inside an account.
//!
//! Everything the protocol needs from its execution environment sits behind
//! the `Host` trait: balance queries, value transfer with an explicit
//! receive allowance, ordinary calls, and the privileged call path reserved
//! for system targets. `InMemoryHost` is the ledger-backed implementation
//! used by tests and local wiring; it keeps a call log so tests can observe
//! exactly what was dispatched.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

use crate::identity::Address;
use crate::ledger::{Ledger, LedgerError};

/// Why a host-level value transfer failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferFailure {
    Insufficient { needed: u128, available: u128 },
    Rejected,
}

/// A failed call, carrying the callee's raw failure payload for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFailure {
    pub revert: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Ordinary,
    Privileged,
}

/// One dispatched call as the host saw it.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub kind: CallKind,
    pub from: Address,
    pub target: Address,
    pub value: u128,
    /// Resource allowance forwarded to the callee.
    pub allowance: u64,
    pub payload: Vec<u8>,
}

pub trait Host {
    fn balance_of(&self, who: Address) -> u128;

    /// Move value between accounts. `allowance` is the resource budget the
    /// receiving side may spend in its receive logic.
    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
        allowance: u64,
    ) -> Result<(), TransferFailure>;

    /// Ordinary call into `target` with a caller-specified gas allowance.
    fn call(
        &mut self,
        from: Address,
        target: Address,
        value: u128,
        payload: &[u8],
        gas: u64,
    ) -> Result<Vec<u8>, CallFailure>;

    /// Privileged system call (e.g. contract deployment) with an explicit
    /// forwarded budget.
    fn call_privileged(
        &mut self,
        budget: u64,
        from: Address,
        target: Address,
        value: u128,
        payload: &[u8],
    ) -> Result<Vec<u8>, CallFailure>;
}

/// Ledger-backed host with scripted failures and full call observability.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    pub ledger: Ledger,
    calls: Vec<CallRecord>,
    /// Targets scripted to fail, with the payload they fail with.
    reverting: HashMap<Address, Vec<u8>>,
    /// Payees scripted to refuse value transfers.
    refusing_payees: Vec<Address>,
    /// Deployments performed through the privileged path.
    deployments: Vec<(Address, Vec<u8>)>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `target` to fail every call with `revert`.
    pub fn script_revert(&mut self, target: Address, revert: Vec<u8>) {
        self.reverting.insert(target, revert);
    }

    /// Script `payee` to refuse incoming value transfers.
    pub fn script_refusal(&mut self, payee: Address) {
        self.refusing_payees.push(payee);
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn deployments(&self) -> &[(Address, Vec<u8>)] {
        &self.deployments
    }

    fn move_value(&mut self, from: Address, to: Address, amount: u128) -> Result<(), CallFailure> {
        match self.ledger.transfer(from, to, amount) {
            Ok(()) => Ok(()),
            Err(LedgerError::InsufficientFunds { .. }) | Err(LedgerError::Overflow) => {
                Err(CallFailure {
                    revert: b"value transfer failed".to_vec(),
                })
            }
        }
    }

    fn deployed_address(&self, deployer: Address, code: &[u8]) -> Address {
        let mut hasher = Sha256::new();
        hasher.update(deployer.as_bytes());
        hasher.update((self.deployments.len() as u64).to_le_bytes());
        hasher.update(code);
        let hash = hasher.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&hash[12..]);
        Address(out)
    }
}

impl Host for InMemoryHost {
    fn balance_of(&self, who: Address) -> u128 {
        self.ledger.balance_of(who)
    }

    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
        allowance: u64,
    ) -> Result<(), TransferFailure> {
        if self.refusing_payees.contains(&to) {
            return Err(TransferFailure::Rejected);
        }
        debug!(%from, %to, amount, allowance, "host transfer");
        self.ledger.transfer(from, to, amount).map_err(|e| match e {
            LedgerError::InsufficientFunds { needed, available } => {
                TransferFailure::Insufficient { needed, available }
            }
            LedgerError::Overflow => TransferFailure::Rejected,
        })
    }

    fn call(
        &mut self,
        from: Address,
        target: Address,
        value: u128,
        payload: &[u8],
        gas: u64,
    ) -> Result<Vec<u8>, CallFailure> {
        self.calls.push(CallRecord {
            kind: CallKind::Ordinary,
            from,
            target,
            value,
            allowance: gas,
            payload: payload.to_vec(),
        });

        if let Some(revert) = self.reverting.get(&target) {
            return Err(CallFailure {
                revert: revert.clone(),
            });
        }
        if value > 0 {
            self.move_value(from, target, value)?;
        }
        Ok(Vec::new())
    }

    fn call_privileged(
        &mut self,
        budget: u64,
        from: Address,
        target: Address,
        value: u128,
        payload: &[u8],
    ) -> Result<Vec<u8>, CallFailure> {
        self.calls.push(CallRecord {
            kind: CallKind::Privileged,
            from,
            target,
            value,
            allowance: budget,
            payload: payload.to_vec(),
        });

        if let Some(revert) = self.reverting.get(&target) {
            return Err(CallFailure {
                revert: revert.clone(),
            });
        }
        if value > 0 {
            self.move_value(from, target, value)?;
        }

        // The privileged target models the host deployer: the payload is the
        // code to install, the returned bytes are the new address.
        let deployed = self.deployed_address(from, payload);
        self.deployments.push((deployed, payload.to_vec()));
        debug!(%from, %deployed, "privileged deployment");
        Ok(deployed.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_records_kind_and_allowance() {
        let mut host = InMemoryHost::new();
        let a = Address([1u8; 20]);
        let b = Address([2u8; 20]);

        host.call(a, b, 0, &[1, 2], 50_000).unwrap();
        host.call_privileged(u64::MAX, a, b, 0, &[3]).unwrap();

        assert_eq!(host.call_count(), 2);
        assert_eq!(host.calls()[0].kind, CallKind::Ordinary);
        assert_eq!(host.calls()[0].allowance, 50_000);
        assert_eq!(host.calls()[1].kind, CallKind::Privileged);
        assert_eq!(host.calls()[1].allowance, u64::MAX);
    }

    #[test]
    fn test_scripted_revert_carries_payload() {
        let mut host = InMemoryHost::new();
        let a = Address([1u8; 20]);
        let bad = Address([2u8; 20]);
        host.script_revert(bad, b"nope".to_vec());

        let err = host.call(a, bad, 0, &[], 1).unwrap_err();
        assert_eq!(err.revert, b"nope");
    }

    #[test]
    fn test_privileged_call_records_deployment() {
        let mut host = InMemoryHost::new();
        let a = Address([1u8; 20]);
        let deployer = Address([0xee; 20]);

        let ret = host.call_privileged(u64::MAX, a, deployer, 0, b"code").unwrap();
        assert_eq!(host.deployments().len(), 1);
        assert_eq!(ret, host.deployments()[0].0.as_bytes().to_vec());
    }

    #[test]
    fn test_refusing_payee_rejects_transfer() {
        let mut host = InMemoryHost::new();
        let a = Address([1u8; 20]);
        let payee = Address([2u8; 20]);
        host.ledger.credit(a, 10).unwrap();
        host.script_refusal(payee);

        assert_eq!(
            host.transfer(a, payee, 5, u64::MAX),
            Err(TransferFailure::Rejected)
        );
        assert_eq!(host.balance_of(a), 10);
    }
}
