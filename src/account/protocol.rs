//! The account protocol state machine.
//!
//! An external orchestrator drives each request through validate → settle →
//! execute as separate calls; the direct-caller entry point collapses
//! validate and execute into one locally-sequenced invocation so an owner
//! can self-submit without an orchestrator. Each phase checks and advances
//! only its own slice of state; sequencing the phases of one request is the
//! orchestrator's contract, and the account keeps no per-request phase
//! cursor.

use std::sync::Arc;
use tracing::{debug, info};

use crate::account::gate::{authorize, CallerPolicy};
use crate::account::types::ValidationOutcome;
use crate::config::ProtocolConfig;
use crate::crypto::SignatureValidator;
use crate::dispatch::dispatch;
use crate::error::AccountError;
use crate::host::Host;
use crate::identity::Address;
use crate::nonce::{NonceRegistry, ReplayGuard};
use crate::request::Request;
use crate::settlement::settle;

/// A programmable account: one owner, one replay cursor (possibly delegated
/// to a shared nonce service), and a balance held by the host ledger.
pub struct SmartAccount {
    address: Address,
    owner: Address,
    config: ProtocolConfig,
    guard: Arc<dyn ReplayGuard>,
    validator: SignatureValidator,
}

impl SmartAccount {
    /// Account with its own local replay counter.
    pub fn new(address: Address, owner: Address, config: ProtocolConfig) -> Self {
        let guard = Arc::new(NonceRegistry::new());
        Self::with_shared_guard(address, owner, config, guard)
    }

    /// Account delegating replay tracking to an external nonce service.
    pub fn with_shared_guard(
        address: Address,
        owner: Address,
        config: ProtocolConfig,
        guard: Arc<dyn ReplayGuard>,
    ) -> Self {
        let validator = SignatureValidator::new(config.digest_scheme);
        SmartAccount {
            address,
            owner,
            config,
            guard,
            validator,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn current_owner(&self) -> Address {
        self.owner
    }

    /// Hand the account to a new owner. Owner-only; the account always has
    /// exactly one owner.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), AccountError> {
        if caller != self.owner {
            return Err(AccountError::NotAuthorized);
        }
        info!(account = %self.address, old = %self.owner, new = %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }

    /// Validation phase. Orchestrator-only. Replay and funds failures abort
    /// the request; a mismatched signature is a soft `Rejected` outcome, not
    /// an error — callers must branch on the result.
    pub fn validate(
        &self,
        host: &mut dyn Host,
        caller: Address,
        request: &Request,
    ) -> Result<ValidationOutcome, AccountError> {
        authorize(caller, CallerPolicy::OrchestratorOnly, self.config.orchestrator, self.owner)?;
        self.validate_inner(host, request)
    }

    /// Fee settlement phase: pay `amount` to the orchestrator.
    pub fn settle(&self, host: &mut dyn Host, amount: u128) -> Result<(), AccountError> {
        settle(host, self.address, self.config.orchestrator, amount)?;
        Ok(())
    }

    /// Execution phase. Orchestrator or owner. Dispatch failure aborts the
    /// request with the callee's failure payload attached.
    pub fn execute(
        &self,
        host: &mut dyn Host,
        caller: Address,
        request: &Request,
    ) -> Result<Vec<u8>, AccountError> {
        authorize(caller, CallerPolicy::OrchestratorOrOwner, self.config.orchestrator, self.owner)?;
        self.execute_inner(host, request)
    }

    /// Direct-caller path: validate and execute back-to-back in one call,
    /// bypassing the orchestrator. A rejected validation is a hard
    /// `InvalidSignature` here, and execution never runs.
    pub fn submit_directly(
        &self,
        host: &mut dyn Host,
        request: &Request,
    ) -> Result<Vec<u8>, AccountError> {
        match self.validate_inner(host, request)? {
            ValidationOutcome::Accepted => self.execute_inner(host, request),
            ValidationOutcome::Rejected => Err(AccountError::InvalidSignature),
        }
    }

    /// Reserved for a future sponsorship hook. Unrestricted, always
    /// succeeds, does nothing.
    pub fn prepare_for_extension(&self) -> Result<(), AccountError> {
        Ok(())
    }

    fn validate_inner(
        &self,
        host: &mut dyn Host,
        request: &Request,
    ) -> Result<ValidationOutcome, AccountError> {
        // Replay first: a stale sequence must fail before anything else is
        // even looked at.
        self.guard
            .increment_if_equals(self.address, request.lane, request.sequence)?;

        let needed = request.total_debit();
        let available = host.balance_of(self.address);
        if available < needed {
            return Err(AccountError::InsufficientFunds { needed, available });
        }

        let digest = self.validator.digest_of(request);
        let outcome = if self.validator.validate(&digest, &request.signature, self.owner) {
            ValidationOutcome::Accepted
        } else {
            ValidationOutcome::Rejected
        };
        debug!(account = %self.address, sequence = request.sequence, ?outcome, "request validated");
        Ok(outcome)
    }

    fn execute_inner(&self, host: &mut dyn Host, request: &Request) -> Result<Vec<u8>, AccountError> {
        dispatch(
            host,
            &self.config,
            self.address,
            request.target,
            request.value,
            &request.payload,
            request.gas_limit,
        )
    }
}
