//! Caller authorization for account entry points.

use serde::{Deserialize, Serialize};

use crate::error::AccountError;
use crate::identity::Address;

/// Which external identities may invoke a phase.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallerPolicy {
    /// Only the configured orchestrator.
    OrchestratorOnly,
    /// The orchestrator or the account's owner.
    OrchestratorOrOwner,
}

/// Pure predicate: no state is read beyond the arguments, none is written.
pub fn authorize(
    caller: Address,
    policy: CallerPolicy,
    orchestrator: Address,
    owner: Address,
) -> Result<(), AccountError> {
    match policy {
        CallerPolicy::OrchestratorOnly => {
            if caller == orchestrator {
                Ok(())
            } else {
                Err(AccountError::NotOrchestrator)
            }
        }
        CallerPolicy::OrchestratorOrOwner => {
            if caller == orchestrator || caller == owner {
                Ok(())
            } else {
                Err(AccountError::NotAuthorized)
            }
        }
    }
}
