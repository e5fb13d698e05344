//! Routing of a validated request's action.
//!
//! The target is resolved once into a `DispatchPath`; privileged system
//! targets go through the host's privileged call with the full available
//! budget, everything else is an ordinary call with the caller's gas limit.
//! Dispatch never retries; retry is an orchestrator concern.

use tracing::debug;

use crate::config::ProtocolConfig;
use crate::error::AccountError;
use crate::host::Host;
use crate::identity::Address;

/// Which call path a target resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPath {
    Privileged(Address),
    Ordinary(Address),
}

impl DispatchPath {
    pub fn resolve(config: &ProtocolConfig, target: Address) -> Self {
        if config.is_system_target(target) {
            DispatchPath::Privileged(target)
        } else {
            DispatchPath::Ordinary(target)
        }
    }
}

/// Perform the requested call on behalf of `from`. Failure aborts the whole
/// request; the callee's raw failure payload is preserved for diagnostics.
pub fn dispatch(
    host: &mut dyn Host,
    config: &ProtocolConfig,
    from: Address,
    target: Address,
    value: u128,
    payload: &[u8],
    gas_limit: u64,
) -> Result<Vec<u8>, AccountError> {
    match DispatchPath::resolve(config, target) {
        DispatchPath::Privileged(target) => {
            debug!(%from, %target, value, "privileged dispatch");
            host.call_privileged(u64::MAX, from, target, value, payload)
                .map_err(|f| AccountError::ExecutionFailed { revert: f.revert })
        }
        DispatchPath::Ordinary(target) => {
            debug!(%from, %target, value, gas_limit, "ordinary dispatch");
            host.call(from, target, value, payload, gas_limit)
                .map_err(|f| AccountError::ExecutionFailed { revert: f.revert })
        }
    }
}
