//! Fee settlement: moving cost-of-execution from the account to the payee.

use tracing::{debug, warn};

use crate::error::SettlementError;
use crate::host::{Host, TransferFailure};
use crate::identity::Address;

/// Transfer `amount` from `account` to `payee`.
///
/// Zero amounts succeed without touching the host. The balance is checked
/// before any mutation, and the transfer runs with a maximal receive
/// allowance so a payee with non-trivial receive logic cannot fail
/// settlement on resource grounds. Any other transfer failure is reported,
/// never swallowed.
pub fn settle(
    host: &mut dyn Host,
    account: Address,
    payee: Address,
    amount: u128,
) -> Result<(), SettlementError> {
    if amount == 0 {
        return Ok(());
    }

    let available = host.balance_of(account);
    if available < amount {
        return Err(SettlementError::InsufficientFunds {
            needed: amount,
            available,
        });
    }

    match host.transfer(account, payee, amount, u64::MAX) {
        Ok(()) => {
            debug!(%account, %payee, amount, "fee settled");
            Ok(())
        }
        Err(TransferFailure::Insufficient { needed, available }) => {
            Err(SettlementError::InsufficientFunds { needed, available })
        }
        Err(TransferFailure::Rejected) => {
            warn!(%account, %payee, amount, "payee rejected fee transfer");
            Err(SettlementError::TransferRejected)
        }
    }
}
