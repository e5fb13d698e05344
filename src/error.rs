use thiserror::Error;

/// Crate-wide failure taxonomy for the account protocol.
///
/// Every phase either completes fully or aborts the whole request with one
/// of these; there is no local recovery or retry inside the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("caller is not the orchestrator")]
    NotOrchestrator,
    #[error("caller is neither the orchestrator nor the account owner")]
    NotAuthorized,
    #[error("replay sequence mismatch: expected {expected}, presented {presented}")]
    ReplaySequence { expected: u64, presented: u64 },
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },
    #[error("invalid signature")]
    InvalidSignature,
    #[error("failed to pay fee: {0}")]
    FailedToPay(#[from] SettlementError),
    #[error("execution failed ({} bytes of failure data)", revert.len())]
    ExecutionFailed { revert: Vec<u8> },
    #[error("config error: {0}")]
    Config(String),
}

/// Failures raised by the fee-settlement path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u128, available: u128 },
    #[error("payee rejected the transfer")]
    TransferRejected,
}
