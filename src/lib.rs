pub mod account; // the programmable account state machine
pub mod config;
pub mod crypto;
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod host;
pub mod identity;
pub mod ledger;
pub mod nonce;
pub mod request;
pub mod settlement;

pub use account::{CallerPolicy, SmartAccount, ValidationOutcome};
pub use config::ProtocolConfig;
pub use error::{AccountError, SettlementError};
pub use identity::Address;
pub use request::{DigestScheme, Request};
