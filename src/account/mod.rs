//! The programmable account itself.
//!
//! This module composes the leaf components into the account's public entry
//! points:
//! - Caller authorization policies (`gate`)
//! - The validation outcome marker (`types`)
//! - The validate → settle → execute state machine (`protocol`)

pub mod gate;
pub mod protocol;
pub mod types;

pub use gate::{authorize, CallerPolicy};
pub use protocol::SmartAccount;
pub use types::{ValidationOutcome, ACCEPT_MARKER};
