//! Validation outcome marker shared by the account entry points.

use serde::{Deserialize, Serialize};

/// Fixed-width success sentinel returned by the validation phase. Anything
/// else means rejected; callers must branch on it rather than assume
/// success.
pub const ACCEPT_MARKER: [u8; 4] = *b"HELM";

/// Marker for a rejected validation.
pub const REJECT_MARKER: [u8; 4] = [0u8; 4];

/// Outcome of the validation phase. A mismatched signature is a normal
/// negative result here, not an error.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected,
}

impl ValidationOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }

    /// The wire-level marker for this outcome.
    pub fn marker(self) -> [u8; 4] {
        match self {
            ValidationOutcome::Accepted => ACCEPT_MARKER,
            ValidationOutcome::Rejected => REJECT_MARKER,
        }
    }

    /// Accepted iff the marker is exactly `ACCEPT_MARKER`.
    pub fn from_marker(marker: [u8; 4]) -> Self {
        if marker == ACCEPT_MARKER {
            ValidationOutcome::Accepted
        } else {
            ValidationOutcome::Rejected
        }
    }
}
