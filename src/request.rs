//! The request a caller submits to a programmable account.
//!
//! Generalizes the source variants' user-operation/transaction shapes into
//! one semantic field set. The digest a signature covers is a SHA-256 over
//! the canonical encoding of every field except the signature itself.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{self, Write};

use crate::crypto::{KeyPair, RecoverError};
use crate::encoding::CanonicalSerialize;
use crate::identity::Address;

/// Fixed domain-separation prefix for the wrapped pre-image convention.
pub const DOMAIN_PREFIX: &[u8] = b"\x19Helm Signed Request:\n32";

/// Which pre-image convention the deployment signs under.
///
/// Chosen once per deployment in `ProtocolConfig`, never per request. The
/// two source variants disagree on this, so it is parameterized instead of
/// unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DigestScheme {
    /// Sign the structural hash directly.
    #[default]
    Raw,
    /// Re-hash the structural hash under `DOMAIN_PREFIX` first.
    DomainPrefixed,
}

/// A single request into an account: who, what, and the anti-replay and fee
/// envelope around it. Constructed and owned by the caller; the account
/// never retains it past the call that processes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub sender: Address,
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
    /// Strictly sequential per (sender, lane).
    pub sequence: u64,
    /// Independent sequence lane; 0 unless the caller runs parallel lanes.
    pub lane: u64,
    pub gas_limit: u64,
    pub fee_budget: u128,
    /// 65-byte r||s||v blob, detached from the digest pre-image.
    pub signature: Vec<u8>,
}

impl Request {
    pub fn new(sender: Address, target: Address, value: u128, payload: Vec<u8>, sequence: u64) -> Self {
        Request {
            sender,
            target,
            value,
            payload,
            sequence,
            lane: 0,
            gas_limit: 1_000_000,
            fee_budget: 0,
            signature: Vec::new(),
        }
    }

    /// Total the account must be able to cover: forwarded value plus fee budget.
    pub fn total_debit(&self) -> u128 {
        self.value.saturating_add(self.fee_budget)
    }

    /// Structural hash: SHA-256 over the canonical field encoding.
    pub fn structural_digest(&self) -> [u8; 32] {
        let hash = Sha256::digest(self.to_bytes());
        hash.into()
    }

    /// The digest a signature must cover under the given scheme.
    pub fn signing_digest(&self, scheme: DigestScheme) -> [u8; 32] {
        let structural = self.structural_digest();
        match scheme {
            DigestScheme::Raw => structural,
            DigestScheme::DomainPrefixed => {
                let mut hasher = Sha256::new();
                hasher.update(DOMAIN_PREFIX);
                hasher.update(structural);
                hasher.finalize().into()
            }
        }
    }

    /// Sign this request with `keypair` under `scheme`, filling the
    /// signature field.
    pub fn signed(mut self, keypair: &KeyPair, scheme: DigestScheme) -> Result<Self, RecoverError> {
        let digest = self.signing_digest(scheme);
        self.signature = keypair.sign_digest(&digest)?.to_vec();
        Ok(self)
    }
}

impl CanonicalSerialize for Request {
    // The signature is detached: it must never feed its own pre-image.
    fn canonical_serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.sender.canonical_serialize(writer)?;
        self.target.canonical_serialize(writer)?;
        self.value.canonical_serialize(writer)?;
        self.payload.canonical_serialize(writer)?;
        self.sequence.canonical_serialize(writer)?;
        self.lane.canonical_serialize(writer)?;
        self.gas_limit.canonical_serialize(writer)?;
        self.fee_budget.canonical_serialize(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Request {
        Request::new(
            Address([1u8; 20]),
            Address([2u8; 20]),
            5,
            vec![0xde, 0xad],
            0,
        )
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(sample().structural_digest(), sample().structural_digest());
    }

    #[test]
    fn test_digest_ignores_signature() {
        let unsigned = sample();
        let mut signed = sample();
        signed.signature = vec![0xaa; 65];
        assert_eq!(unsigned.structural_digest(), signed.structural_digest());
    }

    #[test]
    fn test_digest_covers_every_other_field() {
        let base = sample();

        let mut changed = base.clone();
        changed.sequence = 1;
        assert_ne!(base.structural_digest(), changed.structural_digest());

        let mut changed = base.clone();
        changed.fee_budget = 1;
        assert_ne!(base.structural_digest(), changed.structural_digest());

        let mut changed = base.clone();
        changed.lane = 1;
        assert_ne!(base.structural_digest(), changed.structural_digest());
    }

    #[test]
    fn test_schemes_diverge() {
        let req = sample();
        assert_ne!(
            req.signing_digest(DigestScheme::Raw),
            req.signing_digest(DigestScheme::DomainPrefixed)
        );
    }

    #[test]
    fn test_signed_request_recovers_signer() {
        let keypair = KeyPair::generate();
        let req = sample().signed(&keypair, DigestScheme::DomainPrefixed).unwrap();

        let digest = req.signing_digest(DigestScheme::DomainPrefixed);
        let recovered = crate::crypto::recover_address(&digest, &req.signature).unwrap();
        assert_eq!(recovered, keypair.address());
    }
}
