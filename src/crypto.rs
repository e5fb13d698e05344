//! secp256k1 signing and identity recovery.
//!
//! The protocol never verifies against a known public key directly: it
//! recovers a candidate identity from (digest, signature) and compares it to
//! the expected owner. A malformed signature is a recovery failure, which is
//! a distinct outcome from "recovered but mismatched" even though both read
//! as rejected to callers.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;

use crate::identity::Address;
use crate::request::{DigestScheme, Request};

/// Why identity recovery failed, before any owner comparison happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverError {
    /// Wrong length or r/s bytes that do not parse as a signature.
    MalformedSignature,
    /// v byte outside {0, 1, 27, 28}.
    BadRecoveryId,
    /// Recovery produced no valid curve point for this digest.
    NotOnCurve,
    SigningFailed,
}

pub struct KeyPair {
    pub signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh secp256k1 keypair
    pub fn generate() -> Self {
        KeyPair {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Restore a keypair from raw secret scalar bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|e| format!("invalid secret key: {}", e))?;
        Ok(KeyPair { signing_key })
    }

    /// The 20-byte identity this key controls
    pub fn address(&self) -> Address {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        Address::from_public_key(point.as_bytes()).expect("uncompressed point is 65 bytes")
    }

    /// Sign a 32-byte digest, returning the 65-byte r||s||v blob
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; 65], RecoverError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| RecoverError::SigningFailed)?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }

    /// Secret scalar as hex (for the key-generation helper)
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }
}

/// Recover the signer's address from a 32-byte digest and a 65-byte
/// r||s||v signature. v is accepted as 0/1 or the legacy 27/28.
pub fn recover_address(digest: &[u8; 32], signature: &[u8]) -> Result<Address, RecoverError> {
    if signature.len() != 65 {
        return Err(RecoverError::MalformedSignature);
    }

    let v = match signature[64] {
        v @ 0..=1 => v,
        v @ 27..=28 => v - 27,
        _ => return Err(RecoverError::BadRecoveryId),
    };
    let recovery_id = RecoveryId::from_byte(v).ok_or(RecoverError::BadRecoveryId)?;

    let sig = Signature::from_slice(&signature[..64]).map_err(|_| RecoverError::MalformedSignature)?;

    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| RecoverError::NotOnCurve)?;

    let point = key.to_encoded_point(false);
    Address::from_public_key(point.as_bytes()).ok_or(RecoverError::NotOnCurve)
}

/// Signature check parameterized by the deployment's digest convention.
///
/// The pre-image scheme is a deployment-time choice, so it lives here rather
/// than being re-decided at every call site.
#[derive(Debug, Clone, Copy)]
pub struct SignatureValidator {
    scheme: DigestScheme,
}

impl SignatureValidator {
    pub fn new(scheme: DigestScheme) -> Self {
        SignatureValidator { scheme }
    }

    pub fn scheme(&self) -> DigestScheme {
        self.scheme
    }

    /// The digest a signature over `request` must cover.
    pub fn digest_of(&self, request: &Request) -> [u8; 32] {
        request.signing_digest(self.scheme)
    }

    /// True iff the signature over `digest` recovers to `expected`.
    ///
    /// Never errors for a syntactically well-formed signature; a wrong
    /// digest or wrong key simply fails. Read-only and idempotent.
    pub fn validate(&self, digest: &[u8; 32], signature: &[u8], expected: Address) -> bool {
        match recover_address(digest, signature) {
            Ok(recovered) => recovered == expected,
            Err(_) => false,
        }
    }
}
