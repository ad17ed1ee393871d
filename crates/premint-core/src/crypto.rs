//! Signing capability for claim payloads
//!
//! The pipelines only see [`ClaimSigner`]: something with an account that can
//! sign bytes. [`Ed25519Signer`] is the in-process implementation; Ed25519 is
//! deterministic, so re-signing an identical payload reproduces the same
//! signature.

use crate::errors::{MigrationError, Result};
use crate::types::AccountId;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// Length of a signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Raw 64-byte signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureBytes([u8; SIGNATURE_LENGTH]);

impl SignatureBytes {
    /// Wrap raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            MigrationError::crypto(format!(
                "invalid signature length: expected {SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Parse a `0x` hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = crate::hexstr::decode(s)
            .map_err(|e| MigrationError::crypto(format!("invalid signature hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// `0x` hex rendering used in manifests.
    pub fn to_hex(&self) -> String {
        crate::hexstr::encode(self.0)
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({})", self.to_hex())
    }
}

impl Serialize for SignatureBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SignatureBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Signing capability injected into claim generation.
pub trait ClaimSigner {
    /// Account whose key produces the signatures.
    fn account(&self) -> AccountId;

    /// Sign a payload.
    fn sign(&self, payload: &[u8]) -> Result<SignatureBytes>;
}

/// Ed25519 signer holding a secret key in memory.
pub struct Ed25519Signer {
    key: SigningKey,
}

impl Ed25519Signer {
    /// Build from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(seed),
        }
    }

    /// Build from a `0x` hex seed. The decoded buffer is wiped after use.
    pub fn from_seed_hex(seed: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            crate::hexstr::decode(seed)
                .map_err(|e| MigrationError::crypto(format!("invalid signer seed: {e}")))?,
        );
        let seed: Zeroizing<[u8; 32]> = Zeroizing::new(bytes.as_slice().try_into().map_err(
            |_| {
                MigrationError::crypto(format!(
                    "invalid signer seed length: expected 32 bytes, got {}",
                    bytes.len()
                ))
            },
        )?);
        Ok(Self::from_seed(&seed))
    }

    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Seed as `0x` hex. Handle with care: this is secret key material.
    pub fn seed_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(crate::hexstr::encode(self.key.to_bytes()))
    }

    /// Public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Don't expose signing key in debug output
        f.debug_struct("Ed25519Signer")
            .field("signing_key", &"[REDACTED]")
            .field("account", &self.account())
            .finish()
    }
}

impl ClaimSigner for Ed25519Signer {
    fn account(&self) -> AccountId {
        AccountId::from_bytes(self.key.verifying_key().to_bytes())
    }

    fn sign(&self, payload: &[u8]) -> Result<SignatureBytes> {
        Ok(SignatureBytes(self.key.sign(payload).to_bytes()))
    }
}

/// Verify `signature` over `payload` against `account`'s public key.
pub fn verify_signature(
    account: &AccountId,
    payload: &[u8],
    signature: &SignatureBytes,
) -> Result<()> {
    let key = VerifyingKey::from_bytes(account.as_bytes())
        .map_err(|e| MigrationError::crypto(format!("invalid public key {account}: {e}")))?;
    key.verify(payload, &Signature::from_bytes(signature.as_bytes()))
        .map_err(|e| MigrationError::crypto(format!("signature by {account} does not verify: {e}")))
}
