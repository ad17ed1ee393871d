//! Key test helpers
//!
//! Deterministic signing keys so that signatures, manifests and content
//! addresses are stable across test runs.

use ed25519_dalek::{SigningKey, VerifyingKey};
use premint_core::{AccountId, Ed25519Signer};
use sha2::{Digest, Sha256};

/// Key test fixture for consistent test key generation
#[derive(Debug, Clone)]
pub struct KeyTestFixture {
    seed: [u8; 32],
    verifying_key: VerifyingKey,
}

impl KeyTestFixture {
    /// Create a key fixture from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let verifying_key = SigningKey::from_bytes(seed).verifying_key();
        Self {
            seed: *seed,
            verifying_key,
        }
    }

    /// Create a key fixture from a seed string
    pub fn from_seed_string(seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        Self::from_seed(&hasher.finalize().into())
    }

    /// Signer over the fixture's key
    pub fn signer(&self) -> Ed25519Signer {
        Ed25519Signer::from_seed(&self.seed)
    }

    /// Account of the fixture's key
    pub fn account(&self) -> AccountId {
        AccountId::from_bytes(self.verifying_key.to_bytes())
    }

    /// Seed as `0x` hex, the form the CLI reads from its environment
    pub fn seed_hex(&self) -> String {
        premint_core::hexstr::encode(self.seed)
    }
}

/// Account derived from a seed string
pub fn test_account(seed: &str) -> AccountId {
    KeyTestFixture::from_seed_string(seed).account()
}

#[cfg(test)]
mod tests {
    use super::*;
    use premint_core::ClaimSigner;

    #[test]
    fn same_seed_same_account() {
        assert_eq!(test_account("alice"), test_account("alice"));
        assert_ne!(test_account("alice"), test_account("bob"));
    }

    #[test]
    fn signer_matches_account() {
        let fixture = KeyTestFixture::from_seed_string("signer");
        assert_eq!(fixture.signer().account(), fixture.account());
    }

    #[test]
    fn seed_hex_restores_signer() {
        let fixture = KeyTestFixture::from_seed_string("signer");
        let restored = Ed25519Signer::from_seed_hex(&fixture.seed_hex()).unwrap();
        assert_eq!(restored.account(), fixture.account());
    }
}
