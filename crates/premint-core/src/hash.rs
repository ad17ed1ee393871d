//! Content addressing over canonical bytes
//!
//! Hashing is a pure, deterministic operation: the same bytes always produce
//! the same address. The algorithm is selected once via [`ALGORITHM`]; every
//! caller goes through [`hash`] or [`ContentAddress::of`].
//!
//! Addresses are CIDv1 values: version byte, `raw` codec, then a multihash
//! (algorithm code, digest length, digest). They are rendered in base16
//! multibase (`f` prefix) which content gateways accept alongside other
//! bases.
//!
//! Current algorithm: **SHA-256** (256-bit / 32-byte output)

use crate::errors::{MigrationError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// CID version byte.
const CID_VERSION: u8 = 0x01;

/// Multicodec for raw bytes.
const RAW_CODEC: u8 = 0x55;

/// Multibase prefix for lower-case base16.
const MULTIBASE_BASE16: char = 'f';

/// Synchronous trait for content-addressing hash functions
pub trait HashAlgorithm: Send + Sync + fmt::Debug {
    /// Multihash code identifying the algorithm
    fn multihash_code(&self) -> u8;

    /// Hash arbitrary bytes to a 32-byte digest
    fn hash(&self, data: &[u8]) -> [u8; 32];
}

/// SHA-256 hash implementation
#[derive(Debug, Clone, Copy)]
pub struct Sha256Algorithm;

impl HashAlgorithm for Sha256Algorithm {
    fn multihash_code(&self) -> u8 {
        0x12
    }

    fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

/// The hash algorithm used for every content address.
pub const ALGORITHM: Sha256Algorithm = Sha256Algorithm;

/// Hash bytes with the global algorithm.
#[inline]
pub fn hash(data: &[u8]) -> [u8; 32] {
    ALGORITHM.hash(data)
}

/// Content address of a byte string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentAddress {
    digest: [u8; 32],
}

impl ContentAddress {
    /// Address `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            digest: hash(bytes),
        }
    }

    /// Wrap an existing digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self { digest }
    }

    /// Raw digest.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Binary CID: version, codec, multihash code, digest length, digest.
    pub fn to_cid_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.digest.len());
        out.push(CID_VERSION);
        out.push(RAW_CODEC);
        out.push(ALGORITHM.multihash_code());
        out.push(self.digest.len() as u8);
        out.extend_from_slice(&self.digest);
        out
    }

    /// `ipfs://ipfs/<cid>` form written into on-chain anchors.
    pub fn to_uri(&self) -> String {
        format!("ipfs://ipfs/{self}")
    }

    /// Check that `bytes` hash to this address.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        Self::of(bytes) == *self
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MULTIBASE_BASE16}{}", hex::encode(self.to_cid_bytes()))
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({self})")
    }
}

impl FromStr for ContentAddress {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix(MULTIBASE_BASE16).ok_or_else(|| {
            MigrationError::invalid(format!("content address {s:?} is not base16 multibase"))
        })?;
        let bytes = hex::decode(digits)
            .map_err(|e| MigrationError::invalid(format!("content address {s:?}: {e}")))?;
        match bytes.as_slice() {
            [CID_VERSION, RAW_CODEC, code, 32, digest @ ..]
                if *code == ALGORITHM.multihash_code() && digest.len() == 32 =>
            {
                let mut out = [0u8; 32];
                out.copy_from_slice(digest);
                Ok(Self::from_digest(out))
            }
            _ => Err(MigrationError::invalid(format!(
                "content address {s:?} is not a raw sha2-256 CIDv1"
            ))),
        }
    }
}

impl Serialize for ContentAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_determinism() {
        let data = b"hello world";
        assert_eq!(hash(data), hash(data), "hash should be deterministic");
    }

    #[test]
    fn test_sha256_known_vector() {
        // SHA256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            hex::encode(hash(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_address_layout() {
        let address = ContentAddress::of(b"");
        assert_eq!(
            address.to_string(),
            "f01551220e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            address.to_uri(),
            format!("ipfs://ipfs/{address}")
        );
    }

    #[test]
    fn test_address_parses_back() {
        let address = ContentAddress::of(b"manifest");
        let parsed: ContentAddress = address.to_string().parse().unwrap();
        assert_eq!(parsed, address);
        assert!(parsed.matches(b"manifest"));
        assert!(!parsed.matches(b"manifest "));
    }

    #[test]
    fn test_foreign_cids_are_rejected() {
        assert!("bafkreiexample".parse::<ContentAddress>().is_err());
        // dag-pb codec instead of raw
        let foreign = format!("f0170 1220{}", "00".repeat(32)).replace(' ', "");
        assert!(foreign.parse::<ContentAddress>().is_err());
    }
}
