//! Strongly typed registry identifiers.

use crate::errors::MigrationError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of a collection within a registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(transparent)]
pub struct CollectionId(u32);

impl CollectionId {
    /// Create a new collection identifier.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Return the raw identifier.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for CollectionId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionId {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|e| MigrationError::invalid(format!("invalid collection id {s:?}: {e}")))
    }
}

/// Identifier of an item within a collection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Create a new item identifier.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Return the raw identifier.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for ItemId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chain height. Replay deadlines are expressed in this unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(transparent)]
pub struct BlockNumber(u32);

impl BlockNumber {
    /// Create a new block number.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Return the raw height.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Add a window of blocks, failing on overflow.
    pub fn checked_add(self, blocks: u32) -> Option<Self> {
        self.0.checked_add(blocks).map(Self)
    }
}

impl From<u32> for BlockNumber {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 32-byte account identifier (an Ed25519 public key).
///
/// Rendered as a `0x`-prefixed lower-case hex string wherever it is shown or
/// serialized. SCALE-encodes as the bare 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Wrap raw public key bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Address string used in manifests and reports.
    pub fn to_address(&self) -> String {
        crate::hexstr::encode(self.0)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_address())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl FromStr for AccountId {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = crate::hexstr::decode_array::<32>(s)
            .map_err(|e| MigrationError::invalid(format!("invalid account {s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_address())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Which registry a collection lives on.
///
/// `Legacy` is the source registry items migrate away from; `Current` is the
/// target registry where claims are redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// Source registry (`uniques`).
    #[serde(alias = "uniques")]
    Legacy,
    /// Target registry (`nfts`).
    #[serde(alias = "nfts")]
    Current,
}

impl RegistryKind {
    /// Pallet name used in artifact file names.
    pub fn pallet_name(&self) -> &'static str {
        match self {
            RegistryKind::Legacy => "uniques",
            RegistryKind::Current => "nfts",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Legacy => write!(f, "legacy"),
            RegistryKind::Current => write!(f, "current"),
        }
    }
}

impl FromStr for RegistryKind {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "uniques" => Ok(RegistryKind::Legacy),
            "current" | "nfts" => Ok(RegistryKind::Current),
            other => Err(MigrationError::invalid(format!(
                "unknown registry kind {other:?} (expected legacy or current)"
            ))),
        }
    }
}
