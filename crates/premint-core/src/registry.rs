//! Registry query interface
//!
//! Registry reads are performed by an external collaborator; this module
//! only fixes the shape of what the pipelines consume. `None` from any query
//! means the registry has no record. It is never interpreted as zero.
//!
//! [`RegistrySnapshot`] is a serde-loadable implementation holding a
//! point-in-time export of both registries. The CLI runs against snapshots
//! and tests build them in memory.

use crate::errors::{MigrationError, Result};
use crate::permissions::PermissionDomain;
use crate::types::{AccountId, BlockNumber, CollectionId, ItemId, RegistryKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Collection-level details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDetails {
    /// Collection owner.
    pub owner: AccountId,
}

/// Collection metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    /// Opaque metadata bytes.
    #[serde(with = "crate::hexstr::bytes")]
    pub data: Vec<u8>,
    /// Whether the metadata (and attributes) are frozen.
    #[serde(default)]
    pub is_frozen: bool,
}

/// An item and its current owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOwnership {
    /// Item identifier.
    pub id: ItemId,
    /// Current owner.
    pub owner: AccountId,
}

/// Read-only view of the source and target registries.
pub trait RegistryQuery {
    /// Current chain height.
    fn chain_height(&self) -> Result<BlockNumber>;

    /// Runtime version recorded in manifest provenance.
    fn runtime_version(&self) -> Result<u32>;

    /// Collection details.
    fn collection(
        &self,
        registry: RegistryKind,
        collection: CollectionId,
    ) -> Result<Option<CollectionDetails>>;

    /// Collection metadata.
    fn collection_metadata(
        &self,
        registry: RegistryKind,
        collection: CollectionId,
    ) -> Result<Option<CollectionMetadata>>;

    /// Encoded `CollectionRole` value `account` holds on a current-registry
    /// collection.
    fn collection_role(&self, collection: CollectionId, account: &AccountId)
        -> Result<Option<u32>>;

    /// Encoded `CollectionSetting` value of a current-registry collection.
    fn collection_settings(&self, collection: CollectionId) -> Result<Option<u32>>;

    /// Items of a collection with their owners, in registry order.
    fn items(&self, registry: RegistryKind, collection: CollectionId)
        -> Result<Vec<ItemOwnership>>;

    /// Metadata of a single item.
    fn item_metadata(
        &self,
        registry: RegistryKind,
        collection: CollectionId,
        item: ItemId,
    ) -> Result<Option<Vec<u8>>>;

    /// Item ids of a collection.
    fn item_ids(&self, registry: RegistryKind, collection: CollectionId) -> Result<Vec<ItemId>> {
        Ok(self
            .items(registry, collection)?
            .into_iter()
            .map(|item| item.id)
            .collect())
    }

    /// Variant names the live runtime reports for a permission domain, if
    /// the collaborator can read them.
    fn permission_variants(&self, _domain: PermissionDomain) -> Result<Option<Vec<String>>> {
        Ok(None)
    }
}

/// An item as recorded in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotItem {
    /// Item identifier.
    pub id: ItemId,
    /// Current owner.
    pub owner: AccountId,
    /// Item metadata, if any.
    #[serde(default, with = "crate::hexstr::option", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<u8>>,
}

/// A collection as recorded in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCollection {
    /// Collection owner.
    pub owner: AccountId,
    /// Collection metadata, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CollectionMetadata>,
    /// Encoded settings (current registry only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<u32>,
    /// Encoded roles per account (current registry only).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<AccountId, u32>,
    /// Items in registry order.
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

/// Collections of one registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRegistry {
    /// Collections by id.
    #[serde(default)]
    pub collections: BTreeMap<CollectionId, SnapshotCollection>,
}

/// Point-in-time export of both registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    /// Chain height at export time.
    pub height: BlockNumber,
    /// Runtime version at export time.
    pub runtime_version: u32,
    /// Source registry.
    #[serde(default)]
    pub legacy: SnapshotRegistry,
    /// Target registry.
    #[serde(default)]
    pub current: SnapshotRegistry,
    /// Live permission variant lists, when exported.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub permission_variants: BTreeMap<PermissionDomain, Vec<String>>,
}

impl RegistrySnapshot {
    /// Empty snapshot at `height`.
    pub fn new(height: BlockNumber, runtime_version: u32) -> Self {
        Self {
            height,
            runtime_version,
            legacy: SnapshotRegistry::default(),
            current: SnapshotRegistry::default(),
            permission_variants: BTreeMap::new(),
        }
    }

    /// Parse a JSON snapshot.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| MigrationError::registry(format!("invalid registry snapshot: {e}")))
    }

    /// Load a JSON snapshot from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            MigrationError::registry(format!(
                "failed to read registry snapshot {}: {e}",
                path.display()
            ))
        })?;
        let snapshot = Self::from_json(&bytes)?;
        debug!(
            path = %path.display(),
            height = %snapshot.height,
            legacy = snapshot.legacy.collections.len(),
            current = snapshot.current.collections.len(),
            "registry snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Registry by kind.
    pub fn registry(&self, kind: RegistryKind) -> &SnapshotRegistry {
        match kind {
            RegistryKind::Legacy => &self.legacy,
            RegistryKind::Current => &self.current,
        }
    }

    /// Mutable registry by kind.
    pub fn registry_mut(&mut self, kind: RegistryKind) -> &mut SnapshotRegistry {
        match kind {
            RegistryKind::Legacy => &mut self.legacy,
            RegistryKind::Current => &mut self.current,
        }
    }

    fn find(&self, kind: RegistryKind, collection: CollectionId) -> Option<&SnapshotCollection> {
        self.registry(kind).collections.get(&collection)
    }
}

impl RegistryQuery for RegistrySnapshot {
    fn chain_height(&self) -> Result<BlockNumber> {
        Ok(self.height)
    }

    fn runtime_version(&self) -> Result<u32> {
        Ok(self.runtime_version)
    }

    fn collection(
        &self,
        registry: RegistryKind,
        collection: CollectionId,
    ) -> Result<Option<CollectionDetails>> {
        Ok(self
            .find(registry, collection)
            .map(|c| CollectionDetails { owner: c.owner }))
    }

    fn collection_metadata(
        &self,
        registry: RegistryKind,
        collection: CollectionId,
    ) -> Result<Option<CollectionMetadata>> {
        Ok(self
            .find(registry, collection)
            .and_then(|c| c.metadata.clone()))
    }

    fn collection_role(
        &self,
        collection: CollectionId,
        account: &AccountId,
    ) -> Result<Option<u32>> {
        Ok(self
            .find(RegistryKind::Current, collection)
            .and_then(|c| c.roles.get(account).copied()))
    }

    fn collection_settings(&self, collection: CollectionId) -> Result<Option<u32>> {
        Ok(self
            .find(RegistryKind::Current, collection)
            .and_then(|c| c.settings))
    }

    fn items(
        &self,
        registry: RegistryKind,
        collection: CollectionId,
    ) -> Result<Vec<ItemOwnership>> {
        Ok(self
            .find(registry, collection)
            .map(|c| {
                c.items
                    .iter()
                    .map(|item| ItemOwnership {
                        id: item.id,
                        owner: item.owner,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn item_metadata(
        &self,
        registry: RegistryKind,
        collection: CollectionId,
        item: ItemId,
    ) -> Result<Option<Vec<u8>>> {
        Ok(self.find(registry, collection).and_then(|c| {
            c.items
                .iter()
                .find(|i| i.id == item)
                .and_then(|i| i.metadata.clone())
        }))
    }

    fn permission_variants(&self, domain: PermissionDomain) -> Result<Option<Vec<String>>> {
        Ok(self.permission_variants.get(&domain).cloned())
    }
}
