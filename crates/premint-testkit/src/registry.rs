//! In-memory registry construction
//!
//! [`RegistryBuilder`] assembles a [`RegistrySnapshot`] with named roles and
//! settings, encoding them through the permission table so tests never
//! hard-code bit patterns.

use premint_core::registry::{SnapshotCollection, SnapshotItem};
use premint_core::{
    AccountId, BlockNumber, CollectionId, CollectionMetadata, ItemId, PermissionDomain,
    PermissionTable, RegistryKind, RegistrySnapshot,
};
use std::collections::BTreeMap;

/// Builder for registry snapshots.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    snapshot: RegistrySnapshot,
    table: PermissionTable,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new(100, 9430)
    }
}

impl RegistryBuilder {
    /// Empty registries at `height`.
    pub fn new(height: u32, runtime_version: u32) -> Self {
        Self {
            snapshot: RegistrySnapshot::new(BlockNumber::new(height), runtime_version),
            table: PermissionTable::v1(),
        }
    }

    /// Add a collection. Current-registry collections start with every
    /// setting enabled.
    pub fn collection(mut self, kind: RegistryKind, id: u32, owner: AccountId, metadata: &[u8]) -> Self {
        let settings = match kind {
            RegistryKind::Legacy => None,
            RegistryKind::Current => Some(0),
        };
        self.snapshot.registry_mut(kind).collections.insert(
            CollectionId::new(id),
            SnapshotCollection {
                owner,
                metadata: Some(CollectionMetadata {
                    data: metadata.to_vec(),
                    is_frozen: false,
                }),
                settings,
                roles: BTreeMap::new(),
                items: Vec::new(),
            },
        );
        self
    }

    /// Add an item to an existing collection.
    pub fn item(
        mut self,
        kind: RegistryKind,
        collection: u32,
        id: u32,
        owner: AccountId,
        metadata: Option<&[u8]>,
    ) -> Self {
        self.entry(kind, collection).items.push(SnapshotItem {
            id: ItemId::new(id),
            owner,
            metadata: metadata.map(<[u8]>::to_vec),
        });
        self
    }

    /// Grant named `CollectionRole` flags on a current-registry collection.
    pub fn roles(mut self, collection: u32, account: AccountId, roles: &[&str]) -> Self {
        let value = self
            .table
            .flag_set(PermissionDomain::CollectionRole)
            .and_then(|flags| flags.encode(roles))
            .expect("known role names");
        self.entry(RegistryKind::Current, collection)
            .roles
            .insert(account, value);
        self
    }

    /// Enable exactly the named `CollectionSetting` flags.
    pub fn settings(mut self, collection: u32, enabled: &[&str]) -> Self {
        let value = self
            .table
            .flag_set(PermissionDomain::CollectionSetting)
            .and_then(|flags| flags.encode(enabled))
            .expect("known setting names");
        self.entry(RegistryKind::Current, collection).settings = Some(value);
        self
    }

    /// Remove the settings record entirely.
    pub fn without_settings(mut self, collection: u32) -> Self {
        self.entry(RegistryKind::Current, collection).settings = None;
        self
    }

    /// Freeze a collection's metadata.
    pub fn frozen(mut self, kind: RegistryKind, collection: u32) -> Self {
        if let Some(metadata) = self.entry(kind, collection).metadata.as_mut() {
            metadata.is_frozen = true;
        }
        self
    }

    /// Record a live variant list for a permission domain.
    pub fn variants(mut self, domain: PermissionDomain, names: &[&str]) -> Self {
        self.snapshot
            .permission_variants
            .insert(domain, names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Finish.
    pub fn build(self) -> RegistrySnapshot {
        self.snapshot
    }

    fn entry(&mut self, kind: RegistryKind, collection: u32) -> &mut SnapshotCollection {
        self.snapshot
            .registry_mut(kind)
            .collections
            .get_mut(&CollectionId::new(collection))
            .expect("collection added before use")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::test_account;
    use premint_core::permissions::{role, setting};
    use premint_core::RegistryQuery;

    #[test]
    fn roles_and_settings_are_encoded_by_name() {
        let owner = test_account("owner");
        let registry = RegistryBuilder::default()
            .collection(RegistryKind::Current, 34, owner, b"meta")
            .roles(34, owner, &[role::ADMIN, role::ISSUER])
            .settings(34, &[setting::UNLOCKED_METADATA])
            .build();

        assert_eq!(
            registry.collection_role(CollectionId::new(34), &owner).unwrap(),
            Some(0b101)
        );
        // inverted: every bit set except UnlockedMetadata
        assert_eq!(
            registry.collection_settings(CollectionId::new(34)).unwrap(),
            Some(0b11101)
        );
    }

    #[test]
    fn frozen_marks_metadata() {
        let owner = test_account("owner");
        let registry = RegistryBuilder::default()
            .collection(RegistryKind::Legacy, 12, owner, b"meta")
            .frozen(RegistryKind::Legacy, 12)
            .build();
        let metadata = registry
            .collection_metadata(RegistryKind::Legacy, CollectionId::new(12))
            .unwrap()
            .unwrap();
        assert!(metadata.is_frozen);
    }
}
