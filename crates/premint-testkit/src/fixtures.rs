//! Ready-made migration scenarios

use crate::keys::KeyTestFixture;
use crate::registry::RegistryBuilder;
use crate::time::FixedClock;
use premint_core::permissions::role;
use premint_core::{AccountId, CollectionId, Ed25519Signer, RegistryKind, RegistrySnapshot};

/// Source collection used by [`MigrationFixture::standard`].
pub const SOURCE: u32 = 12;

/// Target collection used by [`MigrationFixture::standard`].
pub const TARGET: u32 = 34;

/// Collection metadata shared by both collections.
pub const COLLECTION_METADATA: &[u8] = b"ipfs://collection";

/// Signer, holders and a registry pair ready for migration.
#[derive(Debug, Clone)]
pub struct MigrationFixture {
    /// Key of the collection owner, who also signs claims.
    pub signer_key: KeyTestFixture,
    /// Item holders A, B and C.
    pub holders: [AccountId; 3],
    /// Registry builder with both collections and three source items.
    pub builder: RegistryBuilder,
}

impl MigrationFixture {
    /// Owner holds `Admin` + `Issuer` on the target; items 1, 2 and 3 are
    /// held by A, B and C on the source; nothing is minted on the target.
    pub fn standard() -> Self {
        let signer_key = KeyTestFixture::from_seed_string("collection-owner");
        let owner = signer_key.account();
        let holders = [
            KeyTestFixture::from_seed_string("holder-a").account(),
            KeyTestFixture::from_seed_string("holder-b").account(),
            KeyTestFixture::from_seed_string("holder-c").account(),
        ];

        let builder = RegistryBuilder::new(1_000, 9430)
            .collection(RegistryKind::Legacy, SOURCE, owner, COLLECTION_METADATA)
            .collection(RegistryKind::Current, TARGET, owner, COLLECTION_METADATA)
            .roles(TARGET, owner, &[role::ADMIN, role::ISSUER])
            .item(RegistryKind::Legacy, SOURCE, 1, holders[0], Some(b"ipfs://item-1"))
            .item(RegistryKind::Legacy, SOURCE, 2, holders[1], Some(b"ipfs://item-2"))
            .item(RegistryKind::Legacy, SOURCE, 3, holders[2], None);

        Self {
            signer_key,
            holders,
            builder,
        }
    }

    /// Signer for the collection owner.
    pub fn signer(&self) -> Ed25519Signer {
        self.signer_key.signer()
    }

    /// Collection owner account.
    pub fn owner(&self) -> AccountId {
        self.signer_key.account()
    }

    /// Source collection id.
    pub fn source(&self) -> CollectionId {
        CollectionId::new(SOURCE)
    }

    /// Target collection id.
    pub fn target(&self) -> CollectionId {
        CollectionId::new(TARGET)
    }

    /// Registry snapshot for the current builder state.
    pub fn registry(&self) -> RegistrySnapshot {
        self.builder.clone().build()
    }

    /// Clock used for manifest provenance.
    pub fn clock(&self) -> FixedClock {
        FixedClock::at(1_700_000_000_000)
    }
}
