//! On-chain anchoring of a manifest's content address
//!
//! Two collection attributes point redeemers at the manifest: its address
//! and the storage provider holding it. An [`AnchorRecord`] can only be built
//! from an [`AnchorAuthorization`], and the only way to get one is
//! [`AnchorGate::authorize`], so an anchor is never produced for an actor
//! that cannot write it.

use premint_core::permissions::{role, setting};
use premint_core::{
    AccountId, CollectionId, ContentAddress, MigrationError, PermissionDomain, PermissionGate,
    PermissionTable, RegistryKind, RegistryQuery, Result,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, info};

/// Attribute key holding the manifest URI.
pub const CID_KEY: &str = "offchain-mint";

/// Attribute key holding the storage provider.
pub const PROVIDER_KEY: &str = "offchain-mint-ipfs-provider";

/// Attribute namespace on the current registry.
pub const CURRENT_NAMESPACE: &str = "CollectionOwner";

/// Proof that an actor may write anchor attributes on a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorAuthorization {
    registry: RegistryKind,
    collection: CollectionId,
    actor: AccountId,
}

impl AnchorAuthorization {
    /// Registry the attributes go to.
    pub fn registry(&self) -> RegistryKind {
        self.registry
    }

    /// Collection the attributes go to.
    pub fn collection(&self) -> CollectionId {
        self.collection
    }

    /// Authorized actor.
    pub fn actor(&self) -> AccountId {
        self.actor
    }
}

/// Checks whether an actor may anchor on a collection.
#[derive(Debug, Clone, Copy)]
pub struct AnchorGate<'a> {
    table: &'a PermissionTable,
}

impl<'a> AnchorGate<'a> {
    /// Gate using `table` for role and setting bits.
    pub fn new(table: &'a PermissionTable) -> Self {
        Self { table }
    }

    /// Authorize `actor` to write attributes on `collection`.
    ///
    /// Legacy collections require ownership and unfrozen metadata. Current
    /// collections require the `Admin` role and the `UnlockedAttributes`
    /// setting.
    pub fn authorize<R: RegistryQuery + ?Sized>(
        &self,
        registry: &R,
        kind: RegistryKind,
        collection: CollectionId,
        actor: &AccountId,
    ) -> Result<AnchorAuthorization> {
        let details = registry
            .collection(kind, collection)?
            .ok_or(MigrationError::CollectionNotFound {
                registry: kind,
                collection,
            })?;

        match kind {
            RegistryKind::Legacy => {
                if details.owner != *actor {
                    return Err(MigrationError::permission_denied(
                        format!("{kind} collection {collection} by {actor}"),
                        vec!["Owner".to_string()],
                    ));
                }
                let frozen = registry
                    .collection_metadata(kind, collection)?
                    .is_some_and(|metadata| metadata.is_frozen);
                if frozen {
                    return Err(MigrationError::CollectionFrozen { collection });
                }
            }
            RegistryKind::Current => {
                let roles = self.table.flag_set(PermissionDomain::CollectionRole)?;
                PermissionGate::new(&roles, format!("{kind} collection {collection} by {actor}"))
                    .require_all(registry.collection_role(collection, actor)?, &[role::ADMIN])?;

                let settings = self.table.flag_set(PermissionDomain::CollectionSetting)?;
                let locked = PermissionGate::new(&settings, format!("{kind} collection {collection}"))
                    .missing(
                        registry.collection_settings(collection)?,
                        &[setting::UNLOCKED_ATTRIBUTES],
                    )?;
                if !locked.is_empty() {
                    return Err(MigrationError::CollectionLocked { collection });
                }
            }
        }

        debug!(registry = %kind, collection = %collection, actor = %actor, "anchor authorized");
        Ok(AnchorAuthorization {
            registry: kind,
            collection,
            actor: *actor,
        })
    }
}

/// A single attribute write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// The attribute pair anchoring a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRecord {
    authorization: AnchorAuthorization,
    address: ContentAddress,
    entries: [AttributeEntry; 2],
}

impl AnchorRecord {
    /// Build the record for an authorized collection.
    pub fn build(
        authorization: &AnchorAuthorization,
        address: ContentAddress,
        provider: &str,
    ) -> Self {
        let entries = [
            AttributeEntry {
                key: CID_KEY.to_string(),
                value: address.to_uri(),
            },
            AttributeEntry {
                key: PROVIDER_KEY.to_string(),
                value: provider.to_string(),
            },
        ];
        Self {
            authorization: authorization.clone(),
            address,
            entries,
        }
    }

    /// Anchored address.
    pub fn address(&self) -> ContentAddress {
        self.address
    }

    /// The two attribute entries, address first.
    pub fn entries(&self) -> &[AttributeEntry] {
        &self.entries
    }

    /// Submission to hand to the transaction collaborator.
    pub fn submission(&self) -> AnchorSubmission {
        let registry = self.authorization.registry;
        AnchorSubmission {
            registry,
            collection: self.authorization.collection,
            signer: self.authorization.actor,
            namespace: match registry {
                RegistryKind::Legacy => None,
                RegistryKind::Current => Some(CURRENT_NAMESPACE.to_string()),
            },
            entries: self.entries.to_vec(),
        }
    }
}

/// Attribute writes to submit as one atomic batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSubmission {
    /// Target registry.
    pub registry: RegistryKind,
    /// Collection receiving the attributes.
    pub collection: CollectionId,
    /// Account that must sign the batch.
    pub signer: AccountId,
    /// Attribute namespace, current registry only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Attribute writes in submission order.
    pub entries: Vec<AttributeEntry>,
}

/// Receives anchor submissions.
pub trait SubmissionSink {
    /// Accept a submission. The batch must be applied all-or-nothing.
    fn submit(&mut self, submission: &AnchorSubmission) -> Result<()>;
}

/// Writes submissions as JSON, one document per submission.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    /// Sink over `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SubmissionSink for JsonSink<W> {
    fn submit(&mut self, submission: &AnchorSubmission) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, submission)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        info!(
            registry = %submission.registry,
            collection = %submission.collection,
            entries = submission.entries.len(),
            "anchor submission written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use premint_core::registry::SnapshotCollection;
    use premint_core::{BlockNumber, CollectionMetadata, RegistrySnapshot};
    use std::collections::BTreeMap;

    const OWNER: AccountId = AccountId::from_bytes([1; 32]);
    const STRANGER: AccountId = AccountId::from_bytes([9; 32]);

    fn collection(frozen: bool, settings: Option<u32>, roles: &[(AccountId, u32)]) -> SnapshotCollection {
        SnapshotCollection {
            owner: OWNER,
            metadata: Some(CollectionMetadata {
                data: b"meta".to_vec(),
                is_frozen: frozen,
            }),
            settings,
            roles: roles.iter().copied().collect::<BTreeMap<_, _>>(),
            items: vec![],
        }
    }

    fn snapshot(kind: RegistryKind, collection: SnapshotCollection) -> RegistrySnapshot {
        let mut snapshot = RegistrySnapshot::new(BlockNumber::new(1), 1);
        snapshot
            .registry_mut(kind)
            .collections
            .insert(CollectionId::new(7), collection);
        snapshot
    }

    #[test]
    fn legacy_owner_is_authorized() {
        let table = PermissionTable::v1();
        let registry = snapshot(RegistryKind::Legacy, collection(false, None, &[]));
        let auth = AnchorGate::new(&table)
            .authorize(&registry, RegistryKind::Legacy, CollectionId::new(7), &OWNER)
            .unwrap();
        assert_eq!(auth.collection(), CollectionId::new(7));
        assert_eq!(auth.actor(), OWNER);
    }

    #[test]
    fn legacy_non_owner_is_denied() {
        let table = PermissionTable::v1();
        let registry = snapshot(RegistryKind::Legacy, collection(false, None, &[]));
        assert_matches!(
            AnchorGate::new(&table).authorize(&registry, RegistryKind::Legacy, CollectionId::new(7), &STRANGER),
            Err(MigrationError::PermissionDenied { .. })
        );
    }

    #[test]
    fn legacy_frozen_collection_is_rejected() {
        let table = PermissionTable::v1();
        let registry = snapshot(RegistryKind::Legacy, collection(true, None, &[]));
        assert_matches!(
            AnchorGate::new(&table).authorize(&registry, RegistryKind::Legacy, CollectionId::new(7), &OWNER),
            Err(MigrationError::CollectionFrozen { collection }) if collection == CollectionId::new(7)
        );
    }

    #[test]
    fn current_requires_admin_role() {
        let table = PermissionTable::v1();
        // Issuer only
        let registry = snapshot(RegistryKind::Current, collection(false, Some(0), &[(OWNER, 0b001)]));
        assert_matches!(
            AnchorGate::new(&table).authorize(&registry, RegistryKind::Current, CollectionId::new(7), &OWNER),
            Err(MigrationError::PermissionDenied { missing, .. }) if missing == vec!["Admin".to_string()]
        );
    }

    #[test]
    fn current_locked_attributes_are_rejected() {
        let table = PermissionTable::v1();
        // bit 2 set = UnlockedAttributes disabled
        let registry = snapshot(RegistryKind::Current, collection(false, Some(0b100), &[(OWNER, 0b100)]));
        assert_matches!(
            AnchorGate::new(&table).authorize(&registry, RegistryKind::Current, CollectionId::new(7), &OWNER),
            Err(MigrationError::CollectionLocked { .. })
        );
    }

    #[test]
    fn current_absent_settings_are_locked() {
        let table = PermissionTable::v1();
        let registry = snapshot(RegistryKind::Current, collection(false, None, &[(OWNER, 0b100)]));
        assert_matches!(
            AnchorGate::new(&table).authorize(&registry, RegistryKind::Current, CollectionId::new(7), &OWNER),
            Err(MigrationError::CollectionLocked { .. })
        );
    }

    #[test]
    fn unknown_collection_is_not_found() {
        let table = PermissionTable::v1();
        let registry = RegistrySnapshot::new(BlockNumber::new(1), 1);
        assert_matches!(
            AnchorGate::new(&table).authorize(&registry, RegistryKind::Legacy, CollectionId::new(7), &OWNER),
            Err(MigrationError::CollectionNotFound { .. })
        );
    }

    #[test]
    fn record_and_submission_carry_both_attributes() {
        let table = PermissionTable::v1();
        let registry = snapshot(RegistryKind::Current, collection(false, Some(0), &[(OWNER, 0b111)]));
        let auth = AnchorGate::new(&table)
            .authorize(&registry, RegistryKind::Current, CollectionId::new(7), &OWNER)
            .unwrap();
        let address = ContentAddress::of(b"manifest");
        let record = AnchorRecord::build(&auth, address, premint_core::config::DEFAULT_PROVIDER);

        assert_eq!(record.entries()[0].key, "offchain-mint");
        assert_eq!(record.entries()[0].value, format!("ipfs://ipfs/{address}"));
        assert_eq!(record.entries()[1].key, "offchain-mint-ipfs-provider");
        assert_eq!(record.entries()[1].value, "filebase");

        let submission = record.submission();
        assert_eq!(submission.namespace.as_deref(), Some("CollectionOwner"));
        assert_eq!(submission.entries.len(), 2);

        let mut sink = JsonSink::new(Vec::new());
        sink.submit(&submission).unwrap();
        let written: AnchorSubmission = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(written, submission);
    }
}
