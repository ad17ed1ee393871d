//! Migration stages
//!
//! [`ClaimPipeline`] turns a source/target collection pair into a persisted,
//! content-addressed manifest. [`AnchorPipeline`] turns that manifest into the
//! attribute batch that publishes it. [`AttributePipeline`] signs an
//! attribute update for an item already on the target collection. All of
//! them read the registry through [`RegistryQuery`] and never write anything
//! until every check has passed.

use crate::anchor::{AnchorGate, AnchorRecord, AnchorSubmission};
use crate::artifact::ArtifactStore;
use crate::claim::{Attributes, SignedAttributeClaim, SignedClaim};
use crate::filter::ClaimSetFilter;
use crate::generator::{self, ClaimGenerator, MigratingItem};
use crate::manifest::{self, Manifest, ManifestBuilder, ManifestDocument, Provenance};
use premint_core::permissions::role;
use premint_core::{
    AccountId, BlockNumber, ClaimSigner, Clock, CollectionId, ContentAddress, ItemId,
    MigrationConfig, MigrationError, PermissionDomain, PermissionGate, PermissionTable, RegistryKind,
    RegistryQuery, Result,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Check every live permission variant list the registry exposes.
pub fn validate_permission_variants<R: RegistryQuery + ?Sized>(
    registry: &R,
    table: &PermissionTable,
) -> Result<()> {
    for domain in PermissionDomain::ALL {
        match registry.permission_variants(domain)? {
            Some(observed) => table.check_variants(domain, &observed)?,
            None => debug!(%domain, "registry does not report variants, using table"),
        }
    }
    Ok(())
}

/// Parameters of one signing run.
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    /// Source collection on the legacy registry.
    pub source: CollectionId,
    /// Target collection on the current registry.
    pub target: CollectionId,
    /// Blocks added to the current height to get the deadline.
    pub replay_window: u32,
    /// Redeemed-item filter.
    pub filter: ClaimSetFilter,
}

impl ClaimRequest {
    /// Request described by a configuration.
    pub fn from_config(config: &MigrationConfig) -> Result<Self> {
        Ok(Self {
            source: config.source_collection()?,
            target: config.target_collection()?,
            replay_window: config.claims.replay_window,
            filter: ClaimSetFilter::from_flag(config.claims.only_unclaimed),
        })
    }
}

/// Result of a signing run.
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    /// The manifest that was written.
    pub manifest: Manifest,
    /// Its canonical bytes.
    pub bytes: Vec<u8>,
    /// Content address of `bytes`.
    pub address: ContentAddress,
    /// Where the artifact was written.
    pub path: PathBuf,
    /// Deadline shared by every claim.
    pub deadline: BlockNumber,
}

/// Generates and persists the signed manifest for a collection pair.
pub struct ClaimPipeline<'a, R: ?Sized, S: ?Sized, C: ?Sized> {
    registry: &'a R,
    signer: &'a S,
    clock: &'a C,
    store: ArtifactStore,
    table: PermissionTable,
}

impl<'a, R, S, C> ClaimPipeline<'a, R, S, C>
where
    R: RegistryQuery + ?Sized,
    S: ClaimSigner + ?Sized,
    C: Clock + ?Sized,
{
    /// Assemble a pipeline from its collaborators.
    pub fn new(registry: &'a R, signer: &'a S, clock: &'a C, store: ArtifactStore) -> Self {
        Self {
            registry,
            signer,
            clock,
            store,
            table: PermissionTable::v1(),
        }
    }

    /// Run the full signing stage.
    pub fn run(&self, request: &ClaimRequest) -> Result<ClaimOutcome> {
        let (source, target) = (request.source, request.target);
        let signer = self.signer.account();
        info!(%source, %target, %signer, "generating claims");

        validate_permission_variants(self.registry, &self.table)?;
        self.check_collections(source, target)?;
        info!("collections loaded");

        let roles = self.table.flag_set(PermissionDomain::CollectionRole)?;
        PermissionGate::new(&roles, format!("current collection {target} by {signer}")).require_all(
            self.registry.collection_role(target, &signer)?,
            &[role::ADMIN, role::ISSUER],
        )?;
        info!("permissions validated");

        let items = self.registry.items(RegistryKind::Legacy, source)?;
        let total = items.len();
        let redeemed = self.registry.item_ids(RegistryKind::Current, target)?;
        let items = request.filter.filter(items, |item| item.id, &redeemed);
        if items.is_empty() {
            warn!(%source, %target, total, "no items found to sign");
            return Err(MigrationError::NothingToSign {
                source_collection: source,
                target_collection: target,
            });
        }
        debug!(total, selected = items.len(), "items selected");

        let mut migrating = Vec::with_capacity(items.len());
        for item in items {
            let metadata = self
                .registry
                .item_metadata(RegistryKind::Legacy, source, item.id)?;
            migrating.push(MigratingItem {
                id: item.id,
                owner: item.owner,
                metadata,
            });
        }

        let height = self.registry.chain_height()?;
        let deadline = generator::deadline(height, request.replay_window)?;
        info!(count = migrating.len(), %height, %deadline, "preparing to sign");

        let claims = ClaimGenerator::new(self.signer, source, target, deadline).generate(&migrating)?;
        info!(count = claims.len(), "signatures created");

        let provenance = Provenance {
            runtime_version: self.registry.runtime_version()?,
            generated_at: self.clock.now_millis(),
            source_collection: source,
            target_collection: target,
            signer,
        };
        let manifest = ManifestBuilder::build(claims, provenance)?;
        let bytes = manifest.to_bytes()?;
        let address = manifest::content_address(&bytes);
        let path = self.store.write(source, target, &bytes)?;
        info!(%address, path = %path.display(), "manifest stored");

        Ok(ClaimOutcome {
            manifest,
            bytes,
            address,
            path,
            deadline,
        })
    }

    fn check_collections(&self, source: CollectionId, target: CollectionId) -> Result<()> {
        let source_details = self
            .registry
            .collection(RegistryKind::Legacy, source)?
            .ok_or(MigrationError::CollectionNotFound {
                registry: RegistryKind::Legacy,
                collection: source,
            })?;
        let target_details = self
            .registry
            .collection(RegistryKind::Current, target)?
            .ok_or(MigrationError::CollectionNotFound {
                registry: RegistryKind::Current,
                collection: target,
            })?;

        if source_details.owner != target_details.owner {
            return Err(MigrationError::CollectionMismatch {
                source_collection: source,
                target_collection: target,
                reason: "owners of both collections should be the same".to_string(),
            });
        }

        let source_metadata = self
            .registry
            .collection_metadata(RegistryKind::Legacy, source)?
            .map(|m| m.data);
        let target_metadata = self
            .registry
            .collection_metadata(RegistryKind::Current, target)?
            .map(|m| m.data);
        if source_metadata != target_metadata {
            return Err(MigrationError::CollectionMismatch {
                source_collection: source,
                target_collection: target,
                reason: "the metadata of both collections should be the same".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of an anchor run.
#[derive(Debug, Clone)]
pub struct AnchorOutcome {
    /// Address of the stored manifest.
    pub address: ContentAddress,
    /// Attribute record.
    pub record: AnchorRecord,
    /// Batch to submit.
    pub submission: AnchorSubmission,
}

/// Builds the anchor batch for a stored manifest.
pub struct AnchorPipeline<'a, R: ?Sized> {
    registry: &'a R,
    store: ArtifactStore,
    table: PermissionTable,
    provider: String,
}

impl<'a, R: RegistryQuery + ?Sized> AnchorPipeline<'a, R> {
    /// Assemble a pipeline writing `provider` as the storage provider.
    pub fn new(registry: &'a R, store: ArtifactStore, provider: impl Into<String>) -> Self {
        Self {
            registry,
            store,
            table: PermissionTable::v1(),
            provider: provider.into(),
        }
    }

    /// Verify and address the stored manifest for `source`/`target`, then
    /// authorize `actor` to anchor it on `kind`'s copy of `source`.
    pub fn run(
        &self,
        kind: RegistryKind,
        source: CollectionId,
        target: CollectionId,
        actor: &AccountId,
    ) -> Result<AnchorOutcome> {
        let bytes = self.store.read(source, target)?;
        let document = ManifestDocument::parse(&bytes)?;
        check_pair(&document, source, target)?;
        verify_document(&document)?;
        let address = manifest::content_address(&bytes);
        info!(%source, %target, %address, "anchoring manifest");

        let authorization = AnchorGate::new(&self.table).authorize(self.registry, kind, source, actor)?;
        let record = AnchorRecord::build(&authorization, address, &self.provider);
        let submission = record.submission();
        Ok(AnchorOutcome {
            address,
            record,
            submission,
        })
    }
}

/// Summary of a stored manifest.
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    /// Parsed manifest.
    pub document: ManifestDocument,
    /// Content address of the stored bytes.
    pub address: ContentAddress,
    /// Artifact path.
    pub path: PathBuf,
}

/// Address and parse a stored manifest without checking signatures.
pub fn inspect_artifact(
    store: &ArtifactStore,
    source: CollectionId,
    target: CollectionId,
) -> Result<ArtifactReport> {
    let bytes = store.read(source, target)?;
    let document = ManifestDocument::parse(&bytes)?;
    Ok(ArtifactReport {
        document,
        address: manifest::content_address(&bytes),
        path: store.path_for(source, target),
    })
}

/// Parse a stored manifest and verify every claim against its signer.
pub fn verify_artifact(
    store: &ArtifactStore,
    source: CollectionId,
    target: CollectionId,
) -> Result<Vec<SignedClaim>> {
    let report = inspect_artifact(store, source, target)?;
    check_pair(&report.document, source, target)?;
    verify_document(&report.document)
}

fn check_pair(document: &ManifestDocument, source: CollectionId, target: CollectionId) -> Result<()> {
    if document.source_collection != source || document.target_collection != target {
        return Err(MigrationError::CollectionMismatch {
            source_collection: source,
            target_collection: target,
            reason: format!(
                "the stored manifest was generated for collections {} and {}",
                document.source_collection, document.target_collection
            ),
        });
    }
    Ok(())
}

/// Verify every claim of a parsed manifest.
///
/// A manifest without claims is rejected, as are claims that target another
/// collection or carry a deadline different from the rest of the batch.
pub fn verify_document(document: &ManifestDocument) -> Result<Vec<SignedClaim>> {
    let claims = document.decode_claims()?;
    if claims.is_empty() {
        return Err(MigrationError::EmptyManifest);
    }
    let mut deadline = None;
    for signed in &claims {
        signed.verify(&document.signer)?;
        if signed.claim.collection != document.target_collection {
            return Err(MigrationError::invalid(format!(
                "claim for item {} targets collection {}, manifest targets {}",
                signed.claim.item, signed.claim.collection, document.target_collection
            )));
        }
        match deadline {
            None => deadline = Some(signed.claim.deadline),
            Some(d) if d != signed.claim.deadline => {
                return Err(MigrationError::invalid(format!(
                    "claim for item {} has deadline {}, batch deadline is {d}",
                    signed.claim.item, signed.claim.deadline
                )));
            }
            Some(_) => {}
        }
    }
    info!(count = claims.len(), signer = %document.signer, "manifest verified");
    Ok(claims)
}

/// Parameters of one attribute signing run.
#[derive(Debug, Clone)]
pub struct AttributeRequest {
    /// Collection on the current registry holding the item.
    pub target: CollectionId,
    /// Item whose attributes are set.
    pub item: ItemId,
    /// Attributes to set.
    pub attributes: Attributes,
    /// Blocks added to the current height to get the deadline.
    pub replay_window: u32,
}

/// Signs attribute updates for items on the current registry.
pub struct AttributePipeline<'a, R: ?Sized, S: ?Sized> {
    registry: &'a R,
    signer: &'a S,
    table: PermissionTable,
}

impl<'a, R, S> AttributePipeline<'a, R, S>
where
    R: RegistryQuery + ?Sized,
    S: ClaimSigner + ?Sized,
{
    /// Assemble a pipeline from its collaborators.
    pub fn new(registry: &'a R, signer: &'a S) -> Self {
        Self {
            registry,
            signer,
            table: PermissionTable::v1(),
        }
    }

    /// Check the signer administers the collection and the item exists,
    /// then sign the attribute claim.
    pub fn run(&self, request: &AttributeRequest) -> Result<SignedAttributeClaim> {
        let (target, item) = (request.target, request.item);
        let signer = self.signer.account();
        info!(%target, %item, %signer, "signing attribute claim");

        validate_permission_variants(self.registry, &self.table)?;
        if self.registry.collection(RegistryKind::Current, target)?.is_none() {
            return Err(MigrationError::CollectionNotFound {
                registry: RegistryKind::Current,
                collection: target,
            });
        }

        let roles = self.table.flag_set(PermissionDomain::CollectionRole)?;
        PermissionGate::new(&roles, format!("current collection {target} by {signer}"))
            .require_all(self.registry.collection_role(target, &signer)?, &[role::ADMIN])?;

        if !self
            .registry
            .item_ids(RegistryKind::Current, target)?
            .contains(&item)
        {
            return Err(MigrationError::invalid(format!(
                "item {item} is not minted on current collection {target}"
            )));
        }

        let height = self.registry.chain_height()?;
        let deadline = generator::deadline(height, request.replay_window)?;
        // attribute claims have no source collection
        let signed = ClaimGenerator::new(self.signer, target, target, deadline)
            .sign_attributes(item, request.attributes.clone())?;
        info!(%deadline, "attribute claim signed");
        Ok(signed)
    }
}
