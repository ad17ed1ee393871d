//! Batch claim generation
//!
//! One [`ClaimGenerator`] signs one batch: a single source/target pair and a
//! single deadline computed up front. Items are independent; output order is
//! input order so the manifest built from it is reproducible.
//!
//! The same generator signs attribute claims for items already minted on
//! the target collection, under the collection owner namespace and the batch
//! deadline.

use crate::claim::{
    AttributeClaim, AttributeNamespace, Attributes, Claim, SignedAttributeClaim, SignedClaim,
};
use premint_core::{
    AccountId, BlockNumber, ClaimSigner, CollectionId, ItemId, MigrationError, Result,
};
use tracing::debug;

/// Replay deadline for a batch generated at `height`.
pub fn deadline(height: BlockNumber, replay_window: u32) -> Result<BlockNumber> {
    height.checked_add(replay_window).ok_or_else(|| {
        MigrationError::invalid(format!(
            "deadline overflows: height {height} + window {replay_window}"
        ))
    })
}

/// An item selected for migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratingItem {
    /// Item id, kept across registries.
    pub id: ItemId,
    /// Current owner on the source registry; becomes the only redeemer.
    pub owner: AccountId,
    /// Item metadata on the source registry, if any.
    pub metadata: Option<Vec<u8>>,
}

/// Signs claims for one source/target pair.
pub struct ClaimGenerator<'a, S: ClaimSigner + ?Sized> {
    signer: &'a S,
    source: CollectionId,
    target: CollectionId,
    deadline: BlockNumber,
}

impl<'a, S: ClaimSigner + ?Sized> ClaimGenerator<'a, S> {
    /// Create a generator with a fixed batch deadline.
    pub fn new(
        signer: &'a S,
        source: CollectionId,
        target: CollectionId,
        deadline: BlockNumber,
    ) -> Self {
        Self {
            signer,
            source,
            target,
            deadline,
        }
    }

    /// Batch deadline shared by every claim.
    pub fn deadline(&self) -> BlockNumber {
        self.deadline
    }

    /// Unsigned claim for one item.
    pub fn claim_for(&self, item: &MigratingItem) -> Claim {
        Claim {
            collection: self.target,
            item: item.id,
            attributes: Vec::new(),
            metadata: item.metadata.clone().unwrap_or_default(),
            only_account: Some(item.owner),
            deadline: self.deadline,
            mint_price: None,
        }
    }

    /// Encode and sign one item's claim.
    pub fn sign(&self, item: &MigratingItem) -> Result<SignedClaim> {
        SignedClaim::sign(self.claim_for(item), self.signer)
    }

    /// Unsigned attribute claim for an item on the target collection.
    pub fn attribute_claim_for(&self, item: ItemId, attributes: Attributes) -> Result<AttributeClaim> {
        if attributes.is_empty() {
            return Err(MigrationError::invalid(format!(
                "attribute claim for item {item} sets no attributes"
            )));
        }
        Ok(AttributeClaim {
            collection: self.target,
            item,
            attributes,
            namespace: AttributeNamespace::CollectionOwner,
            deadline: self.deadline,
        })
    }

    /// Encode and sign an attribute claim.
    pub fn sign_attributes(&self, item: ItemId, attributes: Attributes) -> Result<SignedAttributeClaim> {
        let claim = self.attribute_claim_for(item, attributes)?;
        debug!(target = %self.target, %item, count = claim.attributes.len(), "signing attribute claim");
        SignedAttributeClaim::sign(claim, self.signer)
    }

    /// Sign every item, preserving order.
    pub fn generate(&self, items: &[MigratingItem]) -> Result<Vec<SignedClaim>> {
        if items.is_empty() {
            return Err(MigrationError::NothingToSign {
                source_collection: self.source,
                target_collection: self.target,
            });
        }
        debug!(
            source = %self.source,
            target = %self.target,
            deadline = %self.deadline,
            count = items.len(),
            "signing claims"
        );
        items.iter().map(|item| self.sign(item)).collect()
    }
}
