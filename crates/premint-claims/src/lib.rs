//! Premint Claims - signed mint claims for registry migration
//!
//! The signing stage reads both registries, checks the signer may mint on
//! the target collection, and writes every migrating item as a pre-signed
//! claim into one manifest:
//!
//! ```text
//! RegistryQuery -> ClaimSetFilter -> ClaimGenerator -> ManifestBuilder -> ArtifactStore
//! ```
//!
//! After the manifest is uploaded elsewhere, the anchor stage checks and
//! addresses it, gates the actor and builds the attribute batch that
//! publishes the address.
//!
//! Attributes of items already minted on the target collection can be
//! updated the same way, through a pre-signed [`AttributeClaim`].

#![forbid(unsafe_code)]

pub mod anchor;
pub mod artifact;
pub mod claim;
pub mod filter;
pub mod generator;
pub mod manifest;
pub mod pipeline;

pub use anchor::{
    AnchorAuthorization, AnchorGate, AnchorRecord, AnchorSubmission, AttributeEntry, JsonSink,
    SubmissionSink,
};
pub use artifact::ArtifactStore;
pub use claim::{
    AttributeClaim, AttributeNamespace, Attributes, Claim, Signed, SignedAttributeClaim,
    SignedClaim, SignedPayload,
};
pub use filter::{ClaimSetFilter, FilterMode};
pub use generator::{ClaimGenerator, MigratingItem};
pub use manifest::{Manifest, ManifestBuilder, ManifestDocument, Provenance, MANIFEST_KIND};
pub use pipeline::{
    inspect_artifact, verify_artifact, verify_document, AnchorOutcome, AnchorPipeline,
    ArtifactReport, AttributePipeline, AttributeRequest, ClaimOutcome, ClaimPipeline,
    ClaimRequest,
};
