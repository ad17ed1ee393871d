//! Premint Core - primitives for off-chain mint migration
//!
//! This crate holds the pieces every migration stage builds on. None of them
//! talk to a network: registry state arrives through the [`RegistryQuery`]
//! trait and signatures through the [`ClaimSigner`] trait, so each stage can
//! be exercised without a live chain.
//!
//! # Layout
//!
//! ## Permission encoding
//! - [`FlagSet`]: generic bit-mask over an ordered list of names, with an
//!   inverted mode for "bit set = disabled" settings
//! - [`PermissionTable`]: versioned table of the permission domains a
//!   registry exposes (roles, collection settings, item settings)
//! - [`PermissionGate`]: checks an encoded integer against required flags
//!
//! ## Payloads and addressing
//! - identifiers derive SCALE `Encode`/`Decode`, so claim payloads built
//!   from them encode the way the redeeming runtime expects
//! - [`hash`]: content addressing over canonical bytes
//! - [`ss58`]: network-prefixed account addresses
//!
//! ## Collaborator boundaries
//! - [`ClaimSigner`] / [`Ed25519Signer`]: signing capability
//! - [`RegistryQuery`] / [`RegistrySnapshot`]: read-only registry view
//! - [`Clock`]: provenance timestamps
//!
//! ## Ambient
//! - [`MigrationError`]: unified error type
//! - [`MigrationConfig`]: explicit configuration value

#![forbid(unsafe_code)]

/// Unified error handling
pub mod errors;

/// Strongly typed identifiers
pub mod types;

/// Hex string helpers and serde adapters
pub mod hexstr;

/// Generic bit-flag encoding
pub mod flags;

/// Permission domains and gating
pub mod permissions;

/// Content addressing
pub mod hash;

/// Network-prefixed account addresses
pub mod ss58;

/// Signing capability and Ed25519 implementation
pub mod crypto;

/// Registry query interface and snapshot implementation
pub mod registry;

/// Migration configuration
pub mod config;

/// Wall-clock access for provenance fields
pub mod time;

pub use config::{MigrationConfig, DEFAULT_REPLAY_WINDOW};
pub use crypto::{verify_signature, ClaimSigner, Ed25519Signer, SignatureBytes};
pub use errors::{MigrationError, Result};
pub use flags::{FlagSet, MAX_FLAGS};
pub use hash::ContentAddress;
pub use permissions::{PermissionDomain, PermissionGate, PermissionTable};
pub use registry::{
    CollectionDetails, CollectionMetadata, ItemOwnership, RegistryQuery, RegistrySnapshot,
};
pub use time::{Clock, SystemClock};
pub use types::{AccountId, BlockNumber, CollectionId, ItemId, RegistryKind};
