//! Unified error system for migration runs
//!
//! Every failure is terminal for the current run. Variants carry the
//! collection ids, paths or flag names needed to diagnose a failure without
//! querying the chain again.

use crate::types::{CollectionId, RegistryKind};

/// Unified error type for all migration operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// A required configuration value or credential is missing
    #[error("Configuration missing: {key}")]
    ConfigurationMissing {
        /// Name of the missing key or environment variable
        key: String,
    },

    /// The registry reported no such collection
    #[error("Collection {collection} not found on the {registry} registry")]
    CollectionNotFound {
        /// Registry that was queried
        registry: RegistryKind,
        /// Collection that was requested
        collection: CollectionId,
    },

    /// Source and target collections disagree on owner or metadata
    #[error("Collections {source_collection} and {target_collection} do not match: {reason}")]
    CollectionMismatch {
        /// Source (legacy) collection
        source_collection: CollectionId,
        /// Target (current) collection
        target_collection: CollectionId,
        /// Which property differs
        reason: String,
    },

    /// The actor lacks one or more required flags
    #[error("Permission denied for {context}: missing {}", .missing.join(", "))]
    PermissionDenied {
        /// Collection and account the check ran against
        context: String,
        /// Required flag names the actor does not hold
        missing: Vec<String>,
    },

    /// Collection metadata is frozen and cannot take new attributes
    #[error("Collection {collection} is frozen, no new attributes can be added")]
    CollectionFrozen {
        /// Frozen collection
        collection: CollectionId,
    },

    /// Collection settings lock attribute writes
    #[error("Collection {collection} is locked, no new attributes can be added")]
    CollectionLocked {
        /// Locked collection
        collection: CollectionId,
    },

    /// No items remain to sign after filtering
    #[error("No items found to sign for collection {source_collection} -> {target_collection}")]
    NothingToSign {
        /// Source (legacy) collection
        source_collection: CollectionId,
        /// Target (current) collection
        target_collection: CollectionId,
    },

    /// A manifest was requested with no claims
    #[error("Manifest must contain at least one signed claim")]
    EmptyManifest,

    /// A later stage expected a manifest artifact that does not exist
    #[error("Unable to locate manifest artifact at {path}")]
    ArtifactNotFound {
        /// Expected artifact path
        path: String,
    },

    /// Flag name is not part of the flag set
    #[error("Unknown flag: {name}")]
    UnknownFlag {
        /// Offending name
        name: String,
    },

    /// More names than fit in the flag integer
    #[error("Too many flags: {count} (at most {max})")]
    TooManyFlags {
        /// Number of names supplied
        count: usize,
        /// Maximum supported
        max: usize,
    },

    /// Flag name listed twice
    #[error("Duplicate flag: {name}")]
    DuplicateFlag {
        /// Offending name
        name: String,
    },

    /// Permission domain is not in the versioned table
    #[error("Unknown permission domain: {domain}")]
    UnknownPermissionDomain {
        /// Requested domain name
        domain: String,
    },

    /// Live registry variants differ from the versioned table
    #[error("Unsupported variants for {domain}: expected [{}], registry reports [{}]", .expected.join(", "), .observed.join(", "))]
    UnsupportedVariant {
        /// Domain being validated
        domain: String,
        /// Variants in the table
        expected: Vec<String>,
        /// Variants reported by the registry
        observed: Vec<String>,
    },

    /// Binary payload could not be decoded
    #[error("Invalid encoding: {message}")]
    InvalidEncoding {
        /// Error message describing the decoding failure
        message: String,
    },

    /// Invalid input or configuration value
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Cryptographic operation failed
    #[error("Crypto error: {message}")]
    Crypto {
        /// Error message describing the cryptographic failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Registry query collaborator failed
    #[error("Registry error: {message}")]
    Registry {
        /// Error message reported by the collaborator
        message: String,
    },
}

impl MigrationError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a missing configuration error
    pub fn configuration_missing(key: impl Into<String>) -> Self {
        Self::ConfigurationMissing { key: key.into() }
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            message: message.into(),
        }
    }

    /// Create a crypto error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a registry error
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(context: impl Into<String>, missing: Vec<String>) -> Self {
        Self::PermissionDenied {
            context: context.into(),
            missing,
        }
    }
}

/// Standard Result type for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
