//! Permission domains and gating
//!
//! Registries expose roles and settings as packed integers whose variant
//! names are fixed by the runtime. Rather than discovering those names from
//! live metadata, the supported domains are pinned in a versioned constant
//! table. A registry that reports different variants fails validation when
//! the run starts instead of producing a surprising answer later.

use crate::errors::{MigrationError, Result};
use crate::flags::FlagSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role names in the `CollectionRole` domain.
pub mod role {
    /// May mint items.
    pub const ISSUER: &str = "Issuer";
    /// May freeze items.
    pub const FREEZER: &str = "Freezer";
    /// May administer the collection.
    pub const ADMIN: &str = "Admin";
}

/// Setting names in the `CollectionSetting` domain.
pub mod setting {
    /// Items may be transferred.
    pub const TRANSFERABLE_ITEMS: &str = "TransferableItems";
    /// Collection metadata may change.
    pub const UNLOCKED_METADATA: &str = "UnlockedMetadata";
    /// Collection attributes may change.
    pub const UNLOCKED_ATTRIBUTES: &str = "UnlockedAttributes";
    /// Max supply may change.
    pub const UNLOCKED_MAX_SUPPLY: &str = "UnlockedMaxSupply";
    /// Deposits are required.
    pub const DEPOSIT_REQUIRED: &str = "DepositRequired";
}

/// Permission domains a registry encodes as bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PermissionDomain {
    /// Roles an account holds on a collection.
    CollectionRole,
    /// Collection-level settings (set bit = disabled).
    CollectionSetting,
    /// Item-level settings (set bit = disabled).
    ItemSetting,
}

impl PermissionDomain {
    /// All supported domains.
    pub const ALL: [PermissionDomain; 3] = [
        PermissionDomain::CollectionRole,
        PermissionDomain::CollectionSetting,
        PermissionDomain::ItemSetting,
    ];

    /// Canonical domain name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionDomain::CollectionRole => "CollectionRole",
            PermissionDomain::CollectionSetting => "CollectionSetting",
            PermissionDomain::ItemSetting => "ItemSetting",
        }
    }
}

impl fmt::Display for PermissionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionDomain {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self> {
        PermissionDomain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| MigrationError::UnknownPermissionDomain {
                domain: s.to_string(),
            })
    }
}

struct DomainEntry {
    domain: PermissionDomain,
    variants: &'static [&'static str],
    inverted: bool,
}

const TABLE_V1: [DomainEntry; 3] = [
    DomainEntry {
        domain: PermissionDomain::CollectionRole,
        variants: &[role::ISSUER, role::FREEZER, role::ADMIN],
        inverted: false,
    },
    DomainEntry {
        domain: PermissionDomain::CollectionSetting,
        variants: &[
            setting::TRANSFERABLE_ITEMS,
            setting::UNLOCKED_METADATA,
            setting::UNLOCKED_ATTRIBUTES,
            setting::UNLOCKED_MAX_SUPPLY,
            setting::DEPOSIT_REQUIRED,
        ],
        inverted: true,
    },
    DomainEntry {
        domain: PermissionDomain::ItemSetting,
        variants: &["Transferable", "UnlockedMetadata", "UnlockedAttributes"],
        inverted: true,
    },
];

/// Versioned table of permission domains.
#[derive(Clone, Copy)]
pub struct PermissionTable {
    version: u32,
    entries: &'static [DomainEntry],
}

impl fmt::Debug for PermissionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionTable")
            .field("version", &self.version)
            .field("domains", &self.entries.len())
            .finish()
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::v1()
    }
}

impl PermissionTable {
    /// Version 1 of the table.
    pub fn v1() -> Self {
        Self {
            version: 1,
            entries: &TABLE_V1,
        }
    }

    /// Table version.
    pub fn version(&self) -> u32 {
        self.version
    }

    fn entry(&self, domain: PermissionDomain) -> Result<&'static DomainEntry> {
        self.entries
            .iter()
            .find(|e| e.domain == domain)
            .ok_or_else(|| MigrationError::UnknownPermissionDomain {
                domain: domain.to_string(),
            })
    }

    /// Ordered variant names for a domain.
    pub fn variants(&self, domain: PermissionDomain) -> Result<&'static [&'static str]> {
        Ok(self.entry(domain)?.variants)
    }

    /// Flag set for a domain.
    pub fn flag_set(&self, domain: PermissionDomain) -> Result<FlagSet> {
        let entry = self.entry(domain)?;
        FlagSet::build(entry.variants.iter().copied(), entry.inverted)
    }

    /// Flag set by domain name.
    pub fn resolve(&self, name: &str) -> Result<FlagSet> {
        self.flag_set(name.parse()?)
    }

    /// Check that a registry's live variant list matches the table.
    ///
    /// Names and order must match exactly, since bit positions derive from
    /// the order.
    pub fn check_variants(&self, domain: PermissionDomain, observed: &[String]) -> Result<()> {
        let expected = self.variants(domain)?;
        let matches = expected.len() == observed.len()
            && expected.iter().zip(observed).all(|(e, o)| *e == o.as_str());
        if matches {
            return Ok(());
        }
        Err(MigrationError::UnsupportedVariant {
            domain: domain.to_string(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            observed: observed.to_vec(),
        })
    }
}

/// Checks an actor's encoded value against required flags.
#[derive(Debug, Clone)]
pub struct PermissionGate<'a> {
    flags: &'a FlagSet,
    context: String,
}

impl<'a> PermissionGate<'a> {
    /// Create a gate. `context` names the collection and account in errors.
    pub fn new(flags: &'a FlagSet, context: impl Into<String>) -> Self {
        Self {
            flags,
            context: context.into(),
        }
    }

    /// Required names the actor does not hold.
    ///
    /// An absent value means the registry has no record for the actor, so
    /// every required name is missing. It is not read as zero, which would
    /// grant every flag of an inverted set.
    pub fn missing<S: AsRef<str>>(&self, actor_value: Option<u32>, required: &[S]) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for name in required {
            let name = name.as_ref();
            let held = match actor_value {
                Some(value) => self.flags.has(name, value)?,
                None => {
                    self.flags.bit(name)?;
                    false
                }
            };
            if !held {
                missing.push(name.to_string());
            }
        }
        Ok(missing)
    }

    /// Fail with `PermissionDenied` unless every required flag is held.
    pub fn require_all<S: AsRef<str>>(&self, actor_value: Option<u32>, required: &[S]) -> Result<()> {
        let missing = self.missing(actor_value, required)?;
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MigrationError::permission_denied(self.context.clone(), missing))
        }
    }
}

/// Context-free form of [`PermissionGate::require_all`].
pub fn require_all<S: AsRef<str>>(flags: &FlagSet, actor_value: u32, required: &[S]) -> Result<()> {
    PermissionGate::new(flags, "actor").require_all(Some(actor_value), required)
}
