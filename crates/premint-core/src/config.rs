//! Migration configuration
//!
//! A [`MigrationConfig`] is an explicit value handed to the pipelines; no
//! stage reads the process environment itself. The binary loads a TOML or
//! JSON file and then applies `PREMINT_*` overrides through
//! [`MigrationConfig::merge_with_vars`], passing in its own variable lookup.

use crate::errors::{MigrationError, Result};
use crate::types::{CollectionId, RegistryKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default replay window in blocks: one year at one block per ten minutes.
///
/// The block time is an assumption about the source chain, so the window is
/// configurable through `claims.replay_window`.
pub const DEFAULT_REPLAY_WINDOW: u32 = 10 * 60 * 24 * 365;

/// Default environment variable holding the signer seed.
pub const DEFAULT_SEED_ENV: &str = "PREMINT_SIGNER_SEED";

/// Default storage provider written into the anchor record.
pub const DEFAULT_PROVIDER: &str = "filebase";

/// Default content gateways reported to the operator.
pub const DEFAULT_GATEWAYS: [&str; 2] = ["https://ipfs.filebase.io/ipfs/", "https://dweb.link/ipfs/"];

/// Source and target collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    /// Collection on the legacy registry.
    pub source: Option<CollectionId>,
    /// Collection on the current registry.
    pub target: Option<CollectionId>,
}

/// Where the signing seed comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Environment variable holding the hex seed. The seed itself never
    /// appears in the file.
    pub seed_env: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            seed_env: DEFAULT_SEED_ENV.to_string(),
        }
    }
}

/// Claim generation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    /// Blocks between the current height and each claim's deadline.
    pub replay_window: u32,
    /// Skip items already redeemed on the target registry.
    pub only_unclaimed: bool,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            replay_window: DEFAULT_REPLAY_WINDOW,
            only_unclaimed: false,
        }
    }
}

/// Artifact storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory manifests are written to.
    pub data_dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Anchor stage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Registry the anchor attributes are written on.
    pub registry: RegistryKind,
    /// Storage provider identifier.
    pub provider: String,
    /// Gateway URL prefixes reported with the content address.
    pub gateways: Vec<String>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            registry: RegistryKind::Legacy,
            provider: DEFAULT_PROVIDER.to_string(),
            gateways: DEFAULT_GATEWAYS.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// Registry access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON snapshot exported from both registries.
    pub snapshot: Option<PathBuf>,
}

/// Complete migration configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Network label, reported in logs.
    pub network: Option<String>,
    /// Collections being migrated.
    pub collections: CollectionsConfig,
    /// Signing seed source.
    pub signer: SignerConfig,
    /// Claim generation policy.
    pub claims: ClaimsConfig,
    /// Artifact storage.
    pub artifacts: ArtifactsConfig,
    /// Anchor stage settings.
    pub anchor: AnchorConfig,
    /// Registry access.
    pub registry: RegistryConfig,
}

impl MigrationConfig {
    /// Load configuration from a `.toml` or `.json` file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MigrationError::invalid(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        debug!(path = %path.display(), "loading migration config");
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| MigrationError::invalid(format!("Invalid TOML: {e}"))),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| MigrationError::invalid(format!("Invalid JSON: {e}"))),
            _ => Err(MigrationError::invalid(format!(
                "Unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Apply `PREMINT_*` overrides read through `lookup`.
    pub fn merge_with_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(network) = lookup("PREMINT_NETWORK") {
            self.network = Some(network);
        }
        if let Some(source) = lookup("PREMINT_SOURCE_COLLECTION") {
            self.collections.source = Some(source.parse()?);
        }
        if let Some(target) = lookup("PREMINT_TARGET_COLLECTION") {
            self.collections.target = Some(target.parse()?);
        }
        if let Some(window) = lookup("PREMINT_REPLAY_WINDOW") {
            self.claims.replay_window = window
                .parse()
                .map_err(|_| MigrationError::invalid("Invalid number in PREMINT_REPLAY_WINDOW"))?;
        }
        if let Some(flag) = lookup("PREMINT_ONLY_UNCLAIMED") {
            self.claims.only_unclaimed = parse_flag(&flag)
                .ok_or_else(|| MigrationError::invalid("Invalid boolean in PREMINT_ONLY_UNCLAIMED"))?;
        }
        if let Some(dir) = lookup("PREMINT_DATA_DIR") {
            self.artifacts.data_dir = PathBuf::from(dir);
        }
        if let Some(registry) = lookup("PREMINT_ANCHOR_REGISTRY") {
            self.anchor.registry = registry.parse()?;
        }
        if let Some(provider) = lookup("PREMINT_STORAGE_PROVIDER") {
            self.anchor.provider = provider;
        }
        if let Some(snapshot) = lookup("PREMINT_REGISTRY_SNAPSHOT") {
            self.registry.snapshot = Some(PathBuf::from(snapshot));
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.claims.replay_window == 0 {
            return Err(MigrationError::invalid(
                "claims.replay_window must be greater than zero",
            ));
        }
        if self.anchor.provider.trim().is_empty() {
            return Err(MigrationError::configuration_missing("anchor.provider"));
        }
        if self.signer.seed_env.trim().is_empty() {
            return Err(MigrationError::configuration_missing("signer.seed_env"));
        }
        Ok(())
    }

    /// Source collection, required by every stage.
    pub fn source_collection(&self) -> Result<CollectionId> {
        self.collections
            .source
            .ok_or_else(|| MigrationError::configuration_missing("collections.source"))
    }

    /// Target collection, required by every stage.
    pub fn target_collection(&self) -> Result<CollectionId> {
        self.collections
            .target
            .ok_or_else(|| MigrationError::configuration_missing("collections.target"))
    }

    /// Registry snapshot path.
    pub fn snapshot_path(&self) -> Result<&Path> {
        self.registry
            .snapshot
            .as_deref()
            .ok_or_else(|| MigrationError::configuration_missing("registry.snapshot"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}
