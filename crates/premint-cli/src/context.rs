//! Configuration, signer and registry loading for command handlers.

use crate::CollectionArgs;
use anyhow::{Context as _, Result};
use premint_claims::ArtifactStore;
use premint_core::{
    CollectionId, Ed25519Signer, MigrationConfig, MigrationError, RegistrySnapshot,
};
use std::path::{Path, PathBuf};
use tracing::debug;
use zeroize::Zeroizing;

/// Environment lookup passed to handlers.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Load configuration from `path` (or defaults) and apply `PREMINT_*`
/// overrides.
pub fn load_config(path: Option<&Path>, env: EnvLookup<'_>) -> Result<MigrationConfig> {
    let mut config = match path {
        Some(path) => MigrationConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MigrationConfig::default(),
    };
    config.merge_with_vars(env)?;
    config.validate()?;
    debug!(network = ?config.network, "configuration loaded");
    Ok(config)
}

/// Apply command-line collection overrides.
pub fn apply_collection_args(config: &mut MigrationConfig, args: &CollectionArgs) {
    if let Some(source) = args.source {
        config.collections.source = Some(CollectionId::new(source));
    }
    if let Some(target) = args.target {
        config.collections.target = Some(CollectionId::new(target));
    }
    if let Some(dir) = &args.data_dir {
        config.artifacts.data_dir = dir.clone();
    }
}

/// Apply a snapshot path override.
pub fn apply_snapshot(config: &mut MigrationConfig, snapshot: Option<&PathBuf>) {
    if let Some(path) = snapshot {
        config.registry.snapshot = Some(path.clone());
    }
}

/// Signer from the seed held in the configured environment variable.
pub fn load_signer(config: &MigrationConfig, env: EnvLookup<'_>) -> Result<Ed25519Signer> {
    let name = config.signer.seed_env.as_str();
    let seed = Zeroizing::new(
        env(name).ok_or_else(|| MigrationError::configuration_missing(name))?,
    );
    Ok(Ed25519Signer::from_seed_hex(seed.trim())?)
}

/// Registry snapshot named by the configuration.
pub fn load_registry(config: &MigrationConfig) -> Result<RegistrySnapshot> {
    let path = config.snapshot_path()?;
    Ok(RegistrySnapshot::load(path)?)
}

/// Artifact store rooted at the configured data directory.
pub fn artifact_store(config: &MigrationConfig) -> ArtifactStore {
    ArtifactStore::new(config.artifacts.data_dir.clone())
}
