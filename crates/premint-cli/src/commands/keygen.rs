//! `premint keygen`

use anyhow::Result;
use premint_core::{AccountId, ClaimSigner, Ed25519Signer, MigrationConfig};
use std::io::Write;
use tracing::warn;

/// Generate a fresh key and print its seed and account.
pub fn run(config: &MigrationConfig, out: &mut dyn Write) -> Result<AccountId> {
    let signer = Ed25519Signer::generate();
    let account = signer.account();
    warn!("printing secret seed, store it in {}", config.signer.seed_env);
    writeln!(out, "Public key {account}")?;
    writeln!(out, "{}={}", config.signer.seed_env, signer.seed_hex().as_str())?;
    Ok(account)
}
