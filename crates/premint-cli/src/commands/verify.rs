//! `premint verify`

use crate::context;
use anyhow::Result;
use premint_claims::{verify_artifact, SignedClaim};
use premint_core::MigrationConfig;
use std::io::Write;

/// Decode every claim in a manifest and check its signature.
pub fn run(config: &MigrationConfig, out: &mut dyn Write) -> Result<Vec<SignedClaim>> {
    let source = config.source_collection()?;
    let target = config.target_collection()?;
    let claims = verify_artifact(&context::artifact_store(config), source, target)?;

    for signed in &claims {
        let recipient = signed
            .claim
            .only_account
            .map_or_else(|| "anyone".to_string(), |account| account.to_string());
        writeln!(
            out,
            "item {} -> {} (deadline {})",
            signed.claim.item, recipient, signed.claim.deadline
        )?;
    }
    writeln!(out, "Verified {} claim(s)", claims.len())?;
    Ok(claims)
}
