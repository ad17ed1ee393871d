//! `premint sign`

use crate::context::{self, EnvLookup};
use anyhow::Result;
use premint_claims::manifest::gateway_urls;
use premint_claims::{ClaimOutcome, ClaimPipeline, ClaimRequest};
use premint_core::{ClaimSigner, MigrationConfig, SystemClock};
use std::io::Write;
use tracing::info;

/// Generate, sign and store the manifest for the configured collections.
pub fn run(config: &MigrationConfig, env: EnvLookup<'_>, out: &mut dyn Write) -> Result<ClaimOutcome> {
    let request = ClaimRequest::from_config(config)?;
    let signer = context::load_signer(config, env)?;
    let registry = context::load_registry(config)?;
    info!(signer = %signer.account(), "signer loaded");

    let outcome = ClaimPipeline::new(&registry, &signer, &SystemClock, context::artifact_store(config))
        .run(&request)?;

    writeln!(out, "Signed {} item(s)", outcome.manifest.claims().len())?;
    writeln!(out, "Deadline {}", outcome.deadline)?;
    writeln!(out, "Manifest {}", outcome.path.display())?;
    writeln!(out, "CID {}", outcome.address)?;
    for url in gateway_urls(&outcome.address, &config.anchor.gateways) {
        writeln!(out, "{url}")?;
    }
    Ok(outcome)
}
