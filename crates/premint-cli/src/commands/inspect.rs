//! `premint inspect`

use crate::context;
use anyhow::Result;
use premint_claims::manifest::gateway_urls;
use premint_claims::{inspect_artifact, ArtifactReport, ArtifactStore};
use premint_core::MigrationConfig;
use std::io::Write;

/// Print the file name, content address and provenance of a manifest.
pub fn run(config: &MigrationConfig, out: &mut dyn Write) -> Result<ArtifactReport> {
    let source = config.source_collection()?;
    let target = config.target_collection()?;
    let report = inspect_artifact(&context::artifact_store(config), source, target)?;
    let document = &report.document;

    writeln!(out, "Filename {}", ArtifactStore::file_name(source, target))?;
    writeln!(out, "CID {}", report.address)?;
    for url in gateway_urls(&report.address, &config.anchor.gateways) {
        writeln!(out, "{url}")?;
    }
    writeln!(out, "Runtime version {}", document.runtime_version)?;
    writeln!(out, "Generated at {}", document.date)?;
    writeln!(out, "Signer {}", document.signer)?;
    writeln!(out, "Claims {}", document.signatures.len())?;
    Ok(report)
}
