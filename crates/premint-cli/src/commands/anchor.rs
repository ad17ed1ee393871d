//! `premint anchor`

use crate::context::{self, EnvLookup};
use anyhow::{Context as _, Result};
use premint_claims::{AnchorOutcome, AnchorPipeline, JsonSink, SubmissionSink};
use premint_core::{ClaimSigner, MigrationConfig};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Gate the signer and emit the attribute batch anchoring the manifest.
///
/// The batch goes to `output` when given, otherwise to `out` after the
/// address line.
pub fn run(
    config: &MigrationConfig,
    env: EnvLookup<'_>,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<AnchorOutcome> {
    let source = config.source_collection()?;
    let target = config.target_collection()?;
    let signer = context::load_signer(config, env)?;
    let registry = context::load_registry(config)?;

    let outcome = AnchorPipeline::new(&registry, context::artifact_store(config), config.anchor.provider.clone())
        .run(config.anchor.registry, source, target, &signer.account())?;

    writeln!(out, "CID {}", outcome.address)?;
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            JsonSink::new(file).submit(&outcome.submission)?;
            writeln!(out, "Submission {}", path.display())?;
        }
        None => JsonSink::new(&mut *out).submit(&outcome.submission)?,
    }
    Ok(outcome)
}
