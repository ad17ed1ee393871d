//! `premint attributes`

use crate::context::{self, EnvLookup};
use anyhow::Result;
use premint_claims::manifest::SignatureEntry;
use premint_claims::{AttributePipeline, AttributeRequest, Attributes, SignedAttributeClaim};
use premint_core::{ItemId, MigrationConfig};
use std::io::Write;

/// Sign an attribute update for `item` on the target collection and print
/// the `{data, signature}` pair a holder submits.
pub fn run(
    config: &MigrationConfig,
    env: EnvLookup<'_>,
    item: ItemId,
    attributes: Attributes,
    out: &mut dyn Write,
) -> Result<SignedAttributeClaim> {
    let request = AttributeRequest {
        target: config.target_collection()?,
        item,
        attributes,
        replay_window: config.claims.replay_window,
    };
    let signer = context::load_signer(config, env)?;
    let registry = context::load_registry(config)?;
    let signed = AttributePipeline::new(&registry, &signer).run(&request)?;

    writeln!(out, "Deadline {}", signed.claim.deadline)?;
    let entry = SignatureEntry {
        data: signed.data.clone(),
        signature: signed.signature,
    };
    serde_json::to_writer_pretty(&mut *out, &entry)?;
    writeln!(out)?;
    Ok(signed)
}

/// Parse a `key=value` attribute argument.
pub fn parse_attribute(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {arg:?}")),
    }
}
