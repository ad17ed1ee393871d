//! `premint signer`

use crate::context::{self, EnvLookup};
use anyhow::Result;
use premint_core::ss58::{self, NETWORKS};
use premint_core::{AccountId, ClaimSigner, MigrationConfig};
use std::io::Write;

/// Print the public key of the configured signing key and its address on
/// each known network.
pub fn run(config: &MigrationConfig, env: EnvLookup<'_>, out: &mut dyn Write) -> Result<AccountId> {
    let account = context::load_signer(config, env)?.account();
    writeln!(out, "Public key {account}")?;
    for network in NETWORKS {
        writeln!(out, "{} address {}", network.name, ss58::encode(&account, network.prefix)?)?;
    }
    Ok(account)
}
