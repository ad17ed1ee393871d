//! Premint operator CLI
//!
//! Signs migration claims for a collection pair, inspects and verifies the
//! stored manifest, and builds the attribute batch that anchors it.

use anyhow::Result;
use clap::Parser;
use premint_cli::commands::{anchor, attributes, inspect, keygen, sign, signer, verify};
use premint_cli::context::{self, EnvLookup};
use premint_cli::{Cli, Commands};
use premint_core::{CollectionId, ItemId, MigrationError};
use std::io::{self, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize unified logging system
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    let env_lookup = |key: &str| std::env::var(key).ok();
    let env: EnvLookup<'_> = &env_lookup;
    let mut config = context::load_config(cli.config.as_deref(), env)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Sign {
            collections,
            snapshot,
            only_unclaimed,
        } => {
            context::apply_collection_args(&mut config, &collections);
            context::apply_snapshot(&mut config, snapshot.as_ref());
            config.claims.only_unclaimed |= only_unclaimed;
            sign::run(&config, env, &mut out)?;
        }

        Commands::Inspect { collections } => {
            context::apply_collection_args(&mut config, &collections);
            inspect::run(&config, &mut out)?;
        }

        Commands::Verify { collections } => {
            context::apply_collection_args(&mut config, &collections);
            verify::run(&config, &mut out)?;
        }

        Commands::Anchor {
            collections,
            snapshot,
            registry,
            provider,
            output,
        } => {
            context::apply_collection_args(&mut config, &collections);
            context::apply_snapshot(&mut config, snapshot.as_ref());
            if let Some(registry) = registry {
                config.anchor.registry = registry.parse::<premint_core::RegistryKind>()?;
            }
            if let Some(provider) = provider {
                if provider.trim().is_empty() {
                    return Err(MigrationError::configuration_missing("anchor.provider").into());
                }
                config.anchor.provider = provider;
            }
            anchor::run(&config, env, output.as_deref(), &mut out)?;
        }

        Commands::Attributes {
            target,
            item,
            attributes: pairs,
            snapshot,
        } => {
            if let Some(target) = target {
                config.collections.target = Some(CollectionId::new(target));
            }
            context::apply_snapshot(&mut config, snapshot.as_ref());
            let pairs = pairs
                .into_iter()
                .map(|(key, value)| (key.into_bytes(), value.into_bytes()))
                .collect();
            attributes::run(&config, env, ItemId::new(item), pairs, &mut out)?;
        }

        Commands::Signer => {
            signer::run(&config, env, &mut out)?;
        }

        Commands::Keygen => {
            keygen::run(&config, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
