//! Premint CLI library
//!
//! Argument definitions and command handlers for the `premint` binary. The
//! handlers take an explicit environment lookup and an output writer so they
//! can be driven from tests without touching the process environment.

pub mod commands;
pub mod context;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Off-chain pre-signed mint migration tooling
#[derive(Debug, Parser)]
#[command(name = "premint")]
#[command(about = "Premint - pre-signed mint claims for registry migration", long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (TOML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Collection pair overrides shared by several commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CollectionArgs {
    /// Source collection on the legacy registry
    #[arg(long)]
    pub source: Option<u32>,

    /// Target collection on the current registry
    #[arg(long)]
    pub target: Option<u32>,

    /// Directory holding manifests
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign a claim for every migrating item and store the manifest
    Sign {
        #[command(flatten)]
        collections: CollectionArgs,

        /// Registry snapshot (JSON)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Skip items already minted on the target collection
        #[arg(long)]
        only_unclaimed: bool,
    },

    /// Show the content address and provenance of a stored manifest
    Inspect {
        #[command(flatten)]
        collections: CollectionArgs,
    },

    /// Check every signature in a stored manifest
    Verify {
        #[command(flatten)]
        collections: CollectionArgs,
    },

    /// Build the attribute batch anchoring a stored manifest
    Anchor {
        #[command(flatten)]
        collections: CollectionArgs,

        /// Registry snapshot (JSON)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Registry the attributes are written on (legacy or current)
        #[arg(long)]
        registry: Option<String>,

        /// Storage provider identifier
        #[arg(long)]
        provider: Option<String>,

        /// Write the submission here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sign an attribute update for an item already on the target collection
    Attributes {
        /// Target collection on the current registry
        #[arg(long)]
        target: Option<u32>,

        /// Item whose attributes are set
        #[arg(long)]
        item: u32,

        /// Attribute to set, as key=value (repeatable)
        #[arg(long = "attribute", required = true, value_parser = commands::attributes::parse_attribute)]
        attributes: Vec<(String, String)>,

        /// Registry snapshot (JSON)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Show the public key and network addresses of the configured signing key
    Signer,

    /// Generate a new signing key
    Keygen,
}
