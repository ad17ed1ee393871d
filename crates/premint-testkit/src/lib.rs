//! Premint Testing Infrastructure
//!
//! Shared fixtures for tests across the workspace: deterministic signing
//! keys, a fixed clock and an in-memory registry builder.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! premint-testkit = { path = "../premint-testkit" }
//! ```
//!
//! ```rust,no_run
//! use premint_testkit::*;
//!
//! let fixture = MigrationFixture::standard();
//! let registry = fixture.registry();
//! ```

pub mod fixtures;
pub mod keys;
pub mod registry;
pub mod time;

pub use fixtures::MigrationFixture;
pub use keys::{test_account, KeyTestFixture};
pub use registry::RegistryBuilder;
pub use time::FixedClock;
