//! The `verbkit` program: stock verbs declared on the verbkit framework.
//!
//! [`bootstrap`] declares and validates every verb and derives a clap parser
//! from their specifications; [`CliContext::run`] parses one command line and
//! executes the selected verb through a [`verbkit_runtime::VerbRunner`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only.
use dotenvy as _;
use tracing_subscriber as _;

#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;

pub mod bootstrap;
pub mod error;
pub mod help;
pub mod parser;
pub mod verbs;

pub use bootstrap::{CliConfig, CliContext, PROGRAM_NAME, Streams, bootstrap};
pub use error::CliError;
pub use help::ClapHelp;
