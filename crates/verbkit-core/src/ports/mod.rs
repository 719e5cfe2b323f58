//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that verbs and bundles expect from the
//! surrounding program. They contain no implementation details.
//!
//! # Design Rules
//!
//! - No process, socket or filesystem types in any signature
//! - Intent-based methods ("launch this target", "call this procedure")
//! - Every port is object safe so adapters can be swapped at bootstrap

pub mod config_store;
pub mod help;
pub mod launcher;
pub mod packager;
pub mod runner;
pub mod service;

use thiserror::Error;

pub use config_store::{ConfigStore, InMemoryConfigStore, key_matches};
pub use help::HelpProvider;
pub use launcher::{LaunchRequest, ProcessLauncher};
pub use packager::{PackageRequest, Packager};
pub use runner::Runner;
pub use service::{CallResponse, ConnectTarget, ServiceClient, ServiceConnector};

/// Domain-specific errors for configuration storage.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backing storage could not be read or written.
    #[error("Configuration storage error: {0}")]
    Storage(String),

    /// A stored line or key is malformed.
    #[error("Malformed configuration entry: {0}")]
    Malformed(String),
}

/// Domain-specific errors for service connections.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Every connection attempt failed.
    #[error("Unable to connect to {target} after {attempts} attempt(s): {reason}")]
    Unreachable {
        target: String,
        attempts: u32,
        reason: String,
    },

    /// A call was made without an open connection.
    #[error("Not connected")]
    NotConnected,

    /// The request or response could not be exchanged.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Closing the connection failed.
    #[error("Failed to close connection: {0}")]
    Close(String),
}

/// Domain-specific errors for launched subprocesses.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be found or spawned.
    #[error("Failed to start {program}: {reason}")]
    StartFailed { program: String, reason: String },

    /// The process ran but exited unsuccessfully.
    #[error("{program} exited with status {code}")]
    NonZeroExit { program: String, code: i32 },

    /// The process was terminated by a signal.
    #[error("{0} was terminated by a signal")]
    Terminated(String),
}
