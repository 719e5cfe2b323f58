//! Adapters implementing the verbkit ports.
//!
//! | Port               | Adapter              |
//! |--------------------|----------------------|
//! | `ConfigStore`      | [`FileConfigStore`]  |
//! | `ProcessLauncher`  | [`JavaLauncher`]     |
//! | `ServiceConnector` | [`TcpConnector`]     |
//! | `Packager`         | [`ScriptPackager`]   |
//! | `Runner`           | [`VerbRunner`]       |

#![deny(unsafe_code)]

pub mod client;
pub mod config_store;
pub mod java;
pub mod packager;
mod runner;

pub use client::{TcpConnector, TcpServiceClient};
pub use config_store::FileConfigStore;
pub use java::{DEFAULT_JAVA_OPTS, JavaCommandBuilder, JavaLauncher};
pub use packager::ScriptPackager;
pub use runner::{RunnerDeps, VerbRunner};
