//! Declarative verb registration for command-line tools.
//!
//! A program declares *verbs* (sub-commands) with their options and
//! arguments, composes reusable *bundles* into them, and registers them in a
//! [`VerbRegistry`]. At run time a [`Runner`] implementation executes one
//! verb, driving the bundle lifecycle around the verb body.
//!
//! This crate holds the domain only. Everything that touches the outside
//! world is reached through the traits in [`ports`].

#![deny(unused_crate_dependencies)]

pub mod bundles;
pub mod config_tool;
pub mod error;
pub mod ports;
pub mod registry;
pub mod spec;
pub mod table;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod verb;

pub use bundles::{
    Bundle, BundleHooks, ClientBundle, ConnectionBundle, HelpBundle, JavaBundle, PackageBundle,
    ServerBundle,
};
pub use config_tool::{ConfigLoad, ConfigProperty, ConfigurationTool};
pub use error::{DeclarationError, VerbError};
pub use ports::{
    CallResponse, ConfigError, ConfigStore, ConnectTarget, ConnectionError, HelpProvider,
    InMemoryConfigStore, LaunchRequest, PackageRequest, Packager, ProcessError, ProcessLauncher,
    Runner, ServiceClient, ServiceConnector,
};
pub use registry::{VerbRegistry, VerbSpace};
pub use spec::{
    CliArgument, CliOption, HostAddress, Invocation, OptionKind, OptionValue, ParsedOptions,
    VerbAttributes, VerbDefaults,
};
pub use table::TextTable;
pub use verb::{
    CommandVerb, Modifier, MultiVerb, RegisteredVerb, SpecState, Verb, VerbConfig, VerbContext,
    VerbFn, verb_fn,
};
