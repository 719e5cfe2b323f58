//! Server launch bundle.

use super::{Bundle, BundleHooks, JavaBundle};
use crate::error::VerbError;
use crate::ports::Runner;
use crate::spec::{CliArgument, CliOption};
use crate::verb::{CommandVerb, Verb};

/// Main class of the database server.
pub const DEFAULT_SERVER_CLASS: &str = "org.voltdb.VoltDB";

const SERVER_JAVA_OPTS: [&str; 4] = [
    "-server",
    "-XX:+HeapDumpOnOutOfMemoryError",
    "-XX:HeapDumpPath=/tmp",
    "-XX:-ReduceInitialCardMarks",
];

const DEFAULT_CATALOG_KEY: &str = "server.catalog";

/// Starts a server process in a given mode (`create`, `recover`, ...).
///
/// Extends [`JavaBundle`] with deployment, host and license options and a
/// catalog argument. An omitted catalog falls back to the configured
/// `server.catalog` value when the verb runs.
#[derive(Debug, Clone)]
pub struct ServerBundle {
    java: JavaBundle,
    subcommand: String,
    catalog_key: String,
}

impl ServerBundle {
    pub fn new(subcommand: &str) -> Self {
        Self {
            java: JavaBundle::new(DEFAULT_SERVER_CLASS).with_opts_override(SERVER_JAVA_OPTS),
            subcommand: subcommand.to_string(),
            catalog_key: DEFAULT_CATALOG_KEY.to_string(),
        }
    }

    /// Launch a different main class, keeping the server launch flags.
    #[must_use]
    pub fn with_java_class(mut self, java_class: &str) -> Self {
        self.java = JavaBundle::new(java_class).with_opts_override(SERVER_JAVA_OPTS);
        self
    }

    /// Configuration key consulted when no catalog argument was given.
    #[must_use]
    pub fn with_catalog_key(mut self, key: &str) -> Self {
        self.catalog_key = key.to_string();
        self
    }

    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Server arguments: the subcommand followed by keyword/value pairs.
    fn server_args(&self, runner: &mut dyn Runner) -> Result<Vec<String>, VerbError> {
        let from_opts = runner
            .opts()
            .string("catalog")
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let catalog = from_opts.or_else(|| {
            runner
                .config()
                .get(&self.catalog_key)
                .filter(|c| !c.is_empty())
        });
        let Some(catalog) = catalog else {
            return Err(runner.abort("A catalog path is required.", &[]));
        };

        let opts = runner.opts();
        let mut args = vec![self.subcommand.clone(), "catalog".to_string(), catalog];
        if let Some(deployment) = opts.string("deployment") {
            args.extend(["deployment".to_string(), deployment.to_string()]);
        }
        if let Some(host) = opts.host("host") {
            args.extend(["host".to_string(), host.host.clone()]);
            if let Some(port) = host.port {
                args.extend(["port".to_string(), port.to_string()]);
            }
        }
        if let Some(license) = opts.string("license") {
            args.extend(["license".to_string(), license.to_string()]);
        }
        Ok(args)
    }
}

impl Bundle for ServerBundle {
    fn hooks(&self) -> BundleHooks {
        BundleHooks::INITIALIZE | BundleHooks::GO
    }

    fn initialize(&self, verb: &mut Verb) {
        self.java.initialize(verb);
        verb.add_options([
            CliOption::string(Some('d'), Some("--deployment"), "deployment", "the deployment configuration file path")
                .with_default("deployment.xml"),
            CliOption::host(Some('H'), Some("--host"), "host", "the host", 1, 1, None)
                .with_default("localhost"),
            CliOption::string(Some('l'), Some("--license"), "license", "the license file path"),
        ]);
        verb.add_arguments([CliArgument::string(
            "catalog",
            "the application catalog jar file path (default: configured catalog)",
        )
        .with_counts(0, Some(1))]);
    }

    fn go(&self, verb: &CommandVerb, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let args = self.server_args(runner)?;
        self.java.run_java(verb.base(), runner, args)
    }
}
