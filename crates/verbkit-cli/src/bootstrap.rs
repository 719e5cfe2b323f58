//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where adapters are wired together for the
//! CLI. All concrete implementations are instantiated here:
//! - Configuration store (`FileConfigStore`)
//! - Service connector (`TcpConnector`)
//! - Java launcher (`JavaLauncher`)
//! - Script packager (`ScriptPackager`)
//! - Help rendering (`ClapHelp`)
//!
//! Verbs only ever see the `Runner` port.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Command;
use clap::error::ErrorKind;
use tracing::debug;
use verbkit_core::{HelpProvider, VerbError, VerbRegistry, VerbSpace};
use verbkit_runtime::{
    FileConfigStore, JavaLauncher, RunnerDeps, ScriptPackager, TcpConnector, VerbRunner,
};

use crate::error::CliError;
use crate::help::ClapHelp;
use crate::parser::{self, CONFIG_FILE_ARG};
use crate::verbs;

/// Name of the program and of its packaged launcher.
pub const PROGRAM_NAME: &str = "verbkit";

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Configuration file used when neither `--config` nor the environment names one.
    pub config_path: PathBuf,
    /// Executable that packaged launchers re-invoke.
    pub program: PathBuf,
}

impl CliConfig {
    /// Create config with default paths.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            config_path: default_config_path()?,
            program: std::env::current_exe().context("Failed to locate the running program")?,
        })
    }
}

/// `<data dir>/verbkit/verbkit.cfg`.
pub fn default_config_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine the user data directory")?;
    Ok(data_dir
        .join(PROGRAM_NAME)
        .join(verbs::config::CONFIG_FILE_NAME))
}

/// Output streams for one run.
pub struct Streams {
    pub stdout: Box<dyn Write>,
    pub stderr: Box<dyn Write>,
    /// Receives command lines printed by dry runs.
    pub echo: Box<dyn Write + Send>,
}

impl Streams {
    /// The process's standard streams.
    pub fn std() -> Self {
        Self {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
            echo: Box::new(io::stdout()),
        }
    }
}

/// Fully composed CLI: declared verbs plus the parser derived from them.
pub struct CliContext {
    pub space: VerbSpace,
    pub registry: VerbRegistry,
    pub command: Command,
    pub config: CliConfig,
}

/// Declare and validate every verb, then derive the command-line parser.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let space = VerbSpace::new(
        PROGRAM_NAME,
        env!("CARGO_PKG_VERSION"),
        "Create, administer and package a database cluster.",
    );
    let mut registry = VerbRegistry::new();
    verbs::declare(&mut registry, &space)?;
    registry.validate_all()?;
    let command = parser::build_command(&space, &mut registry)?;
    debug!(verbs = registry.len(), "Verbs declared");
    Ok(CliContext {
        space,
        registry,
        command,
        config,
    })
}

impl CliContext {
    /// Parse `args` (program name first) and execute the selected verb.
    pub fn run<I, T>(&mut self, args: I, mut streams: Streams) -> Result<(), CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match self.command.clone().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                write!(streams.stdout, "{}", e.render())?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let help = ClapHelp::new(&self.space, &self.command, &self.registry);
        let Some((name, sub)) = matches.subcommand() else {
            writeln!(streams.stdout, "{}", help.render(&[], false)?)?;
            return Ok(());
        };

        let verb = self
            .registry
            .get_mut(name)
            .ok_or_else(|| CliError::Usage(format!("Unknown verb \"{name}\".\n")))?;
        let invocation = parser::invocation(verb.verb_mut(), sub)?;

        let config_path = sub
            .get_one::<PathBuf>(CONFIG_FILE_ARG)
            .or_else(|| matches.get_one::<PathBuf>(CONFIG_FILE_ARG))
            .cloned()
            .unwrap_or_else(|| self.config.config_path.clone());
        debug!(config = %config_path.display(), "Using configuration file");

        let deps = RunnerDeps {
            config: Box::new(FileConfigStore::open(&config_path).map_err(VerbError::from)?),
            connector: Box::new(TcpConnector::new()),
            launcher: Box::new(JavaLauncher::from_env().with_echo(streams.echo)),
            help: Box::new(help),
            packager: Box::new(
                ScriptPackager::new(&self.config.program, &self.space.name)
                    .with_config_path(&config_path),
            ),
            stdout: streams.stdout,
            stderr: streams.stderr,
        };

        let verb = self
            .registry
            .get(name)
            .ok_or_else(|| CliError::Usage(format!("Unknown verb \"{name}\".\n")))?;
        VerbRunner::new(invocation, deps).run(verb)?;
        Ok(())
    }
}
