//! The concrete [`Runner`] used by programs.

use std::io::Write;

use serde_json::Value;
use tracing::{debug, info};
use verbkit_core::error::VerbError;
use verbkit_core::ports::{
    CallResponse, ConfigStore, ConnectTarget, ConnectionError, HelpProvider, PackageRequest,
    Packager, ProcessLauncher, Runner, ServiceClient, ServiceConnector,
};
use verbkit_core::spec::{Invocation, ParsedOptions};
use verbkit_core::verb::RegisteredVerb;

/// Adapters a [`VerbRunner`] is assembled from.
pub struct RunnerDeps {
    pub config: Box<dyn ConfigStore>,
    pub connector: Box<dyn ServiceConnector>,
    pub launcher: Box<dyn ProcessLauncher>,
    pub help: Box<dyn HelpProvider>,
    pub packager: Box<dyn Packager>,
    pub stdout: Box<dyn Write>,
    pub stderr: Box<dyn Write>,
}

/// Executes one parsed invocation against the program's adapters.
pub struct VerbRunner {
    invocation: Invocation,
    deps: RunnerDeps,
    client: Option<Box<dyn ServiceClient>>,
}

impl VerbRunner {
    pub fn new(invocation: Invocation, deps: RunnerDeps) -> Self {
        Self {
            invocation,
            deps,
            client: None,
        }
    }

    /// Execute `verb`, closing any connection it left open.
    pub fn run(mut self, verb: &dyn RegisteredVerb) -> Result<(), VerbError> {
        debug!(verb = %verb.verb().name(), kind = verb.kind(), "Executing verb");
        let result = verb.execute(&mut self);
        if self.client.is_some() {
            if let Err(e) = self.disconnect() {
                debug!("Failed to close connection after verb: {}", e);
            }
        }
        if let Err(e) = self.deps.stdout.flush() {
            debug!("Failed to flush output: {}", e);
        }
        result
    }

    pub const fn invocation(&self) -> &Invocation {
        &self.invocation
    }
}

impl Runner for VerbRunner {
    fn verb_name(&self) -> &str {
        &self.invocation.verb
    }

    fn opts(&self) -> &ParsedOptions {
        &self.invocation.opts
    }

    fn args(&self) -> &[String] {
        &self.invocation.args
    }

    fn stdout(&mut self) -> &mut dyn Write {
        self.deps.stdout.as_mut()
    }

    fn stderr(&mut self) -> &mut dyn Write {
        self.deps.stderr.as_mut()
    }

    fn config(&mut self) -> &mut dyn ConfigStore {
        self.deps.config.as_mut()
    }

    fn connect(&mut self, target: &ConnectTarget, retries: u32) -> Result<(), VerbError> {
        if self.client.is_some() {
            self.disconnect()?;
        }
        let client = self.deps.connector.connect(target, retries)?;
        info!(address = %target.address(), "Connected to service");
        self.client = Some(client);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn disconnect(&mut self) -> Result<(), VerbError> {
        if let Some(mut client) = self.client.take() {
            client.close()?;
            debug!("Disconnected from service");
        }
        Ok(())
    }

    fn call(&mut self, procedure: &str, params: &[Value]) -> Result<CallResponse, VerbError> {
        let client = self.client.as_mut().ok_or(ConnectionError::NotConnected)?;
        Ok(client.call(procedure, params)?)
    }

    fn java(&mut self) -> &mut dyn ProcessLauncher {
        self.deps.launcher.as_mut()
    }

    fn help(&mut self, verb_names: &[String], all: bool) -> Result<(), VerbError> {
        let text = self.deps.help.render(verb_names, all)?;
        writeln!(self.deps.stdout, "{}", text.trim_end())?;
        Ok(())
    }

    fn package(&mut self, request: &PackageRequest) -> Result<(), VerbError> {
        let written = self.deps.packager.package(request)?;
        for path in written {
            self.info(&format!("Created \"{}\".", path.display()), &[]);
        }
        Ok(())
    }
}
