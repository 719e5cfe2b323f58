//! The runner port: everything a verb can reach while it executes.
//!
//! A runner is built for exactly one invocation. It owns the parsed command
//! line, the output streams, and the adapters for configuration, remote
//! calls, subprocess launches, help and packaging.

use std::io::{self, Write};

use serde_json::Value;
use tracing::{debug, error};

use super::{CallResponse, ConfigStore, ConnectTarget, PackageRequest, ProcessLauncher};
use crate::error::VerbError;
use crate::spec::ParsedOptions;

/// Execution context handed to bundles and verb bodies.
pub trait Runner {
    /// Name of the verb being executed.
    fn verb_name(&self) -> &str;

    /// Parsed options and positional arguments.
    fn opts(&self) -> &ParsedOptions;

    /// Pass-through arguments.
    fn args(&self) -> &[String];

    /// User-facing output stream.
    fn stdout(&mut self) -> &mut dyn Write;

    /// User-facing error stream.
    fn stderr(&mut self) -> &mut dyn Write;

    /// Program configuration.
    fn config(&mut self) -> &mut dyn ConfigStore;

    /// Open the service connection used by [`Runner::call`].
    fn connect(&mut self, target: &ConnectTarget, retries: u32) -> Result<(), VerbError>;

    fn is_connected(&self) -> bool;

    /// Close the service connection if one is open.
    fn disconnect(&mut self) -> Result<(), VerbError>;

    /// Invoke a remote procedure on the open connection.
    fn call(&mut self, procedure: &str, params: &[Value]) -> Result<CallResponse, VerbError>;

    /// Subprocess launcher.
    fn java(&mut self) -> &mut dyn ProcessLauncher;

    /// Display help for the named verbs, or general help when none are named.
    fn help(&mut self, verb_names: &[String], all: bool) -> Result<(), VerbError>;

    /// Package base commands as runnable programs.
    fn package(&mut self, request: &PackageRequest) -> Result<(), VerbError>;

    /// Invoke a remote procedure, optionally turning a failed status into an abort.
    fn call_procedure(
        &mut self,
        procedure: &str,
        params: &[Value],
        check_status: bool,
    ) -> Result<CallResponse, VerbError> {
        let response = self.call(procedure, params)?;
        if check_status && !response.is_success() {
            let status = response
                .status_string
                .clone()
                .unwrap_or_else(|| format!("status {}", response.status));
            return Err(self.abort(&format!("\"{procedure}\" call failed: {status}"), &[]));
        }
        Ok(response)
    }

    /// Build the error that stops execution with a user-facing message.
    ///
    /// Callers return it: `return Err(runner.abort("...", &[]))`.
    fn abort(&self, message: &str, details: &[String]) -> VerbError {
        error!(verb = %self.verb_name(), "{}", message);
        VerbError::aborted(message, details)
    }

    fn info(&mut self, message: &str, details: &[String]) {
        if let Err(e) = write_message(self.stdout(), "INFO", message, details) {
            debug!("Failed to write info message: {}", e);
        }
    }

    fn error(&mut self, message: &str, details: &[String]) {
        if let Err(e) = write_message(self.stderr(), "ERROR", message, details) {
            debug!("Failed to write error message: {}", e);
        }
    }

    /// Diagnostic output, only visible with debug logging enabled.
    fn debug(&mut self, message: &str, details: &[String]) {
        debug!(verb = %self.verb_name(), ?details, "{}", message);
    }
}

/// Write `PREFIX: message` followed by indented detail lines.
pub fn write_message(
    out: &mut dyn Write,
    prefix: &str,
    message: &str,
    details: &[String],
) -> io::Result<()> {
    writeln!(out, "{prefix}: {message}")?;
    for detail in details {
        writeln!(out, "  {detail}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_message_indents_details() {
        let mut buf = Vec::new();
        write_message(
            &mut buf,
            "ERROR",
            "Bad arguments:",
            &["x".to_string(), "y".to_string()],
        )
        .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ERROR: Bad arguments:\n  x\n  y\n");
    }
}
