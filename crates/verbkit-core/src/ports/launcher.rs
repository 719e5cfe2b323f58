//! Subprocess launch port.

use super::ProcessError;

/// Intent to launch an external program.
///
/// `target` names what to run (a Java main class for the stock launcher);
/// the adapter decides how to turn it into a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Program entry point.
    pub target: String,
    /// Class or library search path.
    pub classpath: Option<String>,
    /// Launch flags replacing the adapter's defaults when non-empty.
    pub opts_override: Vec<String>,
    /// Port for an attached remote debugger.
    pub debug_port: Option<u16>,
    /// Print the command line instead of running it.
    pub dry_run: bool,
    /// Trailing program arguments.
    pub args: Vec<String>,
}

impl LaunchRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

/// Runs external programs to completion.
///
/// Failures are reported, never swallowed: a non-zero exit is an error.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessLauncher {
    fn execute(&mut self, request: &LaunchRequest) -> Result<(), ProcessError>;
}
