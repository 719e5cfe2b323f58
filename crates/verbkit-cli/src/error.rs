//! CLI error type and exit-code mapping.
//!
//! Every failure that reaches the binary passes through [`CliError`], which
//! decides both the exit code and how the failure is reported on stderr.

use std::io::Write;

use thiserror::Error;
use verbkit_core::ports::runner::write_message;
use verbkit_core::{DeclarationError, VerbError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command line could not be parsed. Holds clap's rendered message.
    #[error("{0}")]
    Usage(String),

    /// A verb was declared inconsistently.
    #[error("Invalid verb declaration: {0}")]
    Declaration(#[from] DeclarationError),

    /// A verb failed while executing.
    #[error(transparent)]
    Verb(#[from] VerbError),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Io(_) => 74,
            Self::Declaration(_) => 1,
            Self::Verb(err) => match err {
                VerbError::Option(_) => 2,      // EX_USAGE
                VerbError::Config(_) => 78,     // EX_CONFIG
                VerbError::Io(_) => 74,         // EX_IOERR
                VerbError::Process(_) => 71,    // EX_OSERR
                VerbError::Connection(_) => 69, // EX_UNAVAILABLE
                VerbError::Declaration(_)
                | VerbError::Unimplemented { .. }
                | VerbError::Aborted { .. } => 1,
            },
        }
    }

    /// Print the failure the way users expect to see it.
    ///
    /// Aborts show their message and indented details; usage errors are
    /// already formatted by clap.
    pub fn report(&self, out: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Self::Usage(rendered) => write!(out, "{rendered}"),
            Self::Verb(VerbError::Aborted { message, details }) => {
                write_message(out, "ERROR", message, details)
            }
            other => write_message(out, "ERROR", &other.to_string(), &[]),
        }
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        Self::Usage(err.render().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbkit_core::ports::{ConfigError, ConnectionError, ProcessError};

    #[test]
    fn test_exit_codes_follow_sysexits() {
        let cases: Vec<(CliError, i32)> = vec![
            (CliError::Usage("bad".to_string()), 2),
            (VerbError::aborted("stop", &[]).into(), 1),
            (VerbError::from(ConfigError::Storage("disk".to_string())).into(), 78),
            (VerbError::from(ConnectionError::NotConnected).into(), 69),
            (
                VerbError::from(ProcessError::Terminated("java".to_string())).into(),
                71,
            ),
            (std::io::Error::other("pipe").into(), 74),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn test_abort_report_lists_details() {
        let err = CliError::from(VerbError::aborted(
            "Bad arguments (must be KEY=VALUE format):",
            &["noequals".to_string()],
        ));
        let mut out = Vec::new();
        err.report(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ERROR: Bad arguments (must be KEY=VALUE format):\n  noequals\n"
        );
    }

    #[test]
    fn test_other_errors_report_display_text() {
        let err = CliError::from(VerbError::from(ConnectionError::NotConnected));
        let mut out = Vec::new();
        err.report(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ERROR: Not connected\n");
    }
}
