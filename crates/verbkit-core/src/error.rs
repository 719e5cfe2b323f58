//! Error taxonomy for verb declaration and execution.
//!
//! Two families exist:
//!
//! - [`DeclarationError`]: mistakes in how a program declares its verbs
//!   (duplicate names, empty modifier lists, malformed argument counts).
//!   These are always fatal for the declaring program.
//! - [`VerbError`]: failures while a verb executes, including user aborts and
//!   errors surfaced by external collaborators through the ports.

use thiserror::Error;

use crate::ports::{ConfigError, ConnectionError, ProcessError};
use crate::spec::OptionError;

/// A verb was declared incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Two verbs were registered under the same name.
    #[error("Verb \"{0}\" is declared more than once.")]
    DuplicateVerb(String),

    /// A multi-command was declared without modifiers.
    #[error("Multi-command \"{0}\" must provide a \"modifiers\" list.")]
    NoModifiers(String),

    /// An argument declared a negative minimum or maximum count.
    #[error("{verb} argument ({argument}) has a negative min or max count declared.")]
    NegativeCount { verb: String, argument: String },

    /// An argument declared a maximum count below its minimum count.
    #[error("{verb} argument ({argument}) has a max count lower than its min count.")]
    InvertedCounts { verb: String, argument: String },

    /// An argument declared zero for both its minimum and maximum count.
    #[error("{verb} argument ({argument}) has zero min and max counts declared.")]
    ZeroCounts { verb: String, argument: String },

    /// An argument other than the last one may repeat or be omitted.
    #[error("{verb} argument ({argument}) is not the last argument, but has min/max counts declared.")]
    NonTerminalCounts { verb: String, argument: String },
}

/// A verb failed while executing.
#[derive(Debug, Error)]
pub enum VerbError {
    /// The verb's own declaration is broken (detected lazily).
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// The verb kind does not provide an execute implementation.
    #[error("{kind} \"{name}\" object does not implement the required execute() method.")]
    Unimplemented { kind: &'static str, name: String },

    /// Execution was deliberately stopped with a user-facing message.
    #[error("{message}")]
    Aborted {
        message: String,
        details: Vec<String>,
    },

    /// A command-line option or argument value was invalid.
    #[error(transparent)]
    Option(#[from] OptionError),

    /// Configuration storage failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Connecting to or calling the remote service failed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// A launched subprocess failed.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Writing user-facing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl VerbError {
    /// Build an abort error with optional detail lines.
    pub fn aborted(message: impl Into<String>, details: &[String]) -> Self {
        Self::Aborted {
            message: message.into(),
            details: details.to_vec(),
        }
    }

    /// Detail lines attached to an abort, empty for every other variant.
    pub fn details(&self) -> &[String] {
        match self {
            Self::Aborted { details, .. } => details,
            _ => &[],
        }
    }
}
