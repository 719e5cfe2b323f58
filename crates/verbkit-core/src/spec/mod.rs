//! Option and argument specification types.
//!
//! A verb's specification is its ordered options, ordered positional
//! arguments, and descriptive attributes. Parsing primitives that turn raw
//! command-line text into typed values also live here.

mod argument;
mod attributes;
mod option;
mod values;

pub use argument::CliArgument;
pub use attributes::{VerbAttributes, VerbDefaults};
pub use option::{CliOption, OptionKind};
pub use values::{HostAddress, Invocation, OptionError, OptionValue, ParsedOptions};
