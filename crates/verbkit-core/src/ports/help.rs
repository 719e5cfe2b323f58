//! Help rendering port.

use crate::error::VerbError;

/// Renders general or verb-specific help text.
pub trait HelpProvider {
    /// Help for each named verb, or general help when `verb_names` is empty.
    ///
    /// `all` adds the usage of every verb to general help.
    fn render(&self, verb_names: &[String], all: bool) -> Result<String, VerbError>;
}
