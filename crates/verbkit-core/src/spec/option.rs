//! Option declarations.
//!
//! An option is identified by its destination key, never by its flag
//! spelling. Two options with the same destination are the same option.

use std::cmp::Ordering;

use super::values::OptionValue;

/// The value type an option accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    /// Free-form string value.
    String,
    /// Presence flag, no value.
    Boolean,
    /// Signed integer value.
    Integer,
    /// One or more `host[:port]` addresses, comma separated.
    Host {
        min_count: usize,
        max_count: usize,
        default_port: Option<u16>,
    },
}

impl OptionKind {
    /// Whether the option consumes a value on the command line.
    pub const fn takes_value(&self) -> bool {
        !matches!(self, Self::Boolean)
    }
}

/// A declared command-line option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOption {
    short: Option<char>,
    long: Option<String>,
    dest: String,
    help: Option<String>,
    kind: OptionKind,
    default: Option<OptionValue>,
}

impl CliOption {
    fn new(
        short: Option<char>,
        long: Option<&str>,
        dest: &str,
        help: Option<&str>,
        kind: OptionKind,
    ) -> Self {
        Self {
            short,
            long: long.map(|l| l.trim_start_matches('-').to_string()),
            dest: dest.to_string(),
            help: help.map(str::to_string),
            kind,
            default: None,
        }
    }

    /// Declare a string option.
    pub fn string(short: Option<char>, long: Option<&str>, dest: &str, help: &str) -> Self {
        Self::new(short, long, dest, Some(help), OptionKind::String)
    }

    /// Declare a boolean flag. A `None` help hides the flag from usage text.
    pub fn boolean(short: Option<char>, long: Option<&str>, dest: &str, help: Option<&str>) -> Self {
        Self::new(short, long, dest, help, OptionKind::Boolean)
    }

    /// Declare an integer option.
    pub fn integer(short: Option<char>, long: Option<&str>, dest: &str, help: &str) -> Self {
        Self::new(short, long, dest, Some(help), OptionKind::Integer)
    }

    /// Declare a host option accepting between `min_count` and `max_count` addresses.
    pub fn host(
        short: Option<char>,
        long: Option<&str>,
        dest: &str,
        help: &str,
        min_count: usize,
        max_count: usize,
        default_port: Option<u16>,
    ) -> Self {
        Self::new(
            short,
            long,
            dest,
            Some(help),
            OptionKind::Host {
                min_count,
                max_count,
                default_port,
            },
        )
    }

    /// Attach a default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub const fn short(&self) -> Option<char> {
        self.short
    }

    /// Long flag without leading dashes.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub const fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub const fn default_value(&self) -> Option<&OptionValue> {
        self.default.as_ref()
    }

    /// Options without help text are hidden from usage output.
    pub const fn is_hidden(&self) -> bool {
        self.help.is_none()
    }

    /// Key used to order options for display.
    fn sort_key(&self) -> String {
        self.long.as_ref().map_or_else(
            || self.short.map_or_else(|| self.dest.clone(), String::from),
            Clone::clone,
        )
    }
}

impl PartialOrd for CliOption {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CliOption {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .to_lowercase()
            .cmp(&other.sort_key().to_lowercase())
            .then_with(|| self.dest.cmp(&other.dest))
    }
}
