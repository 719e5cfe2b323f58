//! Parsed option and argument values.
//!
//! These are the values a verb sees once the command line has been parsed
//! against its specification. Positional arguments share the same map as
//! options, keyed by argument name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid option or argument value supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// A host address could not be parsed.
    #[error("Invalid host \"{value}\": {reason}")]
    InvalidHost { value: String, reason: String },

    /// A host option received too few or too many addresses.
    #[error("Option \"{dest}\" expects between {min} and {max} host(s), got {actual}")]
    HostCount {
        dest: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// A required value was not supplied.
    #[error("Missing value for \"{0}\"")]
    Missing(String),
}

/// A `host[:port]` network address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAddress {
    pub host: String,
    pub port: Option<u16>,
}

impl HostAddress {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host`, `host:port` or `[v6addr]:port`, applying `default_port`
    /// when the address carries none.
    pub fn parse(raw: &str, default_port: Option<u16>) -> Result<Self, OptionError> {
        let raw = raw.trim();
        let invalid = |reason: &str| OptionError::InvalidHost {
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        let (host, port) = if let Some(rest) = raw.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(|| invalid("unclosed '['"))?;
            match tail.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None if tail.is_empty() => (host, None),
                None => return Err(invalid("unexpected text after ']'")),
            }
        } else if raw.matches(':').count() == 1 {
            let (host, port) = raw.split_once(':').ok_or_else(|| invalid("bad separator"))?;
            (host, Some(port))
        } else {
            (raw, None)
        };

        if host.is_empty() {
            return Err(invalid("empty host name"));
        }

        let port = match port {
            Some(p) => Some(p.parse::<u16>().map_err(|_| invalid("bad port number"))?),
            None => default_port,
        };

        Ok(Self::new(host, port))
    }

    /// Parse a comma-separated address list and enforce its length bounds.
    pub fn parse_list(
        dest: &str,
        raw: &str,
        min: usize,
        max: usize,
        default_port: Option<u16>,
    ) -> Result<Vec<Self>, OptionError> {
        let hosts = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self::parse(s, default_port))
            .collect::<Result<Vec<_>, _>>()?;
        if hosts.len() < min || hosts.len() > max {
            return Err(OptionError::HostCount {
                dest: dest.to_string(),
                min,
                max,
                actual: hosts.len(),
            });
        }
        Ok(hosts)
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        match self.port {
            Some(port) => write!(f, "{host}:{port}"),
            None => f.write_str(&host),
        }
    }
}

/// A single parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Hosts(Vec<HostAddress>),
    List(Vec<String>),
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Destination key to parsed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ParsedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests.
    #[must_use]
    pub fn with(mut self, dest: &str, value: impl Into<OptionValue>) -> Self {
        self.insert(dest, value);
        self
    }

    pub fn insert(&mut self, dest: &str, value: impl Into<OptionValue>) {
        self.values.insert(dest.to_string(), value.into());
    }

    pub fn get(&self, dest: &str) -> Option<&OptionValue> {
        self.values.get(dest)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// String value, or the first element of a list value.
    pub fn string(&self, dest: &str) -> Option<&str> {
        match self.values.get(dest)? {
            OptionValue::String(s) => Some(s),
            OptionValue::List(items) => items.first().map(String::as_str),
            _ => None,
        }
    }

    /// Boolean flag, `false` when absent.
    pub fn flag(&self, dest: &str) -> bool {
        matches!(self.values.get(dest), Some(OptionValue::Bool(true)))
    }

    pub fn integer(&self, dest: &str) -> Option<i64> {
        match self.values.get(dest)? {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// All addresses of a host option.
    pub fn hosts(&self, dest: &str) -> &[HostAddress] {
        match self.values.get(dest) {
            Some(OptionValue::Hosts(hosts)) => hosts,
            _ => &[],
        }
    }

    /// First address of a host option.
    pub fn host(&self, dest: &str) -> Option<&HostAddress> {
        self.hosts(dest).first()
    }

    /// Values of a variadic argument, empty when absent.
    pub fn list(&self, dest: &str) -> &[String] {
        match self.values.get(dest) {
            Some(OptionValue::List(items)) => items,
            Some(OptionValue::String(s)) => std::slice::from_ref(s),
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One parsed command line, ready for dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Name of the verb to run.
    pub verb: String,
    /// Parsed options and positional arguments.
    pub opts: ParsedOptions,
    /// Pass-through arguments for verbs that forward them untouched.
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(verb: impl Into<String>, opts: ParsedOptions) -> Self {
        Self {
            verb: verb.into(),
            opts,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}
