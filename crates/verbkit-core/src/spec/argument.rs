//! Positional argument declarations.

/// A declared positional argument.
///
/// Counts are signed so that malformed declarations can be represented and
/// rejected when the verb's arguments are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgument {
    name: String,
    help: String,
    min_count: i32,
    max_count: Option<i32>,
}

impl CliArgument {
    /// Declare a single-valued string argument.
    pub fn string(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            min_count: 1,
            max_count: Some(1),
        }
    }

    /// Override the counts. A `None` maximum means unbounded.
    #[must_use]
    pub const fn with_counts(mut self, min_count: i32, max_count: Option<i32>) -> Self {
        self.min_count = min_count;
        self.max_count = max_count;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub const fn min_count(&self) -> i32 {
        self.min_count
    }

    pub const fn max_count(&self) -> Option<i32> {
        self.max_count
    }

    /// Exactly one value, the only shape allowed before the last argument.
    pub const fn is_single(&self) -> bool {
        self.min_count == 1 && matches!(self.max_count, Some(1))
    }

    /// Whether more than one value may be supplied.
    pub const fn is_variadic(&self) -> bool {
        match self.max_count {
            None => true,
            Some(max) => max > 1,
        }
    }

    /// Whether at least one value is required.
    pub const fn is_required(&self) -> bool {
        self.min_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_argument_is_single() {
        let arg = CliArgument::string("catalog", "the catalog path");
        assert!(arg.is_single());
        assert!(arg.is_required());
        assert!(!arg.is_variadic());
    }

    #[test]
    fn test_optional_unbounded_argument() {
        let arg = CliArgument::string("verb", "verb name").with_counts(0, None);
        assert!(!arg.is_single());
        assert!(!arg.is_required());
        assert!(arg.is_variadic());
    }
}
