//! Verbs: named sub-commands with an option/argument specification.
//!
//! [`Verb`] is the base container shared by every verb kind. Option and
//! argument lists are re-sorted and re-validated lazily: a mutation marks the
//! list [`SpecState::Dirty`], and the next read performs the check.
//!
//! # Argument invariants
//!
//! - no argument declares a negative minimum or maximum count
//! - no argument declares zero for both counts
//! - only the last argument may be optional or repeat

mod command;
mod config;
mod multi;

use tracing::debug;

pub use command::{CommandVerb, VerbContext, VerbFn, verb_fn};
pub use config::VerbConfig;
pub use multi::{MODIFIER_ARGS_ARGUMENT, MODIFIER_ARGUMENT, Modifier, MultiVerb};

use crate::error::{DeclarationError, VerbError};
use crate::ports::Runner;
use crate::spec::{CliArgument, CliOption, VerbAttributes, VerbDefaults};

/// Whether a specification list needs re-checking before its next read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpecState {
    #[default]
    Clean,
    Dirty,
}

/// Base verb: name, specification, classpath and pre-supplied arguments.
#[derive(Debug, Clone)]
pub struct Verb {
    name: String,
    attributes: VerbAttributes,
    options: Vec<CliOption>,
    arguments: Vec<CliArgument>,
    options_state: SpecState,
    arguments_state: SpecState,
    classpath: Option<String>,
    command_arguments: Vec<String>,
}

impl Verb {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: VerbAttributes::default(),
            options: Vec::new(),
            arguments: Vec::new(),
            options_state: SpecState::Clean,
            arguments_state: SpecState::Clean,
            classpath: None,
            command_arguments: Vec::new(),
        }
    }

    /// Build the base verb from the specification part of a declaration.
    pub(crate) fn from_config(name: &str, config: &mut VerbConfig) -> Self {
        let mut verb = Self::new(name);
        verb.attributes = std::mem::take(&mut config.attributes);
        verb.classpath = config.classpath.take();
        verb.command_arguments = std::mem::take(&mut config.command_arguments);
        verb.add_options(std::mem::take(&mut config.options));
        verb.add_arguments(std::mem::take(&mut config.arguments));
        debug!(
            verb = %verb.name,
            options = verb.options.len(),
            arguments = verb.arguments.len(),
            "Declared verb"
        );
        verb
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn attributes(&self) -> &VerbAttributes {
        &self.attributes
    }

    pub fn classpath(&self) -> Option<&str> {
        self.classpath.as_deref()
    }

    pub fn command_arguments(&self) -> &[String] {
        &self.command_arguments
    }

    pub const fn options_state(&self) -> SpecState {
        self.options_state
    }

    pub const fn arguments_state(&self) -> SpecState {
        self.arguments_state
    }

    /// Add options whose destination key is not already present.
    pub fn add_options<I>(&mut self, options: I)
    where
        I: IntoIterator<Item = CliOption>,
    {
        for option in options {
            if self.find_option(option.dest()).is_some() {
                debug!(verb = %self.name, "Not adding \"{}\" option more than once.", option.dest());
            } else {
                self.options.push(option);
                self.options_state = SpecState::Dirty;
            }
        }
    }

    /// Append positional arguments in order.
    pub fn add_arguments<I>(&mut self, arguments: I)
    where
        I: IntoIterator<Item = CliArgument>,
    {
        let before = self.arguments.len();
        self.arguments.extend(arguments);
        if self.arguments.len() != before {
            self.arguments_state = SpecState::Dirty;
        }
    }

    /// Append pre-supplied argument values.
    pub fn add_command_arguments<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_arguments
            .extend(values.into_iter().map(Into::into));
    }

    /// Append colon-separated classpath entries.
    pub fn add_to_classpath<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts: Vec<String> = self.classpath.take().into_iter().collect();
        parts.extend(paths.into_iter().map(Into::into));
        self.classpath = Some(parts.join(":"));
    }

    pub fn set_defaults(&mut self, defaults: VerbDefaults) {
        self.attributes.set_defaults(defaults);
    }

    pub fn merge_java_options<I, S>(&mut self, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.merge_java_options(options);
    }

    pub fn find_option(&self, dest: &str) -> Option<&CliOption> {
        self.options.iter().find(|o| o.dest() == dest)
    }

    pub fn find_argument(&self, name: &str) -> Option<&CliArgument> {
        self.arguments.iter().find(|a| a.name() == name)
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Options in display order.
    pub fn iter_options(&mut self) -> std::slice::Iter<'_, CliOption> {
        self.check_options();
        self.options.iter()
    }

    /// All declared arguments, after validation.
    pub fn iter_arguments(&mut self) -> Result<std::slice::Iter<'_, CliArgument>, DeclarationError> {
        self.check_arguments()?;
        Ok(self.arguments.iter())
    }

    /// Arguments not already satisfied by pre-supplied command arguments.
    pub fn iter_required_arguments(
        &mut self,
    ) -> Result<std::iter::Skip<std::slice::Iter<'_, CliArgument>>, DeclarationError> {
        self.check_arguments()?;
        let supplied = self.command_arguments.len();
        Ok(self.arguments.iter().skip(supplied))
    }

    /// Run any pending sort or validation pass.
    pub fn validate(&mut self) -> Result<(), DeclarationError> {
        self.check_options();
        self.check_arguments()
    }

    fn check_options(&mut self) {
        if self.options_state == SpecState::Dirty {
            self.options.sort();
            self.options_state = SpecState::Clean;
        }
    }

    fn check_arguments(&mut self) -> Result<(), DeclarationError> {
        if self.arguments_state == SpecState::Clean {
            return Ok(());
        }
        let last = self.arguments.len().saturating_sub(1);
        for (index, argument) in self.arguments.iter().enumerate() {
            self.check_argument(argument, index == last)?;
        }
        self.arguments_state = SpecState::Clean;
        Ok(())
    }

    fn check_argument(&self, argument: &CliArgument, is_last: bool) -> Result<(), DeclarationError> {
        let verb = self.name.clone();
        let name = argument.name().to_string();
        if argument.min_count() < 0 || argument.max_count().is_some_and(|max| max < 0) {
            return Err(DeclarationError::NegativeCount { verb, argument: name });
        }
        if argument.max_count().is_some_and(|max| max < argument.min_count()) {
            return Err(DeclarationError::InvertedCounts { verb, argument: name });
        }
        if argument.min_count() == 0 && argument.max_count() == Some(0) {
            return Err(DeclarationError::ZeroCounts { verb, argument: name });
        }
        if !is_last && !argument.is_single() {
            return Err(DeclarationError::NonTerminalCounts { verb, argument: name });
        }
        Ok(())
    }
}

/// A verb held by the registry.
pub trait RegisteredVerb: Send + Sync {
    /// The base specification.
    fn verb(&self) -> &Verb;

    fn verb_mut(&mut self) -> &mut Verb;

    /// Name of the concrete verb kind, used in diagnostics.
    fn kind(&self) -> &'static str;

    /// The wrapped verb body, for verb kinds that have one.
    fn function(&self) -> Option<&VerbFn> {
        None
    }

    /// Run the verb. Every concrete kind overrides this.
    fn execute(&self, _runner: &mut dyn Runner) -> Result<(), VerbError> {
        Err(VerbError::Unimplemented {
            kind: self.kind(),
            name: self.verb().name().to_string(),
        })
    }
}

impl RegisteredVerb for Verb {
    fn verb(&self) -> &Verb {
        self
    }

    fn verb_mut(&mut self) -> &mut Verb {
        self
    }

    fn kind(&self) -> &'static str {
        "Verb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counted(name: &str, min: i32, max: Option<i32>) -> CliArgument {
        CliArgument::string(name, name).with_counts(min, max)
    }

    #[test]
    fn test_duplicate_option_is_added_once() {
        let mut verb = Verb::new("status");
        verb.add_options([CliOption::string(Some('u'), Some("--user"), "username", "user")]);
        verb.add_options([CliOption::string(None, Some("--login"), "username", "other spelling")]);
        assert_eq!(verb.iter_options().count(), 1);
        assert_eq!(verb.find_option("username").and_then(CliOption::long), Some("user"));
    }

    #[test]
    fn test_options_sorted_lazily() {
        let mut verb = Verb::new("status");
        verb.add_options([
            CliOption::string(Some('u'), Some("--user"), "username", "user"),
            CliOption::string(Some('p'), Some("--password"), "password", "pw"),
        ]);
        assert_eq!(verb.options_state(), SpecState::Dirty);
        let dests: Vec<&str> = verb.iter_options().map(CliOption::dest).collect();
        assert_eq!(dests, ["password", "username"]);
        assert_eq!(verb.options_state(), SpecState::Clean);
    }

    #[test]
    fn test_re_adding_existing_option_keeps_state_clean() {
        let mut verb = Verb::new("status");
        verb.add_options([CliOption::boolean(Some('a'), Some("--all"), "all", Some("all"))]);
        let _ = verb.iter_options().count();
        verb.add_options([CliOption::boolean(Some('a'), Some("--all"), "all", Some("all"))]);
        assert_eq!(verb.options_state(), SpecState::Clean);
    }

    #[test]
    fn test_trailing_variadic_argument_is_valid() {
        let mut verb = Verb::new("get");
        verb.add_arguments([counted("a", 1, Some(1)), counted("b", 0, None)]);
        let names: Vec<&str> = verb.iter_arguments().unwrap().map(CliArgument::name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(verb.arguments_state(), SpecState::Clean);
    }

    #[test]
    fn test_non_terminal_variadic_argument_is_rejected() {
        let mut verb = Verb::new("get");
        verb.add_arguments([counted("a", 0, None), counted("b", 1, Some(1))]);
        let err = verb.iter_arguments().unwrap_err();
        assert_eq!(
            err,
            DeclarationError::NonTerminalCounts {
                verb: "get".to_string(),
                argument: "a".to_string()
            }
        );
        assert!(err.to_string().contains("is not the last argument"));
    }

    #[test]
    fn test_zero_zero_argument_is_rejected() {
        let mut verb = Verb::new("noop");
        verb.add_arguments([counted("a", 0, Some(0))]);
        assert!(matches!(
            verb.iter_arguments(),
            Err(DeclarationError::ZeroCounts { .. })
        ));
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let mut verb = Verb::new("neg");
        verb.add_arguments([counted("a", -1, Some(1))]);
        assert!(matches!(
            verb.validate(),
            Err(DeclarationError::NegativeCount { .. })
        ));

        let mut verb = Verb::new("neg");
        verb.add_arguments([counted("a", 1, Some(-2))]);
        assert!(matches!(
            verb.validate(),
            Err(DeclarationError::NegativeCount { .. })
        ));
    }

    #[test]
    fn test_max_below_min_is_rejected() {
        let mut verb = Verb::new("inverted");
        verb.add_arguments([counted("a", 3, Some(2))]);
        assert_eq!(
            verb.validate(),
            Err(DeclarationError::InvertedCounts {
                verb: "inverted".to_string(),
                argument: "a".to_string(),
            })
        );

        let mut verb = Verb::new("exact");
        verb.add_arguments([counted("a", 2, Some(2))]);
        assert_eq!(verb.validate(), Ok(()));
    }

    #[test]
    fn test_failed_validation_stays_dirty() {
        let mut verb = Verb::new("noop");
        verb.add_arguments([counted("a", 0, Some(0))]);
        assert!(verb.validate().is_err());
        assert_eq!(verb.arguments_state(), SpecState::Dirty);
        assert!(verb.validate().is_err());
    }

    #[test]
    fn test_required_arguments_skip_command_arguments() {
        let mut verb = Verb::new("create");
        verb.add_arguments([
            CliArgument::string("mode", "mode"),
            CliArgument::string("catalog", "catalog"),
        ]);
        verb.add_command_arguments(["create"]);
        let names: Vec<&str> = verb
            .iter_required_arguments()
            .unwrap()
            .map(CliArgument::name)
            .collect();
        assert_eq!(names, ["catalog"]);
        // Restartable: a second pass yields the same elements.
        assert_eq!(verb.iter_required_arguments().unwrap().count(), 1);
    }

    #[test]
    fn test_add_to_classpath_joins_with_colons() {
        let mut verb = Verb::new("run");
        verb.add_to_classpath(["a.jar"]);
        verb.add_to_classpath(["b.jar", "c.jar"]);
        assert_eq!(verb.classpath(), Some("a.jar:b.jar:c.jar"));
    }

    #[test]
    fn test_base_verb_execute_is_unimplemented() {
        let verb = Verb::new("bare");
        assert_eq!(verb.kind(), "Verb");
        let mut runner = crate::testing::RecordingRunner::new("bare");
        let err = verb.execute(&mut runner).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Verb \"bare\" object does not implement the required execute() method."
        );
    }
}
