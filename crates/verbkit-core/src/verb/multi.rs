//! Multi-command verbs dispatching on a modifier word.
//!
//! `config get KEY`, `config set KEY=VALUE` and `config reset` are one verb
//! with three modifiers. The first positional argument selects the modifier.

use std::fmt;

use super::{CommandVerb, RegisteredVerb, Verb, VerbConfig, VerbContext, VerbFn, verb_fn};
use crate::error::{DeclarationError, VerbError};
use crate::ports::Runner;
use crate::spec::{CliArgument, VerbDefaults};
use crate::table::TextTable;

/// Destination key of the modifier argument.
pub const MODIFIER_ARGUMENT: &str = "modifier";

/// Destination key of the trailing modifier arguments.
pub const MODIFIER_ARGS_ARGUMENT: &str = "arg";

/// One sub-action of a multi-command verb.
#[derive(Clone)]
pub struct Modifier {
    name: String,
    function: VerbFn,
    description: String,
    arg_name: String,
}

impl Modifier {
    pub fn new<F>(name: &str, function: F, description: &str) -> Self
    where
        F: Fn(&mut VerbContext<'_>) -> Result<(), VerbError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            function: verb_fn(function),
            description: description.to_string(),
            arg_name: String::new(),
        }
    }

    /// Name the modifier's trailing arguments in usage text. Stored uppercase.
    #[must_use]
    pub fn with_arg_name(mut self, arg_name: &str) -> Self {
        self.arg_name = arg_name.to_uppercase();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arg_name(&self) -> &str {
        &self.arg_name
    }

    pub const fn function(&self) -> &VerbFn {
        &self.function
    }

    /// Usage line, e.g. `config get [ KEY ... ]`.
    pub fn usage(&self, verb_name: &str) -> String {
        if self.arg_name.is_empty() {
            format!("{verb_name} {}", self.name)
        } else {
            format!("{verb_name} {} [ {} ... ]", self.name, self.arg_name)
        }
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifier")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arg_name", &self.arg_name)
            .finish_non_exhaustive()
    }
}

/// A command verb whose default action dispatches to a modifier.
#[derive(Debug, Clone)]
pub struct MultiVerb {
    command: CommandVerb,
    modifiers: Vec<Modifier>,
}

impl MultiVerb {
    pub fn new(name: &str, function: VerbFn, mut config: VerbConfig) -> Result<Self, DeclarationError> {
        let modifiers = std::mem::take(&mut config.modifiers);
        if modifiers.is_empty() {
            return Err(DeclarationError::NoModifiers(name.to_string()));
        }
        let mut command = CommandVerb::new(name, function, config);
        let verb = command.verb_mut();

        let mut table = TextTable::new()
            .caption(&format!("\"{name}\" Command Variations"))
            .separator("  ");
        for modifier in &modifiers {
            table.push_row([modifier.usage(name), modifier.description.clone()]);
        }
        verb.set_defaults(VerbDefaults {
            description2: Some(table.render()),
            ..VerbDefaults::default()
        });

        let names: Vec<&str> = modifiers.iter().map(Modifier::name).collect();
        verb.add_arguments([CliArgument::string(
            MODIFIER_ARGUMENT,
            &format!("command modifier (valid modifiers: {})", names.join("|")),
        )]);

        let with_args = modifiers.iter().filter(|m| !m.arg_name.is_empty()).count();
        if with_args > 0 {
            let help = if with_args == modifiers.len() {
                "optional arguments(s)"
            } else {
                "optional arguments(s) (where applicable)"
            };
            verb.add_arguments([
                CliArgument::string(MODIFIER_ARGS_ARGUMENT, help).with_counts(0, None)
            ]);
        }

        Ok(Self { command, modifiers })
    }

    pub fn name(&self) -> &str {
        self.command.name()
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub const fn command(&self) -> &CommandVerb {
        &self.command
    }

    /// First modifier whose name matches, ignoring case.
    pub fn find_modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    fn dispatch(&self, ctx: &mut VerbContext<'_>) -> Result<(), VerbError> {
        let requested = ctx
            .opts()
            .string(MODIFIER_ARGUMENT)
            .unwrap_or_default()
            .to_lowercase();
        if let Some(modifier) = self.find_modifier(&requested) {
            return (modifier.function)(ctx);
        }

        let verb_name = self.name().to_string();
        let names: Vec<String> = self.modifiers.iter().map(|m| m.name.clone()).collect();
        let runner = ctx.runner();
        runner.error(
            &format!("Invalid \"{verb_name}\" modifier \"{requested}\". Valid modifiers are listed below:"),
            &names,
        );
        runner.help(&[verb_name], false)
    }
}

impl RegisteredVerb for MultiVerb {
    fn verb(&self) -> &Verb {
        self.command.verb()
    }

    fn verb_mut(&mut self) -> &mut Verb {
        self.command.verb_mut()
    }

    fn kind(&self) -> &'static str {
        "MultiVerb"
    }

    fn function(&self) -> Option<&VerbFn> {
        self.command.function()
    }

    fn execute(&self, runner: &mut dyn Runner) -> Result<(), VerbError> {
        self.command
            .run(runner, &|ctx: &mut VerbContext<'_>| self.dispatch(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ParsedOptions;
    use crate::testing::{EventLog, RecordingRunner};

    fn modifier(name: &str, events: &EventLog) -> Modifier {
        let events = events.clone();
        let label = name.to_string();
        Modifier::new(name, move |_ctx| {
            events.push(format!("modifier({label})"));
            Ok(())
        }, &format!("{name} things"))
    }

    fn config_verb(events: &EventLog) -> MultiVerb {
        MultiVerb::new(
            "config",
            verb_fn(|ctx| ctx.go()),
            VerbConfig::new().modifiers([
                modifier("get", events).with_arg_name("key"),
                modifier("set", events).with_arg_name("key_value"),
                modifier("reset", events),
            ]),
        )
        .unwrap()
    }

    fn run(verb: &MultiVerb, requested: &str) -> RecordingRunner {
        let mut runner = RecordingRunner::new("config")
            .with_opts(ParsedOptions::new().with(MODIFIER_ARGUMENT, requested));
        verb.execute(&mut runner).unwrap();
        runner
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let events = EventLog::new();
        let verb = config_verb(&events);
        run(&verb, "SET");
        assert_eq!(events.events(), ["modifier(set)"]);
    }

    #[test]
    fn test_first_matching_modifier_wins() {
        let events = EventLog::new();
        let verb = MultiVerb::new(
            "dup",
            verb_fn(|ctx| ctx.go()),
            VerbConfig::new().modifiers([
                Modifier::new("x", { let e = events.clone(); move |_ctx| { e.push("first"); Ok(()) } }, "x"),
                Modifier::new("x", { let e = events.clone(); move |_ctx| { e.push("second"); Ok(()) } }, "x"),
            ]),
        )
        .unwrap();
        run(&verb, "x");
        assert_eq!(events.events(), ["first"]);
    }

    #[test]
    fn test_unknown_modifier_reports_and_shows_help() {
        let events = EventLog::new();
        let verb = config_verb(&events);
        let runner = run(&verb, "bogus");
        assert!(events.events().is_empty());
        assert_eq!(
            runner.stderr_text(),
            "ERROR: Invalid \"config\" modifier \"bogus\". Valid modifiers are listed below:\n  get\n  set\n  reset\n"
        );
        assert_eq!(runner.help_requests, [(vec!["config".to_string()], false)]);
    }

    #[test]
    fn test_declaration_adds_modifier_arguments() {
        let events = EventLog::new();
        let mut verb = config_verb(&events);
        let base = verb.verb_mut();
        let args: Vec<(String, String)> = base
            .iter_arguments()
            .unwrap()
            .map(|a| (a.name().to_string(), a.help().to_string()))
            .collect();
        assert_eq!(
            args,
            [
                (
                    "modifier".to_string(),
                    "command modifier (valid modifiers: get|set|reset)".to_string()
                ),
                (
                    "arg".to_string(),
                    "optional arguments(s) (where applicable)".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_usage_table_becomes_description2() {
        let events = EventLog::new();
        let verb = config_verb(&events);
        assert_eq!(
            verb.verb().attributes().description2.as_deref(),
            Some(
                "\"config\" Command Variations\n\
                 \n\
                 config get [ KEY ... ]        get things\n\
                 config set [ KEY_VALUE ... ]  set things\n\
                 config reset                  reset things"
            )
        );
    }

    #[test]
    fn test_no_arg_modifiers_skip_arg_argument() {
        let verb = MultiVerb::new(
            "cluster",
            verb_fn(|ctx| ctx.go()),
            VerbConfig::new().modifier(Modifier::new("pause", |_ctx| Ok(()), "pause")),
        )
        .unwrap();
        assert_eq!(verb.verb().argument_count(), 1);
    }

    #[test]
    fn test_empty_modifier_list_is_rejected() {
        let err = MultiVerb::new("config", verb_fn(|ctx| ctx.go()), VerbConfig::new()).unwrap_err();
        assert_eq!(err, DeclarationError::NoModifiers("config".to_string()));
    }
}
