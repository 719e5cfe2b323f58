//! Command-line parsing derived from verb declarations.
//!
//! Each registered verb becomes a clap subcommand: options map to flags,
//! arguments map to positionals, and pass-through verbs collect everything
//! after their positionals into a trailing var-arg.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use verbkit_core::spec::OptionError;
use verbkit_core::{
    CliArgument, CliOption, DeclarationError, HostAddress, Invocation, OptionKind, OptionValue,
    ParsedOptions, Verb, VerbError, VerbRegistry, VerbSpace,
};

/// Global flag raising the log level to debug.
pub const VERBOSE_ARG: &str = "verbose";

/// Global option naming the configuration file.
pub const CONFIG_FILE_ARG: &str = "config_file";

/// Environment variable read when `--config` is absent.
pub const CONFIG_ENV: &str = "VERBKIT_CONFIG";

/// Trailing values of pass-through verbs.
pub const PASSTHROUGH_ARG: &str = "passthrough_args";

/// Build the root command with one subcommand per registered verb.
///
/// Verbs are visited in registration order; hidden verbs are still
/// parseable but left out of clap's own listings.
pub fn build_command(
    space: &VerbSpace,
    registry: &mut VerbRegistry,
) -> Result<Command, DeclarationError> {
    let mut command = Command::new(space.name.clone())
        .version(space.version.clone())
        .about(space.description.clone())
        .subcommand_value_name("VERB")
        .disable_help_subcommand(true)
        .arg(
            Arg::new(VERBOSE_ARG)
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose/debug output"),
        )
        .arg(
            Arg::new(CONFIG_FILE_ARG)
                .long("config")
                .env(CONFIG_ENV)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("Configuration file to read and update"),
        );

    for name in registry.names().to_vec() {
        if let Some(verb) = registry.get_mut(&name) {
            command = command.subcommand(verb_command(&space.name, verb.verb_mut())?);
        }
    }
    Ok(command)
}

/// The clap subcommand for one verb.
pub fn verb_command(program: &str, verb: &mut Verb) -> Result<Command, DeclarationError> {
    let name = verb.name().to_string();
    let attributes = verb.attributes().clone();

    let mut command = Command::new(name.clone()).hide(attributes.hide_verb);
    if let Some(description) = attributes.description {
        command = command.about(description);
    }
    if let Some(description2) = attributes.description2 {
        command = command.after_long_help(description2);
    }
    if let Some(usage) = attributes.usage {
        command = command.override_usage(format!("{program} {name} {usage}"));
    }

    for option in verb.iter_options() {
        command = command.arg(option_arg(option));
    }
    // Arguments already satisfied by pre-supplied command arguments are not
    // parsed from the command line.
    for argument in verb.iter_required_arguments()? {
        command = command.arg(argument_arg(argument));
    }
    if attributes.passthrough {
        command = command.arg(
            Arg::new(PASSTHROUGH_ARG)
                .value_name("ARGS")
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("arguments passed through unchanged"),
        );
    }
    Ok(command)
}

fn option_arg(option: &CliOption) -> Arg {
    let dest = option.dest().to_string();
    let mut arg = Arg::new(dest.clone()).hide(option.is_hidden());
    if let Some(short) = option.short() {
        arg = arg.short(short);
    }
    match option.long() {
        Some(long) => arg = arg.long(long.to_string()),
        // Without any flag clap would treat the option as positional.
        None if option.short().is_none() => arg = arg.long(dest.clone()),
        None => {}
    }
    if let Some(help) = option.help() {
        arg = arg.help(help.to_string());
    }

    match option.kind() {
        OptionKind::Boolean => arg.action(ArgAction::SetTrue),
        OptionKind::Integer => arg
            .action(ArgAction::Set)
            .value_name("N")
            .value_parser(value_parser!(i64)),
        OptionKind::String => arg.action(ArgAction::Set).value_name(dest.to_uppercase()),
        OptionKind::Host { .. } => arg.action(ArgAction::Set).value_name("HOST[:PORT]"),
    }
}

fn argument_arg(argument: &CliArgument) -> Arg {
    // Counts are validated non-negative before parsing.
    let min = usize::try_from(argument.min_count()).unwrap_or(0);
    let arg = Arg::new(argument.name().to_string())
        .value_name(argument.name().to_uppercase())
        .help(argument.help().to_string())
        .required(argument.is_required())
        .action(ArgAction::Set);
    // Optionality is expressed through `required`; clap positionals always
    // take at least one value when present.
    match argument.max_count() {
        None => arg.num_args(min.max(1)..),
        Some(max) => {
            let max = usize::try_from(max).unwrap_or(1).max(1);
            arg.num_args(min.max(1)..=max)
        }
    }
}

/// Convert the matches of one verb's subcommand into an [`Invocation`].
///
/// Pre-supplied command arguments fill the leading argument names, the
/// matches fill the rest.
///
/// Option defaults are applied here rather than in clap so that host
/// defaults go through the same address parsing as user input.
pub fn invocation(verb: &mut Verb, matches: &ArgMatches) -> Result<Invocation, VerbError> {
    let mut opts = ParsedOptions::new();
    for option in verb.iter_options() {
        extract_option(option, matches, &mut opts)?;
    }
    let supplied = verb.command_arguments().to_vec();
    for (argument, value) in verb.iter_arguments()?.zip(&supplied) {
        opts.insert(argument.name(), value.as_str());
    }
    for argument in verb.iter_required_arguments()? {
        let name = argument.name();
        let Some(values) = matches.get_many::<String>(name) else {
            continue;
        };
        let values: Vec<String> = values.cloned().collect();
        if argument.max_count() == Some(1) {
            if let Some(value) = values.into_iter().next() {
                opts.insert(name, value);
            }
        } else {
            opts.insert(name, values);
        }
    }

    let args = if verb.attributes().passthrough {
        matches
            .get_many::<String>(PASSTHROUGH_ARG)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    Ok(Invocation::new(verb.name(), opts).with_args(args))
}

fn extract_option(
    option: &CliOption,
    matches: &ArgMatches,
    opts: &mut ParsedOptions,
) -> Result<(), OptionError> {
    let dest = option.dest();
    match option.kind() {
        OptionKind::Boolean => {
            let default = matches!(option.default_value(), Some(OptionValue::Bool(true)));
            opts.insert(dest, matches.get_flag(dest) || default);
        }
        OptionKind::Integer => {
            if let Some(value) = matches.get_one::<i64>(dest) {
                opts.insert(dest, *value);
            } else if let Some(default) = option.default_value() {
                opts.insert(dest, default.clone());
            }
        }
        OptionKind::String => {
            if let Some(value) = matches.get_one::<String>(dest) {
                opts.insert(dest, value.as_str());
            } else if let Some(default) = option.default_value() {
                opts.insert(dest, default.clone());
            }
        }
        OptionKind::Host {
            min_count,
            max_count,
            default_port,
        } => {
            let raw = matches.get_one::<String>(dest).cloned().or_else(|| {
                match option.default_value() {
                    Some(OptionValue::String(raw)) => Some(raw.clone()),
                    _ => None,
                }
            });
            if let Some(raw) = raw {
                let hosts =
                    HostAddress::parse_list(dest, &raw, *min_count, *max_count, *default_port)?;
                opts.insert(dest, OptionValue::Hosts(hosts));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbkit_core::{ClientBundle, HelpBundle, JavaBundle, VerbConfig, VerbDefaults};

    fn registry() -> VerbRegistry {
        let mut registry = VerbRegistry::new();
        registry
            .command("help", |ctx| ctx.go(), VerbConfig::new().bundle(HelpBundle))
            .unwrap();
        registry
            .command(
                "pause",
                |_ctx| Ok(()),
                VerbConfig::new()
                    .description("Pause the cluster.")
                    .bundle(ClientBundle::admin()),
            )
            .unwrap();
        registry
            .command(
                "run",
                |ctx| ctx.go(),
                VerbConfig::new().bundle(JavaBundle::new("org.example.Main").passthrough(true)),
            )
            .unwrap();
        registry.validate_all().unwrap();
        registry
    }

    fn parse(registry: &mut VerbRegistry, argv: &[&str]) -> Invocation {
        let space = VerbSpace::new("verbkit", "0.3.0", "test program");
        let matches = build_command(&space, registry)
            .unwrap()
            .try_get_matches_from(argv)
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        let verb = registry.get_mut(name).unwrap().verb_mut();
        invocation(verb, sub).unwrap()
    }

    #[test]
    fn test_command_passes_clap_assertions() {
        let space = VerbSpace::new("verbkit", "0.3.0", "test program");
        build_command(&space, &mut registry()).unwrap().debug_assert();
    }

    #[test]
    fn test_host_default_is_parsed_with_bundle_port() {
        let mut registry = registry();
        let invocation = parse(&mut registry, &["verbkit", "pause"]);
        let host = invocation.opts.host("host").unwrap();
        assert_eq!(host.host, "localhost");
        assert_eq!(host.port, Some(21211));
    }

    #[test]
    fn test_explicit_host_and_credentials() {
        let mut registry = registry();
        let invocation = parse(
            &mut registry,
            &["verbkit", "pause", "-H", "db1:3000", "-u", "admin"],
        );
        assert_eq!(invocation.opts.host("host").unwrap().port, Some(3000));
        assert_eq!(invocation.opts.string("username"), Some("admin"));
        assert_eq!(invocation.opts.string("password"), None);
    }

    #[test]
    fn test_variadic_argument_is_a_list() {
        let mut registry = registry();
        let invocation = parse(&mut registry, &["verbkit", "help", "-a", "pause", "run"]);
        assert!(invocation.opts.flag("all"));
        assert_eq!(invocation.opts.list("verb"), ["pause", "run"]);
    }

    #[test]
    fn test_passthrough_collects_trailing_arguments() {
        let mut registry = registry();
        let invocation = parse(
            &mut registry,
            &["verbkit", "run", "--debugport", "8000", "input.txt", "--fast"],
        );
        assert_eq!(invocation.opts.integer("debugport"), Some(8000));
        assert!(!invocation.opts.flag("dryrun"));
        assert_eq!(invocation.args, ["input.txt", "--fast"]);
    }

    #[test]
    fn test_too_many_hosts_is_an_option_error() {
        let mut registry = registry();
        let space = VerbSpace::new("verbkit", "0.3.0", "test program");
        let matches = build_command(&space, &mut registry)
            .unwrap()
            .try_get_matches_from(["verbkit", "pause", "-H", "a,b"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        let verb = registry.get_mut(name).unwrap().verb_mut();
        let err = invocation(verb, sub).unwrap_err();
        assert!(matches!(err, VerbError::Option(OptionError::HostCount { .. })));
    }

    #[test]
    fn test_command_arguments_fill_leading_positionals() {
        let mut registry = VerbRegistry::new();
        registry
            .command(
                "create",
                |_ctx| Ok(()),
                VerbConfig::new()
                    .arguments([
                        CliArgument::string("mode", "start mode"),
                        CliArgument::string("catalog", "catalog path"),
                    ])
                    .command_arguments(["create"]),
            )
            .unwrap();
        registry.validate_all().unwrap();

        let space = VerbSpace::new("verbkit", "0.3.0", "test program");
        let mut command = build_command(&space, &mut registry).unwrap();
        let positionals: Vec<String> = command
            .find_subcommand_mut("create")
            .unwrap()
            .get_positionals()
            .map(|arg| arg.get_id().as_str().to_string())
            .collect();
        assert_eq!(positionals, ["catalog"]);

        let invocation = parse(&mut registry, &["verbkit", "create", "app.jar"]);
        assert_eq!(invocation.opts.string("mode"), Some("create"));
        assert_eq!(invocation.opts.string("catalog"), Some("app.jar"));
    }

    #[test]
    fn test_inverted_argument_counts_fail_declaration() {
        let mut registry = VerbRegistry::new();
        registry
            .command(
                "bad",
                |_ctx| Ok(()),
                VerbConfig::new()
                    .arguments([CliArgument::string("items", "items").with_counts(3, Some(2))]),
            )
            .unwrap();
        let space = VerbSpace::new("verbkit", "0.3.0", "test program");
        let err = build_command(&space, &mut registry).unwrap_err();
        assert!(matches!(err, DeclarationError::InvertedCounts { .. }));
    }

    #[test]
    fn test_usage_override_names_program() {
        let mut verb = Verb::new("config");
        verb.set_defaults(VerbDefaults {
            usage: Some("NAME=VALUE ...".to_string()),
            ..Default::default()
        });
        let mut command = verb_command("verbkit", &mut verb).unwrap();
        assert!(command.render_usage().to_string().contains("verbkit config NAME=VALUE ..."));
    }
}
