//! Help verb bundle.

use super::{Bundle, BundleHooks};
use crate::error::VerbError;
use crate::ports::Runner;
use crate::spec::{CliArgument, CliOption, VerbDefaults};
use crate::verb::{CommandVerb, Verb};

/// Displays general help, or help for the verbs named as arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpBundle;

impl Bundle for HelpBundle {
    fn hooks(&self) -> BundleHooks {
        BundleHooks::INITIALIZE | BundleHooks::GO
    }

    fn initialize(&self, verb: &mut Verb) {
        verb.set_defaults(VerbDefaults {
            description: Some("Display general or verb-specific help.".to_string()),
            base_verb: Some(true),
            ..VerbDefaults::default()
        });
        verb.add_options([CliOption::boolean(
            Some('a'),
            Some("--all"),
            "all",
            Some("display all available help, including verb usage"),
        )]);
        verb.add_arguments([
            CliArgument::string("verb", "verb name").with_counts(0, None)
        ]);
    }

    fn go(&self, _verb: &CommandVerb, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let names = runner.opts().list("verb").to_vec();
        let all = runner.opts().flag("all");
        runner.help(&names, all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ParsedOptions;
    use crate::testing::RecordingRunner;
    use crate::verb::{VerbConfig, verb_fn};

    #[test]
    fn test_go_requests_help_for_named_verbs() {
        let verb = CommandVerb::new(
            "help",
            verb_fn(|ctx| ctx.go()),
            VerbConfig::new().bundle(HelpBundle),
        );
        assert!(verb.base().attributes().base_verb);

        let mut runner = RecordingRunner::new("help").with_opts(
            ParsedOptions::new()
                .with("verb", vec!["config".to_string(), "create".to_string()])
                .with("all", true),
        );
        HelpBundle.go(&verb, &mut runner).unwrap();
        assert_eq!(
            runner.help_requests,
            [(vec!["config".to_string(), "create".to_string()], true)]
        );
    }
}
