//! Subprocess launch bundle.

use super::{Bundle, BundleHooks};
use crate::error::VerbError;
use crate::ports::{LaunchRequest, Runner};
use crate::spec::{CliOption, VerbDefaults};
use crate::verb::{CommandVerb, Verb};

/// Launches a Java class with the verb's pass-through arguments.
#[derive(Debug, Clone)]
pub struct JavaBundle {
    java_class: String,
    passthrough: bool,
    java_opts_override: Vec<String>,
}

impl JavaBundle {
    pub fn new(java_class: &str) -> Self {
        Self {
            java_class: java_class.to_string(),
            passthrough: false,
            java_opts_override: Vec::new(),
        }
    }

    /// Forward unrecognized trailing arguments to the launched program.
    #[must_use]
    pub const fn passthrough(mut self, passthrough: bool) -> Self {
        self.passthrough = passthrough;
        self
    }

    /// Launch flags replacing the launcher defaults.
    #[must_use]
    pub fn with_opts_override<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.java_opts_override
            .extend(options.into_iter().map(Into::into));
        self
    }

    pub fn java_class(&self) -> &str {
        &self.java_class
    }

    /// Launch the class with `args`, honoring the debug and dry-run options.
    pub fn run_java(
        &self,
        verb: &Verb,
        runner: &mut dyn Runner,
        args: Vec<String>,
    ) -> Result<(), VerbError> {
        let debug_port = match runner.opts().integer("debugport") {
            None => None,
            Some(port) => match u16::try_from(port) {
                Ok(port) => Some(port),
                Err(_) => {
                    return Err(runner.abort(&format!("Invalid debug port: {port}"), &[]));
                }
            },
        };
        let request = LaunchRequest {
            target: self.java_class.clone(),
            classpath: verb.classpath().map(str::to_string),
            opts_override: verb.attributes().java_opts_override.clone(),
            debug_port,
            dry_run: runner.opts().flag("dryrun"),
            args,
        };
        runner.java().execute(&request)?;
        Ok(())
    }
}

impl Bundle for JavaBundle {
    fn hooks(&self) -> BundleHooks {
        BundleHooks::INITIALIZE | BundleHooks::GO
    }

    fn initialize(&self, verb: &mut Verb) {
        verb.set_defaults(VerbDefaults {
            passthrough: Some(self.passthrough),
            ..VerbDefaults::default()
        });
        verb.add_options([
            CliOption::integer(None, Some("--debugport"), "debugport", "enable remote Java debugging on the specified port"),
            CliOption::boolean(None, Some("--dry-run"), "dryrun", None),
        ]);
        if !self.java_opts_override.is_empty() {
            verb.merge_java_options(self.java_opts_override.iter().cloned());
        }
    }

    fn go(&self, verb: &CommandVerb, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let args = runner.args().to_vec();
        self.run_java(verb.base(), runner, args)
    }
}
