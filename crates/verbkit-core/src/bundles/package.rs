//! Packaging verb bundle.

use std::path::PathBuf;

use super::{Bundle, BundleHooks};
use crate::error::VerbError;
use crate::ports::{PackageRequest, Runner};
use crate::spec::{CliArgument, CliOption, VerbDefaults};
use crate::verb::{CommandVerb, Verb};

const PACKAGE_DESCRIPTION2: &str = "\
The optional NAME argument(s) allow package generation for base commands other
than the current one. If no NAME is provided the current base command is
packaged.";

/// Packages base commands as runnable programs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageBundle;

impl Bundle for PackageBundle {
    fn hooks(&self) -> BundleHooks {
        BundleHooks::INITIALIZE | BundleHooks::GO
    }

    fn initialize(&self, verb: &mut Verb) {
        verb.set_defaults(VerbDefaults {
            description: Some("Create a runnable program package.".to_string()),
            description2: Some(PACKAGE_DESCRIPTION2.to_string()),
            base_verb: Some(true),
            hide_verb: Some(true),
            ..VerbDefaults::default()
        });
        verb.add_options([
            CliOption::boolean(Some('f'), Some("--force"), "force", Some("overwrite existing files"))
                .with_default(false),
            CliOption::string(Some('o'), Some("--output_dir"), "output_dir", "specify the output directory (defaults to the working directory)"),
        ]);
        verb.add_arguments([
            CliArgument::string("name", "[ NAME ... ]").with_counts(0, None)
        ]);
    }

    fn go(&self, _verb: &CommandVerb, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let opts = runner.opts();
        let request = PackageRequest {
            output_dir: opts.string("output_dir").map(PathBuf::from),
            force: opts.flag("force"),
            names: opts.list("name").to_vec(),
        };
        runner.package(&request)
    }
}
