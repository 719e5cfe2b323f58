//! Declaration keywords for a verb, collected with a builder.

use std::sync::Arc;

use super::Modifier;
use crate::bundles::Bundle;
use crate::spec::{CliArgument, CliOption, VerbAttributes};

/// Everything a program can say about a verb when declaring it.
///
/// ```
/// use verbkit_core::spec::CliOption;
/// use verbkit_core::VerbConfig;
///
/// let config = VerbConfig::new()
///     .description("Show cluster status.")
///     .option(CliOption::boolean(Some('a'), Some("--all"), "all", Some("show everything")));
/// ```
#[derive(Clone, Default)]
pub struct VerbConfig {
    pub(crate) attributes: VerbAttributes,
    pub(crate) options: Vec<CliOption>,
    pub(crate) arguments: Vec<CliArgument>,
    pub(crate) classpath: Option<String>,
    pub(crate) command_arguments: Vec<String>,
    pub(crate) bundles: Vec<Arc<dyn Bundle>>,
    pub(crate) modifiers: Vec<Modifier>,
}

impl VerbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.attributes.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn description2(mut self, description2: &str) -> Self {
        self.attributes.description2 = Some(description2.to_string());
        self
    }

    #[must_use]
    pub fn usage(mut self, usage: &str) -> Self {
        self.attributes.usage = Some(usage.to_string());
        self
    }

    #[must_use]
    pub const fn base_verb(mut self, base_verb: bool) -> Self {
        self.attributes.base_verb = base_verb;
        self
    }

    #[must_use]
    pub const fn hide_verb(mut self, hide_verb: bool) -> Self {
        self.attributes.hide_verb = hide_verb;
        self
    }

    #[must_use]
    pub const fn passthrough(mut self, passthrough: bool) -> Self {
        self.attributes.passthrough = passthrough;
        self
    }

    #[must_use]
    pub fn option(mut self, option: CliOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use]
    pub fn options<I: IntoIterator<Item = CliOption>>(mut self, options: I) -> Self {
        self.options.extend(options);
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: CliArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn arguments<I: IntoIterator<Item = CliArgument>>(mut self, arguments: I) -> Self {
        self.arguments.extend(arguments);
        self
    }

    #[must_use]
    pub fn classpath(mut self, classpath: &str) -> Self {
        self.classpath = Some(classpath.to_string());
        self
    }

    /// Argument values supplied ahead of the user's own.
    #[must_use]
    pub fn command_arguments<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_arguments
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Attach a bundle. Bundles run in the order they are attached.
    #[must_use]
    pub fn bundle<B: Bundle + 'static>(self, bundle: B) -> Self {
        self.shared_bundle(Arc::new(bundle))
    }

    /// Attach a bundle instance that is shared with other verbs.
    #[must_use]
    pub fn shared_bundle(mut self, bundle: Arc<dyn Bundle>) -> Self {
        self.bundles.push(bundle);
        self
    }

    /// Add a modifier. Only multi-command verbs use modifiers.
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn modifiers<I: IntoIterator<Item = Modifier>>(mut self, modifiers: I) -> Self {
        self.modifiers.extend(modifiers);
        self
    }
}
