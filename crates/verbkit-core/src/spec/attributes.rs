//! Free-form verb attributes used for help display and launch behavior.

/// Descriptive and behavioral attributes of a verb.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbAttributes {
    /// One-line description shown in verb listings.
    pub description: Option<String>,
    /// Extended help shown after the usage text.
    pub description2: Option<String>,
    /// Custom usage string overriding the generated one.
    pub usage: Option<String>,
    /// Verb is common to every program built on the framework.
    pub base_verb: bool,
    /// Verb is omitted from general help listings.
    pub hide_verb: bool,
    /// Unrecognized trailing arguments are forwarded untouched.
    pub passthrough: bool,
    /// Launch flags replacing the launcher's defaults.
    pub java_opts_override: Vec<String>,
}

/// Default attribute values offered by bundles or derived verbs.
///
/// Each field is applied only when the corresponding attribute is still
/// unset, so explicit declaration keywords always win.
#[derive(Debug, Clone, Default)]
pub struct VerbDefaults {
    pub description: Option<String>,
    pub description2: Option<String>,
    pub usage: Option<String>,
    pub base_verb: Option<bool>,
    pub hide_verb: Option<bool>,
    pub passthrough: Option<bool>,
}

impl VerbAttributes {
    /// Fill unset attributes from `defaults`.
    pub fn set_defaults(&mut self, defaults: VerbDefaults) {
        if self.description.is_none() {
            self.description = defaults.description;
        }
        if self.description2.is_none() {
            self.description2 = defaults.description2;
        }
        if self.usage.is_none() {
            self.usage = defaults.usage;
        }
        // Flags have no "unset" state; a default only ever raises them.
        if let Some(true) = defaults.base_verb {
            self.base_verb = true;
        }
        if let Some(true) = defaults.hide_verb {
            self.hide_verb = true;
        }
        if let Some(passthrough) = defaults.passthrough {
            self.passthrough |= passthrough;
        }
    }

    /// Append launch flags that are not already present.
    pub fn merge_java_options<I, S>(&mut self, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for option in options {
            let option = option.into();
            if !self.java_opts_override.contains(&option) {
                self.java_opts_override.push(option);
            }
        }
    }
}
