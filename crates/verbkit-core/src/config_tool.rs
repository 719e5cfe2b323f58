//! Named configuration properties and the `config` verb behavior.
//!
//! A [`ConfigurationTool`] owns a set of properties stored under a common key
//! prefix (`<key>.<name>`). It validates that required properties are set,
//! applies defaults, and implements the `get`, `set` and `reset` modifiers.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::debug;

use crate::error::VerbError;
use crate::ports::{ConfigError, ConfigStore, Runner};
use crate::table::TextTable;
use crate::verb::MODIFIER_ARGS_ARGUMENT;

/// One configurable property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProperty {
    pub description: String,
    pub default: Option<String>,
}

impl ConfigProperty {
    /// A property the user must set.
    pub fn required(description: &str) -> Self {
        Self {
            description: description.to_string(),
            default: None,
        }
    }

    /// A property with a fallback value.
    pub fn with_default(description: &str, default: &str) -> Self {
        Self {
            description: description.to_string(),
            default: Some(default.to_string()),
        }
    }
}

/// Outcome of checking the configured properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLoad {
    /// Property name to value. `None` when anything is missing or after a reset.
    pub values: Option<BTreeMap<String, String>>,
    /// Properties without a value or default.
    pub missing: Vec<String>,
    /// Properties whose default was applied and saved.
    pub defaults_applied: Vec<String>,
    /// Message blocks for the user, each possibly spanning several lines.
    pub messages: Vec<String>,
}

/// Manages the properties stored under one key prefix.
#[derive(Debug, Clone)]
pub struct ConfigurationTool {
    key: String,
    properties: BTreeMap<String, ConfigProperty>,
    command_name: String,
    config_name: String,
}

impl ConfigurationTool {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            properties: BTreeMap::new(),
            command_name: key.to_string(),
            config_name: format!("{key}.cfg"),
        }
    }

    #[must_use]
    pub fn property(mut self, name: &str, property: ConfigProperty) -> Self {
        self.properties.insert(name.to_string(), property);
        self
    }

    /// Program and configuration file names used in help text.
    #[must_use]
    pub fn with_names(mut self, command_name: &str, config_name: &str) -> Self {
        self.command_name = command_name.to_string();
        self.config_name = config_name.to_string();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn properties(&self) -> &BTreeMap<String, ConfigProperty> {
        &self.properties
    }

    /// Storage key of a property: `<key>.<name>`.
    pub fn config_key(&self, name: &str) -> String {
        format!("{}.{name}", self.key)
    }

    /// Usage instructions for the `config` verb.
    ///
    /// `samples` names properties to show in `config set` examples; a generic
    /// `name` placeholder is used when it is empty.
    pub fn help_text(&self, samples: &[String]) -> String {
        let (paren, samples) = if samples.is_empty() {
            ("", vec!["name".to_string()])
        } else {
            (" (using actual property name)", samples.to_vec())
        };
        let command = &self.command_name;
        let set_samples: Vec<String> = samples
            .iter()
            .map(|name| format!("   {command} config set {name}={}_VALUE", name.to_uppercase()))
            .collect();
        format!(
            "Use the \"config\" verb to modify and view properties as follows.\n\
             \n\
             To set a property{paren}:\n\
             {}\n\
             \n\
             To display one, many, or all properties:\n   \
             {command} config get name\n   \
             {command} config get name1 name2 ...\n   \
             {command} config get\n\
             \n\
             To get \"config\" command help:\n   \
             {command} help config\n\
             \n\
             You can also edit \"{}\" directly in a text editor.",
            set_samples.join("\n"),
            self.config_name,
        )
    }

    /// Check every property, applying and saving defaults where needed.
    ///
    /// With `reset`, every property is overwritten with its default (or
    /// cleared) and no values are returned.
    pub fn load(&self, store: &mut dyn ConfigStore, reset: bool) -> Result<ConfigLoad, ConfigError> {
        let mut values = BTreeMap::new();
        let mut missing = Vec::new();
        let mut defaults_applied = Vec::new();

        for (name, property) in &self.properties {
            let key = self.config_key(name);
            match store.get(&key).filter(|v| !v.is_empty()) {
                Some(value) if !reset => {
                    values.insert(name.clone(), value);
                }
                _ => match &property.default {
                    None => {
                        missing.push(name.clone());
                        store.set(&key, "")?;
                    }
                    Some(default) => {
                        defaults_applied.push(name.clone());
                        store.set(&key, default)?;
                        values.insert(name.clone(), default.clone());
                    }
                },
            }
        }

        let mut messages = Vec::new();
        let incomplete = !reset && !missing.is_empty();
        if incomplete {
            let mut table = TextTable::new()
                .headings(["PROPERTY", "DESCRIPTION"])
                .indent(3)
                .separator("  ");
            for name in &missing {
                table.push_row([name.as_str(), self.properties[name].description.as_str()]);
            }
            messages.push(format!(
                "The following settings must be configured before proceeding:\n\n{}",
                table.render()
            ));
        }
        if !defaults_applied.is_empty() {
            let mut table = TextTable::new()
                .headings(["PROPERTY", "VALUE"])
                .indent(3)
                .separator("  ");
            for name in &defaults_applied {
                let default = self.properties[name].default.as_deref().unwrap_or_default();
                table.push_row([name.as_str(), default]);
            }
            messages.push(format!(
                "The following setting defaults were applied and saved permanently:\n\n{}",
                table.render()
            ));
        }
        if incomplete {
            messages.push(self.help_text(&missing));
        }

        debug!(
            key = %self.key,
            reset,
            missing = missing.len(),
            defaults = defaults_applied.len(),
            "Loaded configuration properties"
        );
        Ok(ConfigLoad {
            values: (!reset && missing.is_empty()).then_some(values),
            missing,
            defaults_applied,
            messages,
        })
    }

    /// [`load`](Self::load) against the runner's store, printing any messages.
    pub fn load_and_report(&self, runner: &mut dyn Runner, reset: bool) -> Result<ConfigLoad, VerbError> {
        let load = self.load(runner.config(), reset)?;
        if !load.messages.is_empty() {
            let out = runner.stdout();
            for message in &load.messages {
                writeln!(out)?;
                writeln!(out, "{message}")?;
            }
            writeln!(out)?;
        }
        Ok(load)
    }

    /// `config get [KEY ...]`: print all pairs, or those under each key.
    pub fn run_get(&self, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let keys = runner.opts().list(MODIFIER_ARGS_ARGUMENT).to_vec();
        let mut lines = Vec::new();
        if keys.is_empty() {
            for (key, value) in runner.config().query_pairs(None) {
                lines.push(format!("{key}={value}"));
            }
        } else {
            for name in &keys {
                let pairs = runner.config().query_pairs(Some(&self.config_key(name)));
                if pairs.is_empty() {
                    lines.push(format!("{name} *not found*"));
                }
                lines.extend(pairs.into_iter().map(|(key, value)| format!("{key}={value}")));
            }
        }
        let out = runner.stdout();
        for line in lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// `config set KEY=VALUE ...`: store each pair, namespacing bare keys.
    pub fn run_set(&self, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let pairs = runner.opts().list(MODIFIER_ARGS_ARGUMENT).to_vec();
        if pairs.is_empty() {
            return Err(runner.abort("At least one argument is required.", &[]));
        }
        let bad: Vec<String> = pairs.iter().filter(|a| !a.contains('=')).cloned().collect();
        if !bad.is_empty() {
            return Err(runner.abort("Bad arguments (must be KEY=VALUE format):", &bad));
        }
        for pair in &pairs {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            let key = if key.contains('.') {
                key.to_string()
            } else {
                self.config_key(key)
            };
            runner.config().set(&key, value)?;
            writeln!(runner.stdout(), "set {key}={value}")?;
        }
        Ok(())
    }

    /// `config reset`: restore defaults, then report what still needs setting.
    pub fn run_reset(&self, runner: &mut dyn Runner) -> Result<(), VerbError> {
        runner.info("Clearing configuration settings...", &[]);
        self.load_and_report(runner, true)?;
        self.load_and_report(runner, false)?;
        Ok(())
    }
}
