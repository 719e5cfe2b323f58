//! Help rendering backed by the clap command tree.

use clap::Command;
use verbkit_core::{HelpProvider, TextTable, VerbError, VerbRegistry, VerbSpace};

#[derive(Debug, Clone)]
struct HelpEntry {
    name: String,
    description: String,
    base: bool,
    hidden: bool,
}

/// Renders general and verb-specific help.
///
/// General help is built from the verb attributes captured at construction;
/// verb help is clap's long help, which ends with the verb's `description2`.
#[derive(Debug, Clone)]
pub struct ClapHelp {
    program: String,
    version: String,
    description: String,
    command: Command,
    entries: Vec<HelpEntry>,
}

impl ClapHelp {
    pub fn new(space: &VerbSpace, command: &Command, registry: &VerbRegistry) -> Self {
        let mut command = command.clone();
        command.build();
        let mut entries: Vec<HelpEntry> = registry
            .iter()
            .map(|verb| {
                let verb = verb.verb();
                let attributes = verb.attributes();
                HelpEntry {
                    name: verb.name().to_string(),
                    description: attributes.description.clone().unwrap_or_default(),
                    base: attributes.base_verb,
                    hidden: attributes.hide_verb,
                }
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            program: space.name.clone(),
            version: space.version.clone(),
            description: space.description.clone(),
            command,
            entries,
        }
    }

    fn verb_table(&self, caption: &str, base: bool, all: bool) -> Option<String> {
        let mut table = TextTable::new().caption(caption).indent(2).separator("  ");
        let mut rows = 0;
        for entry in self
            .entries
            .iter()
            .filter(|e| e.base == base && (all || !e.hidden))
        {
            table.push_row([entry.name.as_str(), entry.description.as_str()]);
            rows += 1;
        }
        (rows > 0).then(|| table.render())
    }

    fn general(&self, all: bool) -> String {
        let mut blocks = vec![
            format!(
                "Usage: {} [ -v ] VERB [ OPTIONS ... ] [ ARGUMENTS ... ]",
                self.program
            ),
            format!("{} {}: {}", self.program, self.version, self.description),
        ];
        blocks.extend(self.verb_table("Verbs:", false, all));
        blocks.extend(self.verb_table("Other verbs:", true, all));
        blocks.push(format!(
            "Run \"{} help VERB\" to display help for a specific verb.",
            self.program
        ));
        if all {
            for entry in self.entries.iter().filter(|e| !e.hidden) {
                if let Ok(text) = self.verb(&entry.name) {
                    blocks.push(format!("{}\n{}", "=".repeat(72), text.trim_end()));
                }
            }
        }
        blocks.join("\n\n")
    }

    fn verb(&self, name: &str) -> Result<String, VerbError> {
        let mut command = self.command.clone();
        match command.find_subcommand_mut(name) {
            Some(sub) => Ok(sub.render_long_help().to_string()),
            None => Err(VerbError::aborted(
                format!("Unknown verb \"{name}\"."),
                &[format!("Run \"{} help\" to list the verbs.", self.program)],
            )),
        }
    }
}

impl HelpProvider for ClapHelp {
    fn render(&self, verb_names: &[String], all: bool) -> Result<String, VerbError> {
        if verb_names.is_empty() {
            return Ok(self.general(all));
        }
        let pages = verb_names
            .iter()
            .map(|name| self.verb(name).map(|text| text.trim_end().to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pages.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build_command;
    use verbkit_core::{HelpBundle, PackageBundle, VerbConfig};

    fn help() -> ClapHelp {
        let space = VerbSpace::new("verbkit", "0.3.0", "Manage a cluster.");
        let mut registry = VerbRegistry::new();
        registry
            .command("help", |ctx| ctx.go(), VerbConfig::new().bundle(HelpBundle))
            .unwrap();
        registry
            .command("package", |ctx| ctx.go(), VerbConfig::new().bundle(PackageBundle))
            .unwrap();
        registry
            .command(
                "start",
                |_ctx| Ok(()),
                VerbConfig::new()
                    .description("Start the cluster.")
                    .description2("Starts every node listed in the configuration."),
            )
            .unwrap();
        registry.validate_all().unwrap();
        let command = build_command(&space, &mut registry).unwrap();
        ClapHelp::new(&space, &command, &registry)
    }

    #[test]
    fn test_general_help_groups_base_verbs() {
        let text = help().render(&[], false).unwrap();
        assert!(text.starts_with("Usage: verbkit [ -v ] VERB"));
        let verbs = text.find("Verbs:\n\n  start  Start the cluster.").unwrap();
        let other = text
            .find("Other verbs:\n\n  help  Display general or verb-specific help.")
            .unwrap();
        assert!(verbs < other);
        // package is a hidden base verb.
        assert!(!text.contains("package"));
    }

    #[test]
    fn test_all_includes_hidden_verbs_and_usage() {
        let text = help().render(&[], true).unwrap();
        assert!(text.contains("  package  Create a runnable program package."));
        assert!(text.contains("Starts every node listed in the configuration."));
    }

    #[test]
    fn test_verb_help_ends_with_description2() {
        let text = help().render(&["start".to_string()], false).unwrap();
        assert!(text.contains("Start the cluster."));
        assert!(text.ends_with("Starts every node listed in the configuration."));
    }

    #[test]
    fn test_unknown_verb_aborts() {
        let err = help().render(&["nope".to_string()], false).unwrap_err();
        assert_eq!(err.to_string(), "Unknown verb \"nope\".");
    }
}
