//! The `config` verb: view and edit the program's configuration properties.

use std::sync::Arc;

use verbkit_core::{
    ConfigProperty, ConfigurationTool, DeclarationError, Modifier, VerbConfig, VerbRegistry,
};

/// Prefix of every property key the tool manages.
pub const CONFIG_KEY: &str = "server";

/// Name of the configuration file shown in help text.
pub const CONFIG_FILE_NAME: &str = "verbkit.cfg";

/// The configuration properties of the program named `program`.
pub fn tool(program: &str) -> ConfigurationTool {
    ConfigurationTool::new(CONFIG_KEY)
        .with_names(program, CONFIG_FILE_NAME)
        .property(
            "catalog",
            ConfigProperty::required("application catalog jar file path"),
        )
        .property(
            "deployment",
            ConfigProperty::with_default("deployment configuration file path", "deployment.xml"),
        )
}

pub fn declare(
    registry: &mut VerbRegistry,
    tool: Arc<ConfigurationTool>,
) -> Result<(), DeclarationError> {
    let get = Arc::clone(&tool);
    let reset = Arc::clone(&tool);
    let set = tool;
    registry.multi_command(
        "config",
        |ctx| ctx.go(),
        VerbConfig::new()
            .description("Manipulate and view configuration properties.")
            .modifiers([
                Modifier::new(
                    "get",
                    move |ctx| get.run_get(ctx.runner()),
                    "Show one or more configuration properties.",
                )
                .with_arg_name("KEY"),
                Modifier::new(
                    "reset",
                    move |ctx| reset.run_reset(ctx.runner()),
                    "Reset configuration properties to default values.",
                ),
                Modifier::new(
                    "set",
                    move |ctx| set.run_set(ctx.runner()),
                    "Set one or more configuration properties (use KEY=VALUE format).",
                )
                .with_arg_name("KEY_VALUE"),
            ]),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbkit_core::testing::RecordingRunner;
    use verbkit_core::{ConfigStore, InMemoryConfigStore, ParsedOptions};

    fn registry() -> VerbRegistry {
        let mut registry = VerbRegistry::new();
        declare(&mut registry, Arc::new(tool("verbkit"))).unwrap();
        registry
    }

    fn run(runner: &mut RecordingRunner) {
        registry().get("config").unwrap().execute(runner).unwrap();
    }

    #[test]
    fn test_set_namespaces_bare_keys() {
        let opts = ParsedOptions::new()
            .with("modifier", "set")
            .with("arg", vec!["catalog = app.jar".to_string(), "other.key=1".to_string()]);
        let mut runner = RecordingRunner::new("config").with_opts(opts);
        run(&mut runner);
        assert_eq!(runner.config.get("server.catalog").as_deref(), Some("app.jar"));
        assert_eq!(runner.config.get("other.key").as_deref(), Some("1"));
        assert_eq!(runner.stdout_text(), "set server.catalog=app.jar\nset other.key=1\n");
    }

    #[test]
    fn test_get_filters_by_property_name() {
        let opts = ParsedOptions::new()
            .with("modifier", "GET")
            .with("arg", vec!["catalog".to_string(), "missing".to_string()]);
        let mut runner = RecordingRunner::new("config").with_opts(opts).with_config(
            InMemoryConfigStore::with_pairs([("server.catalog", "app.jar"), ("x.y", "z")]),
        );
        run(&mut runner);
        assert_eq!(runner.stdout_text(), "server.catalog=app.jar\nmissing *not found*\n");
    }

    #[test]
    fn test_reset_applies_defaults_and_reports_missing() {
        let opts = ParsedOptions::new().with("modifier", "reset");
        let mut runner = RecordingRunner::new("config").with_opts(opts);
        run(&mut runner);
        assert_eq!(
            runner.config.get("server.deployment").as_deref(),
            Some("deployment.xml")
        );
        assert_eq!(runner.config.get("server.catalog").as_deref(), Some(""));
        let out = runner.stdout_text();
        assert!(out.starts_with("INFO: Clearing configuration settings...\n"));
        assert!(out.contains("The following settings must be configured before proceeding:"));
        assert!(out.contains("   verbkit config set catalog=CATALOG_VALUE"));
    }
}
