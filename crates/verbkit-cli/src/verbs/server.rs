use verbkit_core::{DeclarationError, ServerBundle, VerbConfig, VerbRegistry};

pub fn declare(registry: &mut VerbRegistry) -> Result<(), DeclarationError> {
    registry.command(
        "create",
        |ctx| ctx.go(),
        VerbConfig::new()
            .description("Start a new, empty database.")
            .bundle(ServerBundle::new("create")),
    )?;
    registry.command(
        "recover",
        |ctx| ctx.go(),
        VerbConfig::new()
            .description("Start the database and recover the previous state.")
            .bundle(ServerBundle::new("recover")),
    )?;
    Ok(())
}
