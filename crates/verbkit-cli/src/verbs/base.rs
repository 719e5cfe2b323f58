use verbkit_core::{DeclarationError, HelpBundle, PackageBundle, VerbConfig, VerbRegistry};

pub fn declare(registry: &mut VerbRegistry) -> Result<(), DeclarationError> {
    registry.command("help", |ctx| ctx.go(), VerbConfig::new().bundle(HelpBundle))?;
    registry.command("package", |ctx| ctx.go(), VerbConfig::new().bundle(PackageBundle))?;
    Ok(())
}
