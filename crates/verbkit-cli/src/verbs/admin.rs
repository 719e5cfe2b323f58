//! Cluster administration verbs.
//!
//! Each one connects to the admin port, invokes a system procedure, and
//! reports the outcome.

use tracing::debug;
use verbkit_core::{ClientBundle, DeclarationError, VerbConfig, VerbContext, VerbError, VerbRegistry};

fn admin_call(ctx: &mut VerbContext<'_>, procedure: &str, done: &str) -> Result<(), VerbError> {
    ctx.runner().call_procedure(procedure, &[], true)?;
    ctx.runner().info(done, &[]);
    Ok(())
}

pub fn declare(registry: &mut VerbRegistry) -> Result<(), DeclarationError> {
    registry.command(
        "pause",
        |ctx| admin_call(ctx, "@Pause", "The cluster is paused."),
        VerbConfig::new()
            .description("Pause the cluster and restrict access to the admin port.")
            .bundle(ClientBundle::admin()),
    )?;
    registry.command(
        "resume",
        |ctx| admin_call(ctx, "@Resume", "The cluster has resumed."),
        VerbConfig::new()
            .description("Return the cluster to normal operation.")
            .bundle(ClientBundle::admin()),
    )?;
    registry.command(
        "shutdown",
        |ctx| {
            // The cluster drops the connection as it goes down.
            match ctx.runner().call_procedure("@Shutdown", &[], true) {
                Ok(_) => {}
                Err(VerbError::Connection(e)) => debug!("Connection ended during shutdown: {}", e),
                Err(e) => return Err(e),
            }
            ctx.runner().info("The cluster is shutting down.", &[]);
            Ok(())
        },
        VerbConfig::new()
            .description("Shut down the running cluster.")
            .bundle(ClientBundle::admin()),
    )?;
    Ok(())
}
