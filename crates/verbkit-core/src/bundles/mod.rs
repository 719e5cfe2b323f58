//! Bundles: reusable behavior attached to command verbs.
//!
//! A bundle contributes options and arguments at declaration time and can
//! take part in execution through up to four hooks. Which hooks a bundle
//! implements is declared with [`BundleHooks`]; absent hooks are skipped.
//!
//! | Hook         | When it runs                                         |
//! |--------------|------------------------------------------------------|
//! | `initialize` | once, while the verb is declared                     |
//! | `start`      | before the verb body, in declaration order           |
//! | `go`         | when the body calls [`VerbContext::go`]              |
//! | `stop`       | after the body, in reverse order, even after failure |
//!
//! [`VerbContext::go`]: crate::verb::VerbContext::go

mod connection;
mod help;
mod java;
mod package;
mod server;

use bitflags::bitflags;

pub use connection::{
    ClientBundle, ConnectionBundle, DEFAULT_ADMIN_PORT, DEFAULT_CLIENT_PORT,
    DEFAULT_CONNECT_RETRIES,
};
pub use help::HelpBundle;
pub use java::JavaBundle;
pub use package::PackageBundle;
pub use server::{DEFAULT_SERVER_CLASS, ServerBundle};

use crate::error::VerbError;
use crate::ports::Runner;
use crate::verb::{CommandVerb, Verb};

bitflags! {
    /// Lifecycle hooks a bundle implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BundleHooks: u8 {
        const INITIALIZE = 0b0001;
        const START      = 0b0010;
        const GO         = 0b0100;
        const STOP       = 0b1000;
    }
}

/// Reusable behavior attached to one or more command verbs.
///
/// Bundles are shared between verbs and executions, so hooks take `&self`.
pub trait Bundle: Send + Sync {
    /// Hooks this bundle implements. Only these are ever called.
    fn hooks(&self) -> BundleHooks;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Contribute options, arguments and attribute defaults to `verb`.
    fn initialize(&self, _verb: &mut Verb) {}

    fn start(&self, _verb: &CommandVerb, _runner: &mut dyn Runner) -> Result<(), VerbError> {
        Ok(())
    }

    fn go(&self, _verb: &CommandVerb, _runner: &mut dyn Runner) -> Result<(), VerbError> {
        Ok(())
    }

    fn stop(&self, _verb: &CommandVerb, _runner: &mut dyn Runner) -> Result<(), VerbError> {
        Ok(())
    }
}
