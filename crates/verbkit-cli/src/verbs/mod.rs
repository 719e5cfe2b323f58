//! Stock verb declarations.
//!
//! | Verb       | Kind        | Bundles                 |
//! |------------|-------------|-------------------------|
//! | `help`     | command     | `HelpBundle`            |
//! | `package`  | command     | `PackageBundle`         |
//! | `config`   | multi       | none                    |
//! | `create`   | command     | `ServerBundle`          |
//! | `recover`  | command     | `ServerBundle`          |
//! | `pause`    | command     | `ClientBundle::admin()` |
//! | `resume`   | command     | `ClientBundle::admin()` |
//! | `shutdown` | command     | `ClientBundle::admin()` |

mod admin;
mod base;
pub mod config;
mod server;

use std::sync::Arc;

use verbkit_core::{DeclarationError, VerbRegistry, VerbSpace};

/// Register every stock verb.
pub fn declare(registry: &mut VerbRegistry, space: &VerbSpace) -> Result<(), DeclarationError> {
    base::declare(registry)?;
    config::declare(registry, Arc::new(config::tool(&space.name)))?;
    server::declare(registry)?;
    admin::declare(registry)
}
