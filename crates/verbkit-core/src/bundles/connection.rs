//! Connection options and the client connection lifecycle.

use tracing::debug;

use super::{Bundle, BundleHooks};
use crate::error::VerbError;
use crate::ports::{ConnectTarget, Runner};
use crate::spec::CliOption;
use crate::verb::{CommandVerb, Verb};

/// Port used by client connections.
pub const DEFAULT_CLIENT_PORT: u16 = 21212;

/// Port used by administrative connections.
pub const DEFAULT_ADMIN_PORT: u16 = 21211;

/// Retries after the first failed connection attempt.
pub const DEFAULT_CONNECT_RETRIES: u32 = 5;

/// Adds host, user and password options.
#[derive(Debug, Clone)]
pub struct ConnectionBundle {
    default_port: Option<u16>,
    min_count: usize,
    max_count: usize,
}

impl ConnectionBundle {
    pub const fn new(default_port: Option<u16>, min_count: usize, max_count: usize) -> Self {
        Self {
            default_port,
            min_count,
            max_count,
        }
    }

    pub const fn default_port(&self) -> Option<u16> {
        self.default_port
    }
}

impl Default for ConnectionBundle {
    fn default() -> Self {
        Self::new(None, 1, 1)
    }
}

impl Bundle for ConnectionBundle {
    fn hooks(&self) -> BundleHooks {
        BundleHooks::INITIALIZE
    }

    fn initialize(&self, verb: &mut Verb) {
        verb.add_options([
            CliOption::host(
                Some('H'),
                Some("--host"),
                "host",
                "HOST[:PORT] (default HOST=localhost)",
                self.min_count,
                self.max_count,
                self.default_port,
            )
            .with_default("localhost"),
            CliOption::string(Some('p'), Some("--password"), "password", "password (default: none)"),
            CliOption::string(Some('u'), Some("--user"), "username", "username (default: none)"),
        ]);
    }
}

/// Opens a service connection before the verb body and closes it afterwards.
#[derive(Debug, Clone)]
pub struct ClientBundle {
    connection: ConnectionBundle,
    retries: u32,
}

impl ClientBundle {
    pub const fn new(default_port: u16) -> Self {
        Self {
            connection: ConnectionBundle::new(Some(default_port), 1, 1),
            retries: DEFAULT_CONNECT_RETRIES,
        }
    }

    /// Client connection on [`DEFAULT_CLIENT_PORT`].
    pub const fn client() -> Self {
        Self::new(DEFAULT_CLIENT_PORT)
    }

    /// Administrative connection on [`DEFAULT_ADMIN_PORT`].
    pub const fn admin() -> Self {
        Self::new(DEFAULT_ADMIN_PORT)
    }

    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub const fn retries(&self) -> u32 {
        self.retries
    }

    fn target(&self, runner: &dyn Runner) -> Result<ConnectTarget, VerbError> {
        let opts = runner.opts();
        let Some(host) = opts.host("host") else {
            return Err(runner.abort("A host is required to connect.", &[]));
        };
        let Some(port) = host.port.or(self.connection.default_port()) else {
            return Err(runner.abort(&format!("No port was given for host \"{}\".", host.host), &[]));
        };
        Ok(ConnectTarget::new(host.host.clone(), port)
            .with_credentials(opts.string("username"), opts.string("password")))
    }
}

impl Bundle for ClientBundle {
    fn hooks(&self) -> BundleHooks {
        BundleHooks::INITIALIZE | BundleHooks::START | BundleHooks::STOP
    }

    fn initialize(&self, verb: &mut Verb) {
        self.connection.initialize(verb);
    }

    fn start(&self, _verb: &CommandVerb, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let target = self.target(runner)?;
        debug!(address = %target.address(), retries = self.retries, "Connecting");
        runner.connect(&target, self.retries)
    }

    fn stop(&self, _verb: &CommandVerb, runner: &mut dyn Runner) -> Result<(), VerbError> {
        if runner.is_connected() {
            runner.disconnect()
        } else {
            Ok(())
        }
    }
}
