//! Command verbs: a user function wrapped in bundle lifecycle hooks.
//!
//! Executing a [`CommandVerb`] runs, in order:
//!
//! 1. every bundle's `start` hook, in declaration order
//! 2. the verb body, which may call [`VerbContext::go`] to run every
//!    bundle's `go` hook followed by the verb kind's default action
//! 3. the `stop` hook of every bundle whose start phase completed, in
//!    reverse order
//!
//! Step 3 runs whether steps 1 and 2 succeed or fail. A failing `stop`
//! does not prevent the remaining ones from running.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::{RegisteredVerb, Verb, VerbConfig};
use crate::bundles::{Bundle, BundleHooks};
use crate::error::VerbError;
use crate::ports::Runner;
use crate::spec::ParsedOptions;

/// The body of a verb or modifier.
pub type VerbFn = Arc<dyn Fn(&mut VerbContext<'_>) -> Result<(), VerbError> + Send + Sync>;

/// Wrap a closure or function as a [`VerbFn`].
pub fn verb_fn<F>(function: F) -> VerbFn
where
    F: Fn(&mut VerbContext<'_>) -> Result<(), VerbError> + Send + Sync + 'static,
{
    Arc::new(function)
}

/// Action run by [`VerbContext::go`] after the bundle `go` hooks.
pub(crate) type DefaultAction<'a> = &'a dyn Fn(&mut VerbContext<'_>) -> Result<(), VerbError>;

/// What a verb body receives: the verb, the runner, and the default action.
pub struct VerbContext<'a> {
    verb: &'a CommandVerb,
    runner: &'a mut dyn Runner,
    default_action: DefaultAction<'a>,
}

impl<'a> VerbContext<'a> {
    pub(crate) fn new(
        verb: &'a CommandVerb,
        runner: &'a mut dyn Runner,
        default_action: DefaultAction<'a>,
    ) -> Self {
        Self {
            verb,
            runner,
            default_action,
        }
    }

    pub const fn verb(&self) -> &'a CommandVerb {
        self.verb
    }

    pub fn runner(&mut self) -> &mut (dyn Runner + 'a) {
        &mut *self.runner
    }

    pub fn opts(&self) -> &ParsedOptions {
        self.runner.opts()
    }

    pub fn args(&self) -> &[String] {
        self.runner.args()
    }

    /// Run every bundle's `go` hook, then the verb kind's default action.
    pub fn go(&mut self) -> Result<(), VerbError> {
        let verb = self.verb;
        for bundle in verb.bundles() {
            if bundle.hooks().contains(BundleHooks::GO) {
                debug!(verb = %verb.name(), bundle = bundle.name(), "Running bundle go");
                bundle.go(verb, &mut *self.runner)?;
            }
        }
        let action = self.default_action;
        action(self)
    }
}

/// A verb whose body is a user function, surrounded by bundle hooks.
#[derive(Clone)]
pub struct CommandVerb {
    verb: Verb,
    function: VerbFn,
    bundles: Vec<Arc<dyn Bundle>>,
}

impl CommandVerb {
    /// Declare a command verb. Every bundle's `initialize` hook runs here.
    pub fn new(name: &str, function: VerbFn, mut config: VerbConfig) -> Self {
        let mut verb = Verb::from_config(name, &mut config);
        let bundles = std::mem::take(&mut config.bundles);
        for bundle in &bundles {
            if bundle.hooks().contains(BundleHooks::INITIALIZE) {
                debug!(verb = %name, bundle = bundle.name(), "Initializing bundle");
                bundle.initialize(&mut verb);
            } else {
                trace!(verb = %name, bundle = bundle.name(), "Bundle has no initialize hook");
            }
        }
        Self {
            verb,
            function,
            bundles,
        }
    }

    pub fn name(&self) -> &str {
        self.verb.name()
    }

    pub const fn base(&self) -> &Verb {
        &self.verb
    }

    pub fn bundles(&self) -> &[Arc<dyn Bundle>] {
        &self.bundles
    }

    /// Run the full lifecycle with `default_action` behind [`VerbContext::go`].
    pub(crate) fn run(
        &self,
        runner: &mut dyn Runner,
        default_action: DefaultAction<'_>,
    ) -> Result<(), VerbError> {
        let (started, start_result) = self.start_bundles(runner);

        let outcome = match start_result {
            Ok(()) => {
                let mut ctx = VerbContext::new(self, &mut *runner, default_action);
                (self.function)(&mut ctx)
            }
            Err(e) => Err(e),
        };

        let stop_result = self.stop_bundles(started, runner);
        match (outcome, stop_result) {
            (Err(e), Err(stop_error)) => {
                warn!(verb = %self.name(), "Bundle stop failed after verb error: {}", stop_error);
                Err(e)
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    /// Returns how many bundles completed their start phase.
    fn start_bundles(&self, runner: &mut dyn Runner) -> (usize, Result<(), VerbError>) {
        for (index, bundle) in self.bundles.iter().enumerate() {
            if !bundle.hooks().contains(BundleHooks::START) {
                trace!(verb = %self.name(), bundle = bundle.name(), "Bundle has no start hook");
                continue;
            }
            debug!(verb = %self.name(), bundle = bundle.name(), "Starting bundle");
            if let Err(e) = bundle.start(self, &mut *runner) {
                return (index, Err(e));
            }
        }
        (self.bundles.len(), Ok(()))
    }

    /// Stop the first `started` bundles in reverse order, returning the first failure.
    fn stop_bundles(&self, started: usize, runner: &mut dyn Runner) -> Result<(), VerbError> {
        let mut first_error = None;
        for bundle in self.bundles[..started].iter().rev() {
            if !bundle.hooks().contains(BundleHooks::STOP) {
                continue;
            }
            debug!(verb = %self.name(), bundle = bundle.name(), "Stopping bundle");
            if let Err(e) = bundle.stop(self, &mut *runner) {
                if first_error.is_some() {
                    warn!(verb = %self.name(), bundle = bundle.name(), "Bundle stop failed: {}", e);
                } else {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn no_default_action(_ctx: &mut VerbContext<'_>) -> Result<(), VerbError> {
    Ok(())
}

impl fmt::Debug for CommandVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandVerb")
            .field("verb", &self.verb)
            .field(
                "bundles",
                &self.bundles.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl RegisteredVerb for CommandVerb {
    fn verb(&self) -> &Verb {
        &self.verb
    }

    fn verb_mut(&mut self) -> &mut Verb {
        &mut self.verb
    }

    fn kind(&self) -> &'static str {
        "CommandVerb"
    }

    fn function(&self) -> Option<&VerbFn> {
        Some(&self.function)
    }

    fn execute(&self, runner: &mut dyn Runner) -> Result<(), VerbError> {
        self.run(runner, &no_default_action)
    }
}
