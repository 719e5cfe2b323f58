//! Test doubles for exercising verbs without a real runtime.
//!
//! Available under `cfg(test)` and the `test-utils` feature.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::bundles::{Bundle, BundleHooks};
use crate::error::VerbError;
use crate::ports::{
    CallResponse, ConfigStore, ConnectTarget, InMemoryConfigStore, LaunchRequest, PackageRequest,
    ProcessError, ProcessLauncher, Runner,
};
use crate::spec::ParsedOptions;
use crate::verb::{CommandVerb, Verb};

/// Shared, ordered log of lifecycle events.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Records launch requests, optionally failing with an exit code.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    pub requests: Vec<LaunchRequest>,
    pub exit_code: Option<i32>,
}

impl ProcessLauncher for RecordingLauncher {
    fn execute(&mut self, request: &LaunchRequest) -> Result<(), ProcessError> {
        self.requests.push(request.clone());
        match self.exit_code {
            Some(code) if code != 0 => Err(ProcessError::NonZeroExit {
                program: request.target.clone(),
                code,
            }),
            _ => Ok(()),
        }
    }
}

/// A [`Runner`] that records every interaction in public fields.
pub struct RecordingRunner {
    pub verb: String,
    pub opts: ParsedOptions,
    pub args: Vec<String>,
    pub out: Vec<u8>,
    pub err: Vec<u8>,
    pub config: InMemoryConfigStore,
    pub launcher: RecordingLauncher,
    custom_launcher: Option<Box<dyn ProcessLauncher>>,
    pub connected: Option<ConnectTarget>,
    pub connect_retries: Option<u32>,
    pub connect_error: Option<String>,
    pub disconnects: usize,
    pub calls: Vec<(String, Vec<Value>)>,
    pub responses: VecDeque<CallResponse>,
    pub help_requests: Vec<(Vec<String>, bool)>,
    pub packages: Vec<PackageRequest>,
    pub events: EventLog,
}

impl RecordingRunner {
    pub fn new(verb: &str) -> Self {
        Self {
            verb: verb.to_string(),
            opts: ParsedOptions::new(),
            args: Vec::new(),
            out: Vec::new(),
            err: Vec::new(),
            config: InMemoryConfigStore::new(),
            launcher: RecordingLauncher::default(),
            custom_launcher: None,
            connected: None,
            connect_retries: None,
            connect_error: None,
            disconnects: 0,
            calls: Vec::new(),
            responses: VecDeque::new(),
            help_requests: Vec::new(),
            packages: Vec::new(),
            events: EventLog::new(),
        }
    }

    #[must_use]
    pub fn with_opts(mut self, opts: ParsedOptions) -> Self {
        self.opts = opts;
        self
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: InMemoryConfigStore) -> Self {
        self.config = config;
        self
    }

    /// Route launches to `launcher` instead of [`RecordingRunner::launcher`].
    #[must_use]
    pub fn with_launcher(mut self, launcher: Box<dyn ProcessLauncher>) -> Self {
        self.custom_launcher = Some(launcher);
        self
    }

    /// Share an event log with bundles under test.
    #[must_use]
    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    /// Queue the response returned by the next call.
    #[must_use]
    pub fn with_response(mut self, response: CallResponse) -> Self {
        self.responses.push_back(response);
        self
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.err).into_owned()
    }
}

impl Runner for RecordingRunner {
    fn verb_name(&self) -> &str {
        &self.verb
    }

    fn opts(&self) -> &ParsedOptions {
        &self.opts
    }

    fn args(&self) -> &[String] {
        &self.args
    }

    fn stdout(&mut self) -> &mut dyn std::io::Write {
        &mut self.out
    }

    fn stderr(&mut self) -> &mut dyn std::io::Write {
        &mut self.err
    }

    fn config(&mut self) -> &mut dyn ConfigStore {
        &mut self.config
    }

    fn connect(&mut self, target: &ConnectTarget, retries: u32) -> Result<(), VerbError> {
        self.events.push(format!("connect({})", target.address()));
        self.connect_retries = Some(retries);
        if let Some(reason) = &self.connect_error {
            return Err(crate::ports::ConnectionError::Unreachable {
                target: target.address(),
                attempts: retries + 1,
                reason: reason.clone(),
            }
            .into());
        }
        self.connected = Some(target.clone());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    fn disconnect(&mut self) -> Result<(), VerbError> {
        self.events.push("disconnect");
        self.disconnects += 1;
        self.connected = None;
        Ok(())
    }

    fn call(&mut self, procedure: &str, params: &[Value]) -> Result<CallResponse, VerbError> {
        if self.connected.is_none() {
            return Err(crate::ports::ConnectionError::NotConnected.into());
        }
        self.events.push(format!("call({procedure})"));
        self.calls.push((procedure.to_string(), params.to_vec()));
        Ok(self
            .responses
            .pop_front()
            .unwrap_or_else(|| CallResponse::success(Vec::new())))
    }

    fn java(&mut self) -> &mut dyn ProcessLauncher {
        match &mut self.custom_launcher {
            Some(launcher) => launcher.as_mut(),
            None => &mut self.launcher,
        }
    }

    fn help(&mut self, verb_names: &[String], all: bool) -> Result<(), VerbError> {
        self.help_requests.push((verb_names.to_vec(), all));
        Ok(())
    }

    fn package(&mut self, request: &PackageRequest) -> Result<(), VerbError> {
        self.packages.push(request.clone());
        Ok(())
    }
}

/// Bundle that logs each hook it runs as `<hook>(<label>)`.
#[derive(Debug, Clone)]
pub struct RecordingBundle {
    label: String,
    hooks: BundleHooks,
    events: EventLog,
    fail_start: bool,
    fail_stop: bool,
}

impl RecordingBundle {
    /// A bundle implementing every hook.
    pub fn new(label: &str, events: &EventLog) -> Self {
        Self {
            label: label.to_string(),
            hooks: BundleHooks::all(),
            events: events.clone(),
            fail_start: false,
            fail_stop: false,
        }
    }

    #[must_use]
    pub const fn with_hooks(mut self, hooks: BundleHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub const fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    #[must_use]
    pub const fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    fn record(&self, hook: &str) {
        self.events.push(format!("{hook}({})", self.label));
    }
}

impl Bundle for RecordingBundle {
    fn hooks(&self) -> BundleHooks {
        self.hooks
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn initialize(&self, _verb: &mut Verb) {
        self.record("initialize");
    }

    fn start(&self, _verb: &CommandVerb, _runner: &mut dyn Runner) -> Result<(), VerbError> {
        self.record("start");
        if self.fail_start {
            return Err(VerbError::aborted(format!("start({}) failed", self.label), &[]));
        }
        Ok(())
    }

    fn go(&self, _verb: &CommandVerb, _runner: &mut dyn Runner) -> Result<(), VerbError> {
        self.record("go");
        Ok(())
    }

    fn stop(&self, _verb: &CommandVerb, _runner: &mut dyn Runner) -> Result<(), VerbError> {
        self.record("stop");
        if self.fail_stop {
            return Err(VerbError::aborted(format!("stop({}) failed", self.label), &[]));
        }
        Ok(())
    }
}
