//! End-to-end execution of registered verbs through `VerbRunner`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tempfile::tempdir;
use verbkit_core::ports::{
    CallResponse, ConnectTarget, ConnectionError, HelpProvider, LaunchRequest, PackageRequest,
    Packager, ProcessError, ProcessLauncher, ServiceClient, ServiceConnector,
};
use verbkit_core::spec::{HostAddress, Invocation, OptionValue, ParsedOptions};
use verbkit_core::{ClientBundle, ConfigStore, Verb, VerbConfig, VerbError, VerbRegistry};
use verbkit_runtime::{FileConfigStore, RunnerDeps, VerbRunner};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

type Log = Arc<Mutex<Vec<String>>>;

struct StubConnector {
    log: Log,
    status: i32,
}

struct StubClient {
    log: Log,
    status: i32,
}

impl ServiceConnector for StubConnector {
    fn connect(
        &self,
        target: &ConnectTarget,
        retries: u32,
    ) -> Result<Box<dyn ServiceClient>, ConnectionError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("connect {} retries={retries}", target.address()));
        Ok(Box::new(StubClient {
            log: Arc::clone(&self.log),
            status: self.status,
        }))
    }
}

impl ServiceClient for StubClient {
    fn call(&mut self, procedure: &str, params: &[Value]) -> Result<CallResponse, ConnectionError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("call {procedure} {}", Value::from(params.to_vec())));
        Ok(CallResponse {
            status: self.status,
            status_string: (self.status != CallResponse::SUCCESS)
                .then(|| "paused already".to_string()),
            results: Vec::new(),
        })
    }

    fn close(&mut self) -> Result<(), ConnectionError> {
        self.log.lock().unwrap().push("close".to_string());
        Ok(())
    }
}

struct NoLaunch;

impl ProcessLauncher for NoLaunch {
    fn execute(&mut self, request: &LaunchRequest) -> Result<(), ProcessError> {
        Err(ProcessError::StartFailed {
            program: request.target.clone(),
            reason: "launching is disabled in this test".to_string(),
        })
    }
}

struct StaticHelp;

impl HelpProvider for StaticHelp {
    fn render(&self, verb_names: &[String], all: bool) -> Result<String, VerbError> {
        Ok(format!("help for {verb_names:?} all={all}\n"))
    }
}

struct NoPackages;

impl Packager for NoPackages {
    fn package(&mut self, _request: &PackageRequest) -> Result<Vec<PathBuf>, VerbError> {
        Ok(vec![PathBuf::from("pkg/verbkit")])
    }
}

struct Harness {
    log: Log,
    out: SharedBuffer,
    err: SharedBuffer,
    config_path: PathBuf,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        Self {
            log: Log::default(),
            out: SharedBuffer::default(),
            err: SharedBuffer::default(),
            config_path: dir.path().join("verbkit.cfg"),
            _dir: dir,
        }
    }

    fn runner(&self, invocation: Invocation, status: i32) -> VerbRunner {
        VerbRunner::new(
            invocation,
            RunnerDeps {
                config: Box::new(FileConfigStore::open(&self.config_path).unwrap()),
                connector: Box::new(StubConnector {
                    log: Arc::clone(&self.log),
                    status,
                }),
                launcher: Box::new(NoLaunch),
                help: Box::new(StaticHelp),
                packager: Box::new(NoPackages),
                stdout: Box::new(self.out.clone()),
                stderr: Box::new(self.err.clone()),
            },
        )
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

fn admin_registry() -> VerbRegistry {
    let mut registry = VerbRegistry::new();
    registry
        .command(
            "pause",
            |ctx| {
                ctx.runner().call_procedure("@Pause", &[json!(1)], true)?;
                ctx.runner().info("The cluster is paused.", &[]);
                Ok(())
            },
            VerbConfig::new()
                .description("Pause the cluster.")
                .bundle(ClientBundle::admin().with_retries(2)),
        )
        .unwrap();
    registry
}

fn host_opts() -> ParsedOptions {
    ParsedOptions::new().with(
        "host",
        OptionValue::Hosts(vec![HostAddress::new("db1", None)]),
    )
}

#[test]
fn client_bundle_connects_calls_and_disconnects() {
    let harness = Harness::new();
    let registry = admin_registry();
    let runner = harness.runner(Invocation::new("pause", host_opts()), CallResponse::SUCCESS);
    runner.run(registry.get("pause").unwrap()).unwrap();

    assert_eq!(
        harness.log(),
        ["connect db1:21211 retries=2", "call @Pause [1]", "close"]
    );
    assert_eq!(harness.out.text(), "INFO: The cluster is paused.\n");
}

#[test]
fn failed_status_aborts_and_still_disconnects() {
    let harness = Harness::new();
    let registry = admin_registry();
    let runner = harness.runner(Invocation::new("pause", host_opts()), -2);
    let err = runner.run(registry.get("pause").unwrap()).unwrap_err();

    assert_eq!(err.to_string(), "\"@Pause\" call failed: paused already");
    assert_eq!(harness.log().last().map(String::as_str), Some("close"));
    assert!(harness.out.text().is_empty());
}

#[test]
fn verb_writes_through_file_config_store() {
    let harness = Harness::new();
    let mut registry = VerbRegistry::new();
    registry
        .command(
            "remember",
            |ctx| {
                let value = ctx.opts().string("value").unwrap_or_default().to_string();
                ctx.runner().config().set("app.value", &value)?;
                Ok(())
            },
            VerbConfig::new(),
        )
        .unwrap();

    let opts = ParsedOptions::new().with("value", "42");
    let runner = harness.runner(Invocation::new("remember", opts), CallResponse::SUCCESS);
    runner.run(registry.get("remember").unwrap()).unwrap();

    let store = FileConfigStore::open(&harness.config_path).unwrap();
    assert_eq!(store.get("app.value").as_deref(), Some("42"));
}

#[test]
fn help_and_package_requests_reach_adapters() {
    let harness = Harness::new();
    let mut registry = VerbRegistry::new();
    registry
        .command(
            "info",
            |ctx| {
                ctx.runner().help(&["pause".to_string()], true)?;
                ctx.runner().package(&PackageRequest::default())
            },
            VerbConfig::new(),
        )
        .unwrap();

    let runner = harness.runner(Invocation::new("info", ParsedOptions::new()), CallResponse::SUCCESS);
    runner.run(registry.get("info").unwrap()).unwrap();
    assert_eq!(
        harness.out.text(),
        "help for [\"pause\"] all=true\nINFO: Created \"pkg/verbkit\".\n"
    );
}

#[test]
fn unimplemented_verb_kind_reports_error() {
    let harness = Harness::new();
    let mut registry = VerbRegistry::new();
    registry.add(Box::new(Verb::new("bare"))).unwrap();
    let runner = harness.runner(Invocation::new("bare", ParsedOptions::new()), CallResponse::SUCCESS);
    let err = runner.run(registry.get("bare").unwrap()).unwrap_err();
    assert!(matches!(err, VerbError::Unimplemented { kind: "Verb", .. }));
    assert!(harness.err.text().is_empty());
}
