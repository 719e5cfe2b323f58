//! Java subprocess launcher.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};
use verbkit_core::ports::{LaunchRequest, ProcessError, ProcessLauncher};

/// JVM flags used when a verb does not override them.
pub const DEFAULT_JAVA_OPTS: [&str; 2] = ["-Xmx2048m", "-XX:+HeapDumpOnOutOfMemoryError"];

/// Builder for a `java` command line.
///
/// Arguments are assembled in this order:
/// 1. JVM flags
/// 2. remote debugger agent, if a port is set
/// 3. `-classpath`, if set
/// 4. main class
/// 5. program arguments
#[derive(Debug, Clone)]
pub struct JavaCommandBuilder {
    java: PathBuf,
    jvm_opts: Vec<String>,
    debug_port: Option<u16>,
    classpath: Option<String>,
    main_class: String,
    args: Vec<String>,
}

impl JavaCommandBuilder {
    pub fn new(java: impl Into<PathBuf>, main_class: impl Into<String>) -> Self {
        Self {
            java: java.into(),
            jvm_opts: Vec::new(),
            debug_port: None,
            classpath: None,
            main_class: main_class.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn jvm_opts<I, S>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.jvm_opts.extend(opts.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn debug_port(mut self, port: Option<u16>) -> Self {
        self.debug_port = port;
        self
    }

    #[must_use]
    pub fn classpath(mut self, classpath: Option<&str>) -> Self {
        self.classpath = classpath.map(str::to_string);
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> String {
        self.java.display().to_string()
    }

    /// Arguments following the program name.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = self.jvm_opts.clone();
        if let Some(port) = self.debug_port {
            args.push(format!(
                "-agentlib:jdwp=transport=dt_socket,server=y,suspend=n,address={port}"
            ));
        }
        if let Some(classpath) = &self.classpath {
            args.push("-classpath".to_string());
            args.push(classpath.clone());
        }
        args.push(self.main_class.clone());
        args.extend(self.args.iter().cloned());
        args
    }

    /// The full command line as display text.
    pub fn display(&self) -> String {
        std::iter::once(self.program())
            .chain(self.arguments())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn build(&self) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.args(self.arguments());
        cmd
    }
}

/// Runs Java classes in a child process and waits for them to exit.
pub struct JavaLauncher {
    java: PathBuf,
    default_opts: Vec<String>,
    echo: Box<dyn Write + Send>,
}

impl JavaLauncher {
    pub fn new(java: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            default_opts: DEFAULT_JAVA_OPTS.iter().map(ToString::to_string).collect(),
            echo: Box::new(io::stdout()),
        }
    }

    /// Use `$JAVA_HOME/bin/java` when `JAVA_HOME` is set, else `java` from `PATH`.
    pub fn from_env() -> Self {
        let java = std::env::var_os("JAVA_HOME")
            .filter(|home| !home.is_empty())
            .map_or_else(|| PathBuf::from("java"), |home| PathBuf::from(home).join("bin").join("java"));
        debug!(java = %java.display(), "Resolved Java executable");
        Self::new(java)
    }

    /// JVM flags used when a request carries no override.
    #[must_use]
    pub fn with_default_opts<I, S>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_opts = opts.into_iter().map(Into::into).collect();
        self
    }

    /// Where dry-run command lines are printed.
    #[must_use]
    pub fn with_echo(mut self, echo: Box<dyn Write + Send>) -> Self {
        self.echo = echo;
        self
    }

    pub fn command(&self, request: &LaunchRequest) -> JavaCommandBuilder {
        let opts = if request.opts_override.is_empty() {
            &self.default_opts
        } else {
            &request.opts_override
        };
        JavaCommandBuilder::new(&self.java, &request.target)
            .jvm_opts(opts.iter().cloned())
            .debug_port(request.debug_port)
            .classpath(request.classpath.as_deref())
            .args(request.args.iter().cloned())
    }
}

impl ProcessLauncher for JavaLauncher {
    fn execute(&mut self, request: &LaunchRequest) -> Result<(), ProcessError> {
        let builder = self.command(request);
        let program = builder.program();
        if request.dry_run {
            return writeln!(self.echo, "{}", builder.display()).map_err(|e| {
                ProcessError::StartFailed {
                    program,
                    reason: e.to_string(),
                }
            });
        }

        info!(command = %builder.display(), "Launching Java process");
        let status = builder
            .build()
            .status()
            .map_err(|e| ProcessError::StartFailed {
                program: program.clone(),
                reason: e.to_string(),
            })?;
        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(ProcessError::NonZeroExit { program, code }),
            None => Err(ProcessError::Terminated(program)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn request() -> LaunchRequest {
        LaunchRequest {
            target: "org.voltdb.VoltDB".to_string(),
            classpath: Some("a.jar:b.jar".to_string()),
            debug_port: Some(8000),
            args: vec!["create".to_string()],
            ..LaunchRequest::default()
        }
    }

    #[test]
    fn test_command_line_order() {
        let launcher = JavaLauncher::new("/opt/jdk/bin/java");
        assert_eq!(
            launcher.command(&request()).display(),
            "/opt/jdk/bin/java -Xmx2048m -XX:+HeapDumpOnOutOfMemoryError \
             -agentlib:jdwp=transport=dt_socket,server=y,suspend=n,address=8000 \
             -classpath a.jar:b.jar org.voltdb.VoltDB create"
        );
    }

    #[test]
    fn test_override_replaces_default_opts() {
        let launcher = JavaLauncher::new("java");
        let request = LaunchRequest {
            opts_override: vec!["-server".to_string()],
            ..LaunchRequest::new("Main")
        };
        assert_eq!(launcher.command(&request).arguments(), ["-server", "Main"]);
    }

    #[test]
    fn test_dry_run_prints_instead_of_running() {
        let buffer = SharedBuffer::default();
        let mut launcher = JavaLauncher::new("/nonexistent/java").with_echo(Box::new(buffer.clone()));
        let request = LaunchRequest {
            dry_run: true,
            ..request()
        };
        launcher.execute(&request).unwrap();
        let printed = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(printed.starts_with("/nonexistent/java "));
        assert!(printed.ends_with("org.voltdb.VoltDB create\n"));
    }

    #[test]
    fn test_missing_executable_fails_to_start() {
        let mut launcher = JavaLauncher::new("/nonexistent/java");
        let err = launcher.execute(&LaunchRequest::new("Main")).unwrap_err();
        assert!(matches!(err, ProcessError::StartFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_reported() {
        // `sh -c "exit 3"`: the shell stands in for the JVM.
        let mut launcher = JavaLauncher::new("sh").with_default_opts(Vec::<String>::new());
        let request = LaunchRequest::new("-c").with_args(vec!["exit 3".to_string()]);
        let err = launcher.execute(&request).unwrap_err();
        assert!(matches!(err, ProcessError::NonZeroExit { code: 3, .. }));
    }
}
