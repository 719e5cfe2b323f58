//! CLI entry point.

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use tracing::debug;
use tracing_subscriber::EnvFilter;
use verbkit_cli::{CliConfig, Streams, bootstrap};

/// Whether `-v`/`--verbose` appears before any `--` separator.
///
/// Checked ahead of parsing so that logging covers bootstrap as well.
fn verbose_requested(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|arg| *arg != "--")
        .any(|arg| arg == "-v" || arg == "--verbose")
}

fn init_tracing(verbose: bool) {
    // Priority: -v > RUST_LOG > default (warn)
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args: Vec<OsString> = std::env::args_os().collect();
    init_tracing(verbose_requested(&args));

    let config = match CliConfig::with_defaults() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            return ExitCode::from(78);
        }
    };

    match bootstrap(config).and_then(|mut ctx| ctx.run(args, Streams::std())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(e) = err.report(&mut io::stderr()) {
                debug!("Failed to report error: {}", e);
            }
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
