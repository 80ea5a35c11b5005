//! # bpftui - Main Entry Point
//!
//! Supports two data sources:
//! - **Kernel** (default): live programs and maps, needs root or CAP_BPF
//! - **Fixture** (`--demo` or `--fixture FILE`): a JSON dataset, no privileges
//!
//! The startup probe runs before the first frame; its failure is shown
//! inside the TUI rather than printed, so the user sees it in context.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use bpftui::cli::Args;
use bpftui::domain::{ServiceError, StartupError};
use bpftui::preflight::run_preflight_checks;
use bpftui::services::{FixtureService, KernelService};
use bpftui::tui::{self, Session};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOPERM: i32 = 77;

fn main() {
    std::process::exit(match run() {
        Ok(code) => code,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let denied = err.chain().any(|cause| {
        cause.downcast_ref::<StartupError>().is_some_and(StartupError::is_permission_denied)
            || matches!(cause.downcast_ref::<ServiceError>(), Some(ServiceError::PermissionDenied(_)))
    });
    if denied {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}

/// Build the session for the requested data source
fn build_session(args: &Args) -> Result<Session> {
    if let Some(ref path) = args.fixture {
        let service = FixtureService::from_file(path)
            .with_context(|| format!("Failed to load fixture {}", path.display()))?;
        let label = path.file_name().map_or_else(
            || "fixture".to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        return Ok(Session::new(Box::new(service.clone()), Box::new(service)).with_source(label));
    }

    if args.demo {
        let service = FixtureService::demo();
        return Ok(Session::new(Box::new(service.clone()), Box::new(service)).with_source("demo"));
    }

    let kernel = KernelService::new();
    let mut session = Session::new(Box::new(kernel), Box::new(kernel));
    if !args.skip_preflight {
        session.startup(run_preflight_checks(&kernel));
    }
    Ok(session)
}

fn run() -> Result<i32> {
    let args = Args::parse();
    bpftui::logging::init(args.log_file.as_deref())?;

    info!("bpftui v{} starting", env!("CARGO_PKG_VERSION"));

    let session = build_session(&args)?;
    let session = tui::run(session, Duration::from_millis(args.tick_ms))
        .context("Terminal UI failed")?;

    // A fatal startup error was already shown on screen; only the code is left
    match session.fatal() {
        Some(e) if e.is_permission_denied() => Ok(EXIT_NOPERM),
        Some(_) => Ok(EXIT_ERROR),
        None => Ok(EXIT_SUCCESS),
    }
}
