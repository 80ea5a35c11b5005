//! Pre-flight checks for bpftui
//!
//! Validates system requirements before the first view is shown.
//! A failure here is fatal: the session opens on the error screen.

#![allow(unsafe_code)] // geteuid() requires unsafe

use std::fs;

use log::{debug, info};

use crate::domain::StartupError;
use crate::services::ProgramService;

/// BPF object enumeration by id (`BPF_*_GET_NEXT_ID`) arrived in 4.13,
/// `bpf_prog_info` with map ids in 4.15
const MIN_KERNEL_VERSION: (u32, u32) = (4, 15);

/// Run all pre-flight checks against the backend the session will use
///
/// # Errors
/// Returns `StartupError::PermissionDenied` when the probe listing is
/// refused and `StartupError::Environment` for anything else that stops
/// the browser from working.
pub fn run_preflight_checks(programs: &dyn ProgramService) -> Result<(), StartupError> {
    check_kernel_version()?;
    check_listing(programs)?;
    Ok(())
}

/// Whether the process runs with an effective uid of root
#[must_use]
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Extract `(major, minor)` from a release string like `6.1.0-arch1-1`
#[must_use]
pub fn parse_kernel_release(release: &str) -> Option<(u32, u32)> {
    let mut parts = release.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor: String = parts.next()?.chars().take_while(char::is_ascii_digit).collect();
    Some((major, minor.parse().ok()?))
}

fn kernel_release() -> Option<String> {
    if let Ok(release) = fs::read_to_string("/proc/sys/kernel/osrelease") {
        return Some(release.trim().to_string());
    }
    // "Linux version 5.15.0-generic ..."
    let version = fs::read_to_string("/proc/version").ok()?;
    version.split_whitespace().nth(2).map(str::to_string)
}

/// Check if the kernel version is sufficient for BPF introspection
fn check_kernel_version() -> Result<(), StartupError> {
    let Some(release) = kernel_release() else {
        debug!("kernel release unknown, skipping version check");
        return Ok(());
    };
    let Some(version) = parse_kernel_release(&release) else {
        // Can't parse, assume it's fine
        return Ok(());
    };

    if version < MIN_KERNEL_VERSION {
        return Err(StartupError::Environment(format!(
            "Kernel version {}.{} is too old.\n\n\
             bpftui requires Linux {}.{} or newer to enumerate BPF objects.\n\
             Current kernel: {release}",
            version.0, version.1, MIN_KERNEL_VERSION.0, MIN_KERNEL_VERSION.1,
        )));
    }
    Ok(())
}

/// Probe permissions by listing programs once
fn check_listing(programs: &dyn ProgramService) -> Result<(), StartupError> {
    match programs.list() {
        Ok(found) => {
            info!("preflight: {} programs visible (root: {})", found.len(), running_as_root());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
