//! CPU utility functions
//!
//! Per-CPU maps return one value slot per possible CPU on lookup, so the
//! dump buffer has to be sized from `/sys/devices/system/cpu/possible`
//! rather than from the online set.

use std::fs;
use std::io;

const POSSIBLE_CPUS: &str = "/sys/devices/system/cpu/possible";

/// Parse a sysfs CPU list like `"0-3"` or `"0-3,8-11"` or `"5"`
///
/// # Errors
/// Returns an error if a range bound is not a number.
pub fn parse_cpu_list(content: &str) -> Result<Vec<u32>, std::num::ParseIntError> {
    let mut cpus = Vec::new();

    for range in content.trim().split(',').filter(|r| !r.is_empty()) {
        if let Some((start, end)) = range.split_once('-') {
            let start: u32 = start.parse()?;
            let end: u32 = end.parse()?;
            cpus.extend(start..=end);
        } else {
            cpus.push(range.parse()?);
        }
    }

    Ok(cpus)
}

/// Number of possible CPUs, as the kernel sizes per-CPU map values
///
/// # Errors
/// Returns an error if sysfs cannot be read or parsed.
pub fn possible_cpu_count() -> io::Result<usize> {
    let content = fs::read_to_string(POSSIBLE_CPUS)?;
    let cpus = parse_cpu_list(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{POSSIBLE_CPUS}: {e}")))?;
    Ok(cpus.len().max(1))
}
