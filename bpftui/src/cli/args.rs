//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bpftui",
    about = "Browse loaded BPF programs and maps in the terminal",
    after_help = "\
EXAMPLES:
    sudo bpftui                              Browse the running kernel
    bpftui --demo                            Browse a built-in sample dataset
    bpftui --fixture snapshot.json           Browse a saved JSON dataset
    sudo bpftui --log-file /tmp/bpftui.log   Keep a log while browsing"
)]
pub struct Args {
    /// Use the built-in sample dataset instead of the kernel
    #[arg(long, conflicts_with = "fixture")]
    pub demo: bool,

    /// Load programs, maps and dumps from a JSON file instead of the kernel
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// Append log records to this file (filter with RUST_LOG, default info)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Skip the kernel version and permission probe at startup
    #[arg(long)]
    pub skip_preflight: bool,

    /// Input poll interval in milliseconds
    #[arg(long, value_name = "MS", default_value = "250")]
    pub tick_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["bpftui"]);
        assert!(!args.demo);
        assert!(args.fixture.is_none());
        assert_eq!(args.tick_ms, 250);
        assert!(!args.skip_preflight);
    }

    #[test]
    fn test_fixture_path() {
        let args = Args::parse_from(["bpftui", "--fixture", "maps.json"]);
        assert_eq!(args.fixture, Some(PathBuf::from("maps.json")));
    }

    #[test]
    fn test_demo_conflicts_with_fixture() {
        assert!(Args::try_parse_from(["bpftui", "--demo", "--fixture", "x.json"]).is_err());
    }
}
