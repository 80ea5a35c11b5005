//! Command-line interface for bpftui

pub mod args;

pub use args::Args;
