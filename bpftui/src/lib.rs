//! # bpftui - Terminal Browser for BPF Programs and Maps
//!
//! Lists the BPF programs and maps loaded in the running kernel, shows
//! their metadata, follows a program to the maps it uses and dumps map
//! contents as hex.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐  keys   ┌──────────────────────────────────────────┐
//! │   Terminal   │────────▶│  Session (navigation state machine)      │
//! │  (crossterm) │◀────────│   menu › lists › details › dump          │
//! └──────────────┘  frame  └──────────────────────────────────────────┘
//!                                   │ list / get / dump
//!                                   ▼
//!                  ┌──────────────────────────────────┐
//!                  │  ProgramService / MapService     │
//!                  │   kernel (aya + bpf(2))          │
//!                  │   fixture (JSON / demo data)     │
//!                  └──────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`tui`]: navigation controller, per-view panels, rendering, terminal driver
//! - [`services`]: data-access traits and their kernel and fixture backends
//! - [`domain`]: records, id newtypes, hex rendering, error types
//! - [`preflight`]: kernel version and permission probe run before the first frame
//! - [`logging`]: `env_logger` setup that keeps records off the TUI's screen
//! - [`cli`]: command-line arguments
//!
//! ## Typical Usage
//!
//! ```bash
//! # Browse the running kernel
//! sudo bpftui
//!
//! # Try the interface without privileges
//! bpftui --demo
//! ```

pub mod cli;
pub mod domain;
pub mod logging;
pub mod preflight;
pub mod services;
pub mod tui;
