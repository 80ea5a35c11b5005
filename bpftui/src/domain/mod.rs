//! Domain model for bpftui
//!
//! This module contains the records the browser displays and the errors
//! that can surface while fetching them:
//! - Compile-time separation of program and map ids via newtypes
//! - Lossless hex rendering for raw map bytes
//! - Structured error handling

pub mod errors;
pub mod hex;
pub mod types;

// Re-export common types for convenience
pub use types::{EntityKind, MapEntry, MapId, MapInfo, ProgId, ProgramInfo};

pub use errors::{ServiceError, StartupError, TuiError};
pub use hex::{format_hex, parse_hex, EMPTY_MARKER};
