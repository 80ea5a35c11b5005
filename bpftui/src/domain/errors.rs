//! Structured error types for bpftui
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Service and startup errors are `Clone` because the view controllers keep
//! them as part of their renderable state.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use super::types::EntityKind;

/// Failure of a listing, lookup or dump call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u32 },

    #[error("{0}")]
    Backend(String),
}

impl ServiceError {
    /// Classify an OS error from a `bpf(2)` call.
    ///
    /// `missing` names the object a `ENOENT` refers to; without it `ENOENT`
    /// is reported as a plain backend failure.
    #[must_use]
    pub fn from_os_error(context: &str, err: &io::Error, missing: Option<(EntityKind, u32)>) -> Self {
        match (err.raw_os_error(), missing) {
            (Some(libc::EPERM | libc::EACCES), _) => {
                ServiceError::PermissionDenied(format!("{context}: {err}"))
            }
            (Some(libc::ENOENT), Some((kind, id))) => ServiceError::NotFound { kind, id },
            _ => ServiceError::Backend(format!("{context}: {err}")),
        }
    }

    /// Classify any error by the first `io::Error` in its source chain.
    #[must_use]
    pub fn from_error_chain(
        context: &str,
        err: &(dyn StdError + 'static),
        missing: Option<(EntityKind, u32)>,
    ) -> Self {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(io_err) = e.downcast_ref::<io::Error>() {
                return Self::from_os_error(context, io_err, missing);
            }
            current = e.source();
        }
        ServiceError::Backend(format!("{context}: {err}"))
    }

    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ServiceError::PermissionDenied(_))
    }
}

/// Failure detected before the first view renders. Always fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error(
        "insufficient permissions: {0}\n\n\
         Reading BPF objects requires root or CAP_BPF + CAP_SYS_ADMIN.\n\
         Run with: sudo bpftui"
    )]
    PermissionDenied(String),

    #[error("environment check failed: {0}")]
    Environment(String),
}

impl StartupError {
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StartupError::PermissionDenied(_))
    }
}

impl From<ServiceError> for StartupError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::PermissionDenied(msg) => StartupError::PermissionDenied(msg),
            other => StartupError::Environment(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Failed to read fixture {path}: {source}")]
    FixtureRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid fixture {path}: {source}")]
    FixtureParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
