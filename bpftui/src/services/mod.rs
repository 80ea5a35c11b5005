//! Data-access collaborators for the browser
//!
//! The navigation controller only talks to these traits. Every call is
//! blocking from its point of view and either returns a result or a
//! [`ServiceError`] before control goes back to the event loop.
//!
//! - [`kernel`]: live backend reading the running kernel through aya and `bpf(2)`
//! - [`fixture`]: in-memory dataset for demo mode and tests

pub mod cpus;
pub mod fixture;
pub mod kernel;
mod map_iter;

use crate::domain::{MapEntry, MapId, MapInfo, ProgId, ProgramInfo, ServiceError};

pub use fixture::{FixtureData, FixtureOp, FixtureService};
pub use kernel::KernelService;

/// Listing service for loaded programs
pub trait ProgramService {
    /// All loaded programs, in kernel id order.
    ///
    /// # Errors
    /// Returns an error if the kernel refuses the listing.
    fn list(&self) -> Result<Vec<ProgramInfo>, ServiceError>;

    /// A single program by id.
    ///
    /// # Errors
    /// Returns [`ServiceError::NotFound`] when no program has this id.
    fn get(&self, id: ProgId) -> Result<ProgramInfo, ServiceError>;
}

/// Listing and dump service for loaded maps
pub trait MapService {
    /// All loaded maps, in kernel id order.
    ///
    /// # Errors
    /// Returns an error if the kernel refuses the listing.
    fn list(&self) -> Result<Vec<MapInfo>, ServiceError>;

    /// A single map by id.
    ///
    /// # Errors
    /// Returns [`ServiceError::NotFound`] when no map has this id.
    fn get(&self, id: MapId) -> Result<MapInfo, ServiceError>;

    /// Every key/value pair of a map, in iteration order.
    ///
    /// # Errors
    /// Returns an error if the map is gone or cannot be iterated.
    fn dump(&self, id: MapId) -> Result<Vec<MapEntry>, ServiceError>;
}
