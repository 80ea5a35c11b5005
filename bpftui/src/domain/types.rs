//! Domain records for loaded BPF objects
//!
//! Newtype ids keep program and map identifiers apart in signatures: a
//! program's associated maps are `MapId`s, and nothing accepts a bare `u32`
//! where the kind of object matters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::hex;

/// Kernel id of a loaded BPF program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgId(pub u32);

impl fmt::Display for ProgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kernel id of a loaded BPF map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub u32);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which kind of object an id refers to (used in not-found errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Program,
    Map,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Program => write!(f, "program"),
            EntityKind::Map => write!(f, "map"),
        }
    }
}

/// A loaded BPF program as reported by the kernel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramInfo {
    pub id: ProgId,
    #[serde(rename = "type")]
    pub prog_type: String,
    pub name: String,
    /// Program tag, 16 lowercase hex digits
    pub tag: String,
    pub gpl: bool,
    /// Local load time as `YYYY-MM-DD HH:MM:SS`, empty when unknown
    pub loaded_at: String,
    /// Creator uid, `None` when the kernel does not report it
    pub uid: Option<u32>,
    pub bytes_xlated: u32,
    pub bytes_jited: u32,
    pub memlock: u32,
    pub map_ids: Vec<MapId>,
}

/// A loaded BPF map as reported by the kernel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapInfo {
    pub id: MapId,
    #[serde(rename = "type")]
    pub map_type: String,
    pub name: String,
    pub key_size: u32,
    pub value_size: u32,
    pub max_entries: u32,
    pub flags: u32,
    pub memlock: u32,
    /// The kernel reports neither load time nor creator for maps
    pub loaded_at: String,
    pub uid: Option<u32>,
}

/// One key/value pair read out of a map, in the order the kernel returned it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    #[serde(with = "hex::as_text")]
    pub key: Vec<u8>,
    #[serde(with = "hex::as_text")]
    pub value: Vec<u8>,
}

impl MapEntry {
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}
