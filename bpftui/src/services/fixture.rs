//! In-memory dataset backend
//!
//! Serves programs, maps and dumps from a [`FixtureData`] value: the
//! built-in demo set (`--demo`), a JSON file (`--fixture`), or one built by
//! hand in tests. Any operation can be made to fail with a chosen
//! [`ServiceError`] to exercise error paths.
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "programs": [{ "id": 12, "type": "xdp", "name": "xdp_firewall", "map_ids": [21] }],
//!   "maps": [{ "id": 21, "type": "hash", "name": "blocklist", "key_size": 4, "value_size": 1 }],
//!   "dumps": [{ "map": 21, "entries": [{ "key": "0a 00 00 01", "value": "01" }] }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{MapService, ProgramService};
use crate::domain::{
    EntityKind, MapEntry, MapId, MapInfo, ProgId, ProgramInfo, ServiceError, TuiError,
};

/// Stored contents of one map, or the error reading it produces
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDump {
    pub map: MapId,
    pub entries: Vec<MapEntry>,
    /// Reported as a backend error instead of the entries
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureData {
    pub programs: Vec<ProgramInfo>,
    pub maps: Vec<MapInfo>,
    pub dumps: Vec<MapDump>,
}

impl FixtureData {
    /// Small dataset resembling a host with a firewall, a tracer and a cgroup hook
    #[must_use]
    pub fn demo() -> Self {
        let loaded_at = "2024-03-18 09:41:07".to_string();
        let program = |id: u32, prog_type: &str, name: &str, tag: &str, maps: &[u32]| ProgramInfo {
            id: ProgId(id),
            prog_type: prog_type.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
            gpl: true,
            loaded_at: loaded_at.clone(),
            uid: Some(0),
            bytes_xlated: 1_184,
            bytes_jited: 712,
            memlock: 4_096,
            map_ids: maps.iter().copied().map(MapId).collect(),
        };
        let map = |id: u32, map_type: &str, name: &str, sizes: (u32, u32, u32)| MapInfo {
            id: MapId(id),
            map_type: map_type.to_string(),
            name: name.to_string(),
            key_size: sizes.0,
            value_size: sizes.1,
            max_entries: sizes.2,
            flags: 0,
            memlock: 8_192,
            loaded_at: loaded_at.clone(),
            uid: Some(0),
        };

        Self {
            programs: vec![
                program(12, "xdp", "xdp_firewall", "a04f5eef06a7f555", &[21, 22]),
                program(13, "tracepoint", "trace_execve", "3b185187f1855c4c", &[23]),
                program(27, "cgroup_skb", "cgroup_egress", "6deef7357e7b4530", &[]),
            ],
            maps: vec![
                map(21, "hash", "blocklist", (4, 1, 1024)),
                map(22, "percpu_array", "pkt_counters", (4, 8, 4)),
                map(23, "ringbuf", "events", (0, 0, 262_144)),
                map(30, "array", "config", (4, 16, 1)),
            ],
            dumps: vec![
                MapDump {
                    map: MapId(21),
                    entries: vec![
                        MapEntry::new([10u8, 0, 0, 1], [1u8]),
                        MapEntry::new([192u8, 168, 1, 23], [1u8]),
                    ],
                    error: None,
                },
                MapDump {
                    map: MapId(22),
                    entries: (0u32..4)
                        .map(|i| MapEntry::new(i.to_le_bytes(), (u64::from(i) * 1_000).to_le_bytes()))
                        .collect(),
                    error: None,
                },
                MapDump {
                    map: MapId(23),
                    entries: Vec::new(),
                    error: Some("dumping ringbuf map: Operation not supported (os error 95)".into()),
                },
            ],
        }
    }
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureOp {
    ListPrograms,
    GetProgram,
    ListMaps,
    GetMap,
    Dump,
}

/// Serves a [`FixtureData`] through both service traits
///
/// Clones share the dataset, so one instance can back the program and the
/// map side of a session.
#[derive(Debug, Clone, Default)]
pub struct FixtureService {
    data: Rc<FixtureData>,
    failures: HashMap<FixtureOp, ServiceError>,
}

impl FixtureService {
    #[must_use]
    pub fn new(data: FixtureData) -> Self {
        Self { data: Rc::new(data), failures: HashMap::new() }
    }

    #[must_use]
    pub fn demo() -> Self {
        Self::new(FixtureData::demo())
    }

    /// Load a dataset from a JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid dataset.
    pub fn from_file(path: &Path) -> Result<Self, TuiError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|source| TuiError::FixtureRead { path: display.clone(), source })?;
        let data = serde_json::from_str(&text)
            .map_err(|source| TuiError::FixtureParse { path: display, source })?;
        Ok(Self::new(data))
    }

    /// Make every call of `op` fail with `err`
    #[must_use]
    pub fn with_failure(mut self, op: FixtureOp, err: ServiceError) -> Self {
        self.failures.insert(op, err);
        self
    }

    fn check(&self, op: FixtureOp) -> Result<(), ServiceError> {
        match self.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl ProgramService for FixtureService {
    fn list(&self) -> Result<Vec<ProgramInfo>, ServiceError> {
        self.check(FixtureOp::ListPrograms)?;
        Ok(self.data.programs.clone())
    }

    fn get(&self, id: ProgId) -> Result<ProgramInfo, ServiceError> {
        self.check(FixtureOp::GetProgram)?;
        self.data
            .programs
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound { kind: EntityKind::Program, id: id.0 })
    }
}

impl MapService for FixtureService {
    fn list(&self) -> Result<Vec<MapInfo>, ServiceError> {
        self.check(FixtureOp::ListMaps)?;
        Ok(self.data.maps.clone())
    }

    fn get(&self, id: MapId) -> Result<MapInfo, ServiceError> {
        self.check(FixtureOp::GetMap)?;
        self.data
            .maps
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound { kind: EntityKind::Map, id: id.0 })
    }

    fn dump(&self, id: MapId) -> Result<Vec<MapEntry>, ServiceError> {
        self.check(FixtureOp::Dump)?;
        if !self.data.maps.iter().any(|m| m.id == id) {
            return Err(ServiceError::NotFound { kind: EntityKind::Map, id: id.0 });
        }
        match self.data.dumps.iter().find(|d| d.map == id) {
            Some(MapDump { error: Some(msg), .. }) => Err(ServiceError::Backend(msg.clone())),
            Some(dump) => Ok(dump.entries.clone()),
            None => Ok(Vec::new()),
        }
    }
}
