//! Live backend reading BPF objects from the running kernel

use std::error::Error as StdError;
use std::fmt::Debug;
use std::io;
use std::os::fd::{AsFd, AsRawFd};
use std::time::SystemTime;

use aya::maps::{self, MapError};
use aya::programs::{self, ProgramError};
use log::debug;

use super::cpus::possible_cpu_count;
use super::map_iter::{dump_entries, value_buffer_len, MapLayout};
use super::{MapService, ProgramService};
use crate::domain::{EntityKind, MapEntry, MapId, MapInfo, ProgId, ProgramInfo, ServiceError};

/// Reads programs and maps through aya and walks maps with raw `bpf(2)`
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelService;

impl KernelService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Snake-case label for an aya type enum, in bpftool's spelling
///
/// `PerCpuArray` becomes `percpu_array`, `SocketFilter` becomes `socket_filter`.
/// Variants whose aya name splits differently from bpftool's are renamed.
#[must_use]
pub fn type_label(kind: &impl Debug) -> String {
    let name = format!("{kind:?}");
    let mut label = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                label.push('_');
            }
            label.push(ch.to_ascii_lowercase());
        } else {
            label.push(ch);
        }
    }
    let label = label.replace("per_cpu", "percpu").replace("trace_point", "tracepoint");
    match label.as_str() {
        "k_probe" => "kprobe".to_string(),
        "u_probe" => "uprobe".to_string(),
        "sched_classifier" => "sched_cls".to_string(),
        "sched_action" => "sched_act".to_string(),
        "program_array" => "prog_array".to_string(),
        "ring_buf" => "ringbuf".to_string(),
        "user_ring_buf" => "user_ringbuf".to_string(),
        "dev_map" => "devmap".to_string(),
        "dev_map_hash" => "devmap_hash".to_string(),
        "sock_map" => "sockmap".to_string(),
        "sock_hash" => "sockhash".to_string(),
        "cpu_map" => "cpumap".to_string(),
        "xsk_map" => "xskmap".to_string(),
        _ => label,
    }
}

fn format_loaded_at(time: Option<SystemTime>) -> String {
    time.map(|t| chrono::DateTime::<chrono::Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn program_error(context: &str, err: &ProgramError, missing: Option<(EntityKind, u32)>) -> ServiceError {
    ServiceError::from_error_chain(context, err, missing)
}

fn map_error(context: &str, err: &MapError, missing: Option<(EntityKind, u32)>) -> ServiceError {
    ServiceError::from_error_chain(context, err, missing)
}

fn convert_program(info: &programs::ProgramInfo) -> ProgramInfo {
    let id = info.id();
    let prog_type = match info.program_type() {
        Ok(kind) => type_label(&kind),
        Err(e) => {
            debug!("program {id}: unknown type: {e}");
            "unknown".to_string()
        }
    };
    let map_ids = match info.map_ids() {
        Ok(ids) => ids.unwrap_or_default().into_iter().map(MapId).collect(),
        Err(e) => {
            debug!("program {id}: cannot read map ids: {e}");
            Vec::new()
        }
    };

    ProgramInfo {
        id: ProgId(id),
        prog_type,
        name: info.name_as_str().unwrap_or_default().to_string(),
        tag: format!("{:016x}", info.tag()),
        gpl: info.gpl_compatible().unwrap_or(false),
        loaded_at: format_loaded_at(info.loaded_at()),
        uid: info.created_by_uid(),
        bytes_xlated: info.size_translated().unwrap_or(0),
        bytes_jited: info.size_jitted(),
        memlock: info.memory_locked().unwrap_or(0),
        map_ids,
    }
}

/// `memlock:` line of the fdinfo for an open map fd
fn fdinfo_memlock(fd: i32) -> Option<u32> {
    let content = std::fs::read_to_string(format!("/proc/self/fdinfo/{fd}")).ok()?;
    content
        .lines()
        .find_map(|line| line.strip_prefix("memlock:"))
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

fn convert_map(info: &maps::MapInfo) -> MapInfo {
    let id = info.id();
    let map_type = match info.map_type() {
        Ok(kind) => type_label(&kind),
        Err(e) => {
            debug!("map {id}: unknown type: {e}");
            "unknown".to_string()
        }
    };
    let memlock = info
        .fd()
        .ok()
        .and_then(|fd| fdinfo_memlock(fd.as_fd().as_raw_fd()))
        .unwrap_or(0);

    MapInfo {
        id: MapId(id),
        map_type,
        name: info.name_as_str().unwrap_or_default().to_string(),
        key_size: info.key_size(),
        value_size: info.value_size(),
        max_entries: info.max_entries(),
        flags: info.map_flags(),
        memlock,
        // Not part of bpf_map_info
        loaded_at: String::new(),
        uid: None,
    }
}

impl ProgramService for KernelService {
    fn list(&self) -> Result<Vec<ProgramInfo>, ServiceError> {
        let mut out = Vec::new();
        for result in programs::loaded_programs() {
            match result {
                Ok(info) => out.push(convert_program(&info)),
                // Unloaded between GET_NEXT_ID and GET_FD_BY_ID
                Err(e) if is_enoent(&e) => {
                    debug!("program vanished during listing: {e}");
                }
                Err(e) => return Err(program_error("listing programs", &e, None)),
            }
        }
        Ok(out)
    }

    fn get(&self, id: ProgId) -> Result<ProgramInfo, ServiceError> {
        find_program(ProgramService::list(self)?, id)
    }
}

/// The kernel has no program lookup by id short of an fd, so scan the listing
fn find_program(programs: Vec<ProgramInfo>, id: ProgId) -> Result<ProgramInfo, ServiceError> {
    programs
        .into_iter()
        .find(|p| p.id == id)
        .ok_or(ServiceError::NotFound { kind: EntityKind::Program, id: id.0 })
}

fn is_enoent(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return io_err.raw_os_error() == Some(libc::ENOENT);
        }
        current = e.source();
    }
    false
}

impl MapService for KernelService {
    fn list(&self) -> Result<Vec<MapInfo>, ServiceError> {
        let mut out = Vec::new();
        for result in maps::loaded_maps() {
            match result {
                Ok(info) => out.push(convert_map(&info)),
                Err(e) if is_enoent(&e) => {
                    debug!("map vanished during listing: {e}");
                }
                Err(e) => return Err(map_error("listing maps", &e, None)),
            }
        }
        Ok(out)
    }

    fn get(&self, id: MapId) -> Result<MapInfo, ServiceError> {
        let info = maps::MapInfo::from_id(id.0)
            .map_err(|e| map_error("map lookup", &e, Some((EntityKind::Map, id.0))))?;
        Ok(convert_map(&info))
    }

    fn dump(&self, id: MapId) -> Result<Vec<MapEntry>, ServiceError> {
        let missing = Some((EntityKind::Map, id.0));
        let info = maps::MapInfo::from_id(id.0).map_err(|e| map_error("map lookup", &e, missing))?;
        let summary = convert_map(&info);
        let fd = info.fd().map_err(|e| map_error("opening map", &e, missing))?;

        let per_cpu = summary.map_type.contains("percpu");
        let cpus = if per_cpu {
            possible_cpu_count().map_err(|e| ServiceError::from_os_error("counting cpus", &e, None))?
        } else {
            1
        };
        let layout = MapLayout {
            key_size: summary.key_size,
            value_len: value_buffer_len(summary.value_size, per_cpu, cpus),
            max_entries: summary.max_entries,
        };

        let entries = dump_entries(fd.as_fd(), &layout).map_err(|e| {
            ServiceError::from_os_error(&format!("dumping {} map", summary.map_type), &e, None)
        })?;
        debug!("map {id}: dumped {} entries", entries.len());
        Ok(entries)
    }
}
