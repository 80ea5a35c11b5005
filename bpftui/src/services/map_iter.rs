//! Raw `bpf(2)` map iteration
//!
//! aya's typed map wrappers need the key and value types at compile time,
//! but a browser only knows the sizes the kernel reports. This walks any
//! key-iterable map with `BPF_MAP_GET_NEXT_KEY` + `BPF_MAP_LOOKUP_ELEM` on
//! byte buffers of those sizes.

#![allow(unsafe_code)] // bpf(2) has no safe libc wrapper

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

use crate::domain::MapEntry;

const BPF_MAP_LOOKUP_ELEM: libc::c_long = 1;
const BPF_MAP_GET_NEXT_KEY: libc::c_long = 4;

/// Prefix of `union bpf_attr` used by the map element commands
#[repr(C)]
#[derive(Default)]
struct MapElemAttr {
    map_fd: u32,
    _pad: u32,
    key: u64,
    value_or_next_key: u64,
    flags: u64,
}

fn bpf(cmd: libc::c_long, attr: &mut MapElemAttr) -> io::Result<()> {
    // SAFETY: attr is a valid, initialised prefix of bpf_attr and the size
    // passed matches it; the kernel only reads/writes the buffers it points to,
    // which the callers keep alive and sized for the map's key/value.
    let ret = unsafe {
        libc::syscall(
            libc::SYS_bpf,
            cmd,
            std::ptr::from_mut(attr),
            std::mem::size_of::<MapElemAttr>(),
        )
    };
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Buffer length for one lookup: per-CPU maps return one 8-byte aligned slot per possible CPU
#[must_use]
pub fn value_buffer_len(value_size: u32, per_cpu: bool, cpus: usize) -> usize {
    let value_size = value_size as usize;
    if per_cpu {
        value_size.next_multiple_of(8) * cpus
    } else {
        value_size
    }
}

/// Shape of the map being walked
pub struct MapLayout {
    pub key_size: u32,
    pub value_len: usize,
    pub max_entries: u32,
}

/// Read every entry of the map behind `fd`, in kernel iteration order
///
/// Entries deleted between `GET_NEXT_KEY` and `LOOKUP_ELEM` are skipped.
/// The walk stops after `max_entries` keys so a map being refilled
/// concurrently cannot keep it going forever.
///
/// # Errors
/// Returns the OS error of the first failing syscall other than the
/// end-of-iteration / vanished-entry `ENOENT`.
pub fn dump_entries(fd: BorrowedFd<'_>, layout: &MapLayout) -> io::Result<Vec<MapEntry>> {
    let map_fd = u32::try_from(fd.as_raw_fd())
        .map_err(|_| io::Error::from_raw_os_error(libc::EBADF))?;

    let mut entries = Vec::new();
    let mut current: Option<Vec<u8>> = None;
    let mut next = vec![0u8; layout.key_size as usize];

    for _ in 0..layout.max_entries {
        let mut attr = MapElemAttr {
            map_fd,
            // A null key asks the kernel for the first key
            key: current.as_ref().map_or(0, |k| k.as_ptr() as u64),
            value_or_next_key: next.as_mut_ptr() as u64,
            ..MapElemAttr::default()
        };
        match bpf(BPF_MAP_GET_NEXT_KEY, &mut attr) {
            Ok(()) => {}
            Err(e) if e.raw_os_error() == Some(libc::ENOENT) => break,
            Err(e) => return Err(e),
        }

        let key = next.clone();
        let mut value = vec![0u8; layout.value_len];
        let mut attr = MapElemAttr {
            map_fd,
            key: key.as_ptr() as u64,
            value_or_next_key: value.as_mut_ptr() as u64,
            ..MapElemAttr::default()
        };
        match bpf(BPF_MAP_LOOKUP_ELEM, &mut attr) {
            Ok(()) => entries.push(MapEntry::new(key.clone(), value)),
            Err(e) if e.raw_os_error() == Some(libc::ENOENT) => {
                log::debug!("map entry vanished during dump, skipping");
            }
            Err(e) => return Err(e),
        }

        current = Some(key);
    }

    Ok(entries)
}
