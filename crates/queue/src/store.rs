// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! File persistence for queue entries: one JSON file per entry under
//! `pending/` or `dispatched/` (spec §4.4 "Persistence layout").

use agency_core::QueuedTask;
use std::path::{Path, PathBuf};

use crate::error::QueueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Pending,
    Dispatched,
}

impl Location {
    fn dir_name(self) -> &'static str {
        match self {
            Location::Pending => "pending",
            Location::Dispatched => "dispatched",
        }
    }
}

pub fn ensure_layout(root: &Path) -> Result<(), QueueError> {
    for dir in [Location::Pending, Location::Dispatched] {
        let path = root.join(dir.dir_name());
        std::fs::create_dir_all(&path).map_err(|e| QueueError::Io { path, source: e })?;
    }
    Ok(())
}

fn entry_path(root: &Path, location: Location, queue_id: &str) -> PathBuf {
    root.join(location.dir_name()).join(format!("{queue_id}.json"))
}

/// Write `task` to `location`, replacing any existing file, `0600` mode.
pub fn write_entry(root: &Path, location: Location, task: &QueuedTask) -> Result<(), QueueError> {
    let path = entry_path(root, location, task.queue_id.as_str());
    let bytes = serde_json::to_vec_pretty(task).map_err(|e| QueueError::Json { path: path.clone(), source: e })?;
    std::fs::write(&path, bytes).map_err(|e| QueueError::Io { path: path.clone(), source: e })?;
    set_private_mode(&path)?;
    Ok(())
}

/// Relocate `task` from `from` to `to`: write the new copy, then delete the
/// old one (spec §4.4: "not atomic — startup reconciliation handles the
/// window").
pub fn relocate(root: &Path, from: Location, to: Location, task: &QueuedTask) -> Result<(), QueueError> {
    write_entry(root, to, task)?;
    delete_entry(root, from, task.queue_id.as_str())
}

pub fn delete_entry(root: &Path, location: Location, queue_id: &str) -> Result<(), QueueError> {
    let path = entry_path(root, location, queue_id);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(QueueError::Io { path, source: e }),
    }
}

/// Load every entry currently under `location`, in directory-read order
/// (callers sort by `created_at_ms` themselves).
pub fn load_all(root: &Path, location: Location) -> Result<Vec<QueuedTask>, QueueError> {
    let dir = root.join(location.dir_name());
    let mut out = Vec::new();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
        Err(e) => return Err(QueueError::Io { path: dir, source: e }),
    };
    for entry in entries {
        let entry = entry.map_err(|e| QueueError::Io { path: dir.clone(), source: e })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let bytes = std::fs::read(&path).map_err(|e| QueueError::Io { path: path.clone(), source: e })?;
        let task: QueuedTask = serde_json::from_slice(&bytes).map_err(|e| QueueError::Json { path, source: e })?;
        out.push(task);
    }
    Ok(out)
}

#[cfg(unix)]
fn set_private_mode(path: &Path) -> Result<(), QueueError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| QueueError::Io { path: path.to_path_buf(), source: e })
}

#[cfg(not(unix))]
fn set_private_mode(_path: &Path) -> Result<(), QueueError> {
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
