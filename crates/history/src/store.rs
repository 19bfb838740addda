// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Per-agent durable history of terminal tasks (spec §4.3).
//!
//! One JSON file per outline (`outline-<task_id>.json`) and one plain file
//! per debug payload (`debug-<task_id>.txt`) under
//! `<history_root>/<agent_name>/`, grounded on the teacher's
//! `snapshot.rs`/`JobLogger` "one file per entity under a directory"
//! convention — generalized here from append-only log lines to whole-file
//! read/write/delete because an outline is replaced wholesale, never
//! appended to, once a task reaches a terminal state.

use agency_core::TaskOutline;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::HistoryError;

const DEFAULT_OUTLINE_RETENTION: usize = 100;
const DEFAULT_DEBUG_RETENTION: usize = 20;

struct DebugEntry {
    created_at_ms: u64,
}

/// Durable, retention-bounded history for one agent instance.
pub struct HistoryStore {
    dir: PathBuf,
    outline_retention: usize,
    debug_retention: usize,
    outlines: HashMap<String, TaskOutline>,
    /// Ascending by `started_at_ms`, ties broken by insertion order.
    outline_order: Vec<String>,
    debug_entries: HashMap<String, DebugEntry>,
    debug_order: Vec<String>,
}

/// One page of [`HistoryStore::list`] results.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<TaskOutline>,
    pub total: usize,
}

impl HistoryStore {
    /// Open (creating if absent) the history directory for `agent_name`
    /// under `history_root`, reloading all persisted outlines.
    pub fn open(history_root: &Path, agent_name: &str) -> Result<Self, HistoryError> {
        Self::open_with_retention(history_root, agent_name, DEFAULT_OUTLINE_RETENTION, DEFAULT_DEBUG_RETENTION)
    }

    pub fn open_with_retention(
        history_root: &Path,
        agent_name: &str,
        outline_retention: usize,
        debug_retention: usize,
    ) -> Result<Self, HistoryError> {
        let dir = history_root.join(agent_name);
        fs::create_dir_all(&dir).map_err(|source| HistoryError::Io { path: dir.clone(), source })?;

        let mut store = Self {
            dir,
            outline_retention,
            debug_retention,
            outlines: HashMap::new(),
            outline_order: Vec::new(),
            debug_entries: HashMap::new(),
            debug_order: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    fn reload(&mut self) -> Result<(), HistoryError> {
        let mut loaded: Vec<TaskOutline> = Vec::new();
        let mut debug_ids: Vec<(String, u64)> = Vec::new();

        for entry in fs::read_dir(&self.dir).map_err(|source| HistoryError::Io { path: self.dir.clone(), source })? {
            let entry = entry.map_err(|source| HistoryError::Io { path: self.dir.clone(), source })?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };

            if let Some(rest) = name.strip_prefix("outline-").and_then(|r| r.strip_suffix(".json")) {
                let raw = fs::read_to_string(&path).map_err(|source| HistoryError::Io { path: path.clone(), source })?;
                let outline: TaskOutline = serde_json::from_str(&raw)
                    .map_err(|source| HistoryError::Json { task_id: rest.to_string(), source })?;
                loaded.push(outline);
            } else if let Some(rest) = name.strip_prefix("debug-").and_then(|r| r.strip_suffix(".txt")) {
                let created_at_ms = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .ok()
                    .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0);
                debug_ids.push((rest.to_string(), created_at_ms));
            }
        }

        loaded.sort_by_key(|o| o.started_at_ms);
        for outline in loaded {
            self.outline_order.push(outline.task_id.clone());
            self.outlines.insert(outline.task_id.clone(), outline);
        }

        debug_ids.sort_by_key(|(_, t)| *t);
        for (task_id, created_at_ms) in debug_ids {
            self.debug_order.push(task_id.clone());
            self.debug_entries.insert(task_id, DebugEntry { created_at_ms });
        }

        self.evict_outlines()?;
        self.evict_debug()?;
        Ok(())
    }

    fn outline_path(&self, task_id: &str) -> PathBuf {
        self.dir.join(format!("outline-{task_id}.json"))
    }

    fn debug_path(&self, task_id: &str) -> PathBuf {
        self.dir.join(format!("debug-{task_id}.txt"))
    }

    /// Persist a terminal task's outline, evicting the oldest entries beyond
    /// `OutlineRetention` afterward.
    pub fn put(&mut self, outline: TaskOutline) -> Result<(), HistoryError> {
        let path = self.outline_path(&outline.task_id);
        let json = serde_json::to_string_pretty(&outline)
            .map_err(|source| HistoryError::Json { task_id: outline.task_id.clone(), source })?;
        fs::write(&path, json).map_err(|source| HistoryError::Io { path: path.clone(), source })?;

        if !self.outlines.contains_key(&outline.task_id) {
            self.outline_order.push(outline.task_id.clone());
        }
        self.outlines.insert(outline.task_id.clone(), outline);
        self.outline_order.sort_by_key(|id| self.outlines.get(id).map(|o| o.started_at_ms).unwrap_or(0));

        self.evict_outlines()
    }

    /// Persist a task's full stdout/stderr payload, evicting the oldest
    /// entries beyond `DebugRetention` afterward.
    pub fn put_debug(&mut self, task_id: &str, raw: &[u8], created_at_ms: u64) -> Result<(), HistoryError> {
        let path = self.debug_path(task_id);
        fs::write(&path, raw).map_err(|source| HistoryError::Io { path: path.clone(), source })?;

        if !self.debug_entries.contains_key(task_id) {
            self.debug_order.push(task_id.to_string());
        }
        self.debug_entries.insert(task_id.to_string(), DebugEntry { created_at_ms });
        self.debug_order.sort_by_key(|id| self.debug_entries.get(id).map(|e| e.created_at_ms).unwrap_or(0));

        self.evict_debug()
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskOutline> {
        self.outlines.get(task_id)
    }

    pub fn get_debug(&self, task_id: &str) -> Result<Option<Vec<u8>>, HistoryError> {
        if !self.debug_entries.contains_key(task_id) {
            return Ok(None);
        }
        let path = self.debug_path(task_id);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(HistoryError::Io { path, source }),
        }
    }

    /// Most-recent-first page of outlines.
    pub fn list(&self, page: usize, limit: usize) -> Page {
        let total = self.outline_order.len();
        let mut ids: Vec<&str> = self.outline_order.iter().map(String::as_str).collect();
        ids.reverse();
        let start = page.saturating_mul(limit).min(ids.len());
        let end = start.saturating_add(limit).min(ids.len());
        let items = ids[start..end].iter().filter_map(|id| self.outlines.get(*id).cloned()).collect();
        Page { items, total }
    }

    /// Re-apply the retention caps; called automatically after every `put`
    /// and `put_debug`, exposed for explicit startup pruning too.
    pub fn prune(&mut self) -> Result<(), HistoryError> {
        self.evict_outlines()?;
        self.evict_debug()
    }

    fn evict_outlines(&mut self) -> Result<(), HistoryError> {
        while self.outline_order.len() > self.outline_retention {
            let evicted = self.outline_order.remove(0);
            self.outlines.remove(&evicted);
            let path = self.outline_path(&evicted);
            if path.exists() {
                fs::remove_file(&path).map_err(|source| HistoryError::Io { path, source })?;
            }
        }
        Ok(())
    }

    fn evict_debug(&mut self) -> Result<(), HistoryError> {
        while self.debug_order.len() > self.debug_retention {
            let evicted = self.debug_order.remove(0);
            self.debug_entries.remove(&evicted);
            let path = self.debug_path(&evicted);
            if path.exists() {
                fs::remove_file(&path).map_err(|source| HistoryError::Io { path, source })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
