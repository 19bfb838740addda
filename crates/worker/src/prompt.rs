// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Hot-reloadable agency prompt loader (spec §4.2 "Prompt assembly").
//!
//! `<agent_prompts_dir>/<kind>-<mode>.md`, falling back to `<kind>-prod.md`;
//! neither existing fails the task rather than compiling in a default.

use agency_core::{AgentKind, ErrorKind, TaskError};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::PromptMode;

struct Cached {
    path: PathBuf,
    modified: SystemTime,
    content: String,
}

/// Caches the loaded prompt by mtime, re-reading only when the file on disk
/// changed since the last load.
pub struct PromptLoader {
    dir: PathBuf,
    cache: Mutex<Option<Cached>>,
}

impl PromptLoader {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, cache: Mutex::new(None) }
    }

    fn resolve_path(&self, kind: AgentKind, mode: PromptMode) -> Result<PathBuf, TaskError> {
        let primary = self.dir.join(format!("{}-{}.md", kind.as_str(), mode.as_str()));
        if primary.exists() {
            return Ok(primary);
        }
        let fallback = self.dir.join(format!("{}-prod.md", kind.as_str()));
        if fallback.exists() {
            return Ok(fallback);
        }
        Err(TaskError::new(
            ErrorKind::InternalError,
            format!("no agency prompt found for {} ({}) under {}", kind, mode.as_str(), self.dir.display()),
        ))
    }

    /// Load the agency prompt, reusing the cached copy if the resolved
    /// file's mtime hasn't changed.
    pub fn load(&self, kind: AgentKind, mode: PromptMode) -> Result<String, TaskError> {
        let path = self.resolve_path(kind, mode)?;
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("stat {}: {e}", path.display())))?;

        let mut cache = self.cache.lock();
        if let Some(cached) = cache.as_ref() {
            if cached.path == path && cached.modified == modified {
                return Ok(cached.content.clone());
            }
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| TaskError::new(ErrorKind::InternalError, format!("read {}: {e}", path.display())))?;
        *cache = Some(Cached { path: path.clone(), modified, content: content.clone() });
        Ok(content)
    }

    /// Assemble the effective prompt: `agency_prompt || "\n\n" || task.prompt`.
    pub fn assemble(&self, kind: AgentKind, mode: PromptMode, task_prompt: &str) -> Result<String, TaskError> {
        let agency_prompt = self.load(kind, mode)?;
        Ok(format!("{agency_prompt}\n\n{task_prompt}"))
    }

    #[cfg(test)]
    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
