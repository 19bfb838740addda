// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Shared worker state: the single-task admission slot plus the durable
//! collaborators (history, prompt loader, CLI runner) every handler needs.
//!
//! Mirrors the teacher's `ListenCtx` shape: one `Arc`'d context, one mutex
//! guarding the mutable slot, handlers hold the lock only long enough to
//! read or mutate the pointer before releasing it across any `.await`
//! (spec §5 "never held across I/O").

use agency_core::{AgentKind, Task, WorkerState};
use agency_runner::CliRunner;
use parking_lot::Mutex as SyncMutex;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;
use crate::prompt::PromptLoader;
use agency_history::HistoryStore;

/// A task currently occupying the single-task slot.
pub struct RunningTask {
    pub task_id: String,
    pub cancel_token: CancellationToken,
    /// Set once the child is spawned; `0` means "not yet known".
    pub pgid: AtomicI32,
}

impl RunningTask {
    pub fn new(task_id: String) -> Self {
        Self { task_id, cancel_token: CancellationToken::new(), pgid: AtomicI32::new(0) }
    }

    pub fn set_pgid(&self, pgid: i32) {
        self.pgid.store(pgid, Ordering::SeqCst);
    }

    pub fn pgid(&self) -> Option<i32> {
        match self.pgid.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }
}

/// The worker's admission slot: idle, or occupied by exactly one running
/// task (spec §4.2 state machine, excluding `starting`, tracked separately).
pub enum Slot {
    Idle,
    Working(Arc<RunningTask>),
    Cancelling(Arc<RunningTask>),
}

pub struct AppState {
    pub config: WorkerConfig,
    pub runner: Box<dyn CliRunner>,
    pub prompt_loader: PromptLoader,
    pub history: SyncMutex<HistoryStore>,
    pub slot: AsyncMutex<Slot>,
    /// Most recently touched task snapshot, kept around so `GET /task/:id`
    /// can answer for a task that just went terminal, before the caller
    /// fetches `/history/:id` instead.
    pub last_task: SyncMutex<Option<Task>>,
    pub started_at: Instant,
    pub booted: std::sync::atomic::AtomicBool,
    /// Cancelled by `POST /shutdown`; `main` awaits this to drain gracefully.
    pub shutdown_token: CancellationToken,
}

impl AppState {
    pub fn new(
        config: WorkerConfig,
        runner: Box<dyn CliRunner>,
        history: HistoryStore,
    ) -> Self {
        let prompt_loader = PromptLoader::new(config.prompts_dir.clone());
        Self {
            config,
            runner,
            prompt_loader,
            history: SyncMutex::new(history),
            slot: AsyncMutex::new(Slot::Idle),
            last_task: SyncMutex::new(None),
            started_at: Instant::now(),
            booted: std::sync::atomic::AtomicBool::new(false),
            shutdown_token: CancellationToken::new(),
        }
    }

    pub fn agent_kind(&self) -> AgentKind {
        self.config.agent_kind
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// `starting` until `mark_booted` is called once config/binary checks pass.
    pub fn public_state(&self, slot: &Slot) -> WorkerState {
        if !self.booted.load(Ordering::SeqCst) {
            return WorkerState::Starting;
        }
        match slot {
            Slot::Idle => WorkerState::Idle,
            Slot::Working(_) => WorkerState::Working,
            Slot::Cancelling(_) => WorkerState::Cancelling,
        }
    }

    pub fn mark_booted(&self) {
        self.booted.store(true, Ordering::SeqCst);
    }
}
