// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! CLI runner adapters (spec §4.1 "CLI Runner").
//!
//! Each supported agent CLI (`claude`, `codex`) gets a [`CliRunner`]
//! implementation: it builds argv, spawns the child in its own process
//! group, and exposes the child's streaming JSON protocol as
//! [`StreamEvent`]s. Everything above this crate — admission, prompt
//! assembly, history recording, cancellation policy — lives in the
//! worker crate.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod claude;
mod codex;
mod error;
mod event;
mod process;
mod runner;
mod signal;
mod spec;

pub use claude::ClaudeRunner;
pub use codex::CodexRunner;
pub use error::RunnerError;
pub use event::{parse_event, ResultSubtype, StreamEvent};
pub use process::ChildProcess;
pub use runner::CliRunner;
pub use signal::{forceful_kill, graceful_terminate};
pub use spec::RunnerTaskSpec;

/// Construct the runner for a given agent kind, rooted at `session_root`
/// for session-directory defaults.
pub fn runner_for(kind: agency_core::AgentKind, session_root: std::path::PathBuf) -> Box<dyn CliRunner> {
    match kind {
        agency_core::AgentKind::Claude => Box::new(ClaudeRunner::new(session_root)),
        agency_core::AgentKind::Codex => Box::new(CodexRunner::new(session_root)),
    }
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn runner_for_dispatches_on_kind() {
        let claude = runner_for(agency_core::AgentKind::Claude, std::path::PathBuf::from("/tmp"));
        assert_eq!(claude.kind(), agency_core::AgentKind::Claude);
        let codex = runner_for(agency_core::AgentKind::Codex, std::path::PathBuf::from("/tmp"));
        assert_eq!(codex.kind(), agency_core::AgentKind::Codex);
    }
}
