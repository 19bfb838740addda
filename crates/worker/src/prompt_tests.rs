// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_kind_and_mode_specific_prompt() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("claude-dev.md"), "dev prompt").expect("write");
    let loader = PromptLoader::new(dir.path().to_path_buf());
    let content = loader.load(AgentKind::Claude, PromptMode::Dev).expect("load");
    assert_eq!(content, "dev prompt");
}

#[test]
fn falls_back_to_prod_when_mode_specific_missing() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("claude-prod.md"), "prod prompt").expect("write");
    let loader = PromptLoader::new(dir.path().to_path_buf());
    let content = loader.load(AgentKind::Claude, PromptMode::Dev).expect("load");
    assert_eq!(content, "prod prompt");
}

#[test]
fn errors_when_neither_file_exists() {
    let dir = tempdir().expect("tempdir");
    let loader = PromptLoader::new(dir.path().to_path_buf());
    let result = loader.load(AgentKind::Claude, PromptMode::Prod);
    assert!(result.is_err());
}

#[test]
fn reload_picks_up_changes_after_mtime_bump() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("claude-prod.md");
    fs::write(&path, "v1").expect("write");
    let loader = PromptLoader::new(dir.path().to_path_buf());
    assert_eq!(loader.load(AgentKind::Claude, PromptMode::Prod).expect("load"), "v1");

    std::thread::sleep(std::time::Duration::from_millis(1100));
    fs::write(&path, "v2").expect("rewrite");
    assert_eq!(loader.load(AgentKind::Claude, PromptMode::Prod).expect("load"), "v2");
}

#[test]
fn assemble_joins_agency_and_task_prompt() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("claude-prod.md"), "You are an agent.").expect("write");
    let loader = PromptLoader::new(dir.path().to_path_buf());
    let full = loader.assemble(AgentKind::Claude, PromptMode::Prod, "Summarize this repo").expect("assemble");
    assert_eq!(full, "You are an agent.\n\nSummarize this repo");
}
