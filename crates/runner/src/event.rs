// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! The child's streaming JSON event protocol (spec §4.1).
//!
//! One JSON object per line on stdout; variants are distinguished by a
//! `type` field. Malformed lines never crash the parser — they decode to
//! [`StreamEvent::Malformed`] and the caller logs-and-skips.

use agency_core::UsageStats;
use serde::Deserialize;

/// One parsed line of the child's stdout protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// `system/init`: session acknowledged.
    SystemInit { session_id: Option<String>, model: Option<String> },
    /// `assistant` with a `tool_use` content item.
    AssistantToolUse { name: String },
    /// `assistant` with a `text` content item.
    AssistantText { text: String },
    /// `user` carrying a `tool_use_result`.
    UserToolResult { byte_len: usize },
    /// Terminal `result` event.
    Result {
        subtype: ResultSubtype,
        duration_ms: Option<u64>,
        num_turns: Option<u32>,
        total_cost_usd: Option<f64>,
        usage: Option<UsageStats>,
        /// Present when `subtype == Error`; e.g. `"max_turns"`.
        reason: Option<String>,
    },
    /// Codex's `thread.started`/`turn.started` session marker.
    ThreadStarted { thread_id: String },
    /// A line that didn't parse as any known shape.
    Malformed { raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSubtype {
    Success,
    Error,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    ty: String,
    #[serde(flatten)]
    rest: serde_json::Value,
}

#[derive(Debug, Deserialize, Default)]
struct RawUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}

/// Parse one line of child stdout into a [`StreamEvent`]. Never panics.
pub fn parse_event(line: &str) -> StreamEvent {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return StreamEvent::Malformed { raw: line.to_string() };
    }

    let envelope: RawEnvelope = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) => return StreamEvent::Malformed { raw: line.to_string() },
    };

    match envelope.ty.as_str() {
        "system" | "system/init" => StreamEvent::SystemInit {
            session_id: envelope.rest.get("session_id").and_then(|v| v.as_str()).map(str::to_string),
            model: envelope.rest.get("model").and_then(|v| v.as_str()).map(str::to_string),
        },
        "assistant" => parse_assistant(&envelope.rest),
        "user" => parse_user(&envelope.rest),
        "result" => parse_result(&envelope.rest),
        "thread.started" | "turn.started" => {
            let thread_id = envelope
                .rest
                .get("thread_id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            StreamEvent::ThreadStarted { thread_id }
        }
        _ => StreamEvent::Malformed { raw: line.to_string() },
    }
}

fn parse_assistant(rest: &serde_json::Value) -> StreamEvent {
    let content = rest.pointer("/message/content").and_then(|v| v.as_array());
    let Some(items) = content else {
        return StreamEvent::Malformed { raw: rest.to_string() };
    };
    for item in items {
        match item.get("type").and_then(|v| v.as_str()) {
            Some("tool_use") => {
                let name = item.get("name").and_then(|v| v.as_str()).unwrap_or("unknown").to_string();
                return StreamEvent::AssistantToolUse { name };
            }
            Some("text") => {
                let text = item.get("text").and_then(|v| v.as_str()).unwrap_or_default().to_string();
                return StreamEvent::AssistantText { text };
            }
            _ => continue,
        }
    }
    StreamEvent::Malformed { raw: rest.to_string() }
}

fn parse_user(rest: &serde_json::Value) -> StreamEvent {
    let text = rest
        .get("tool_use_result")
        .and_then(|v| v.as_str())
        .or_else(|| rest.pointer("/message/content").and_then(|v| v.as_str()))
        .unwrap_or_default();
    StreamEvent::UserToolResult { byte_len: text.len() }
}

fn parse_result(rest: &serde_json::Value) -> StreamEvent {
    let subtype = match rest.get("subtype").and_then(|v| v.as_str()) {
        Some("success") => ResultSubtype::Success,
        _ => ResultSubtype::Error,
    };
    let usage = rest.get("usage").map(|v| {
        let raw: RawUsage = serde_json::from_value(v.clone()).unwrap_or_default();
        UsageStats { input_tokens: raw.input_tokens.unwrap_or(0), output_tokens: raw.output_tokens.unwrap_or(0) }
    });
    StreamEvent::Result {
        subtype,
        duration_ms: rest.get("duration_ms").and_then(|v| v.as_u64()),
        num_turns: rest.get("num_turns").and_then(|v| v.as_u64()).map(|n| n as u32),
        total_cost_usd: rest.get("total_cost_usd").and_then(|v| v.as_f64()),
        usage,
        reason: rest.get("reason").and_then(|v| v.as_str()).map(str::to_string),
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
