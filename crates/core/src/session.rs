// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Session identifier type and validation (spec §3 "Session", §4.2).

use crate::error::{ErrorKind, TaskError};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

const MAX_LEN: usize = 128;

/// Unique identifier for a logical thread of related tasks.
///
/// Unlike [`crate::worker::WorkerId`] this is caller-supplied (or generated
/// with URL-safe entropy when omitted) rather than minted from a fixed
/// prefix scheme, so it is a plain validated string newtype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Validate and wrap a caller-supplied session id.
    ///
    /// Must match `[A-Za-z0-9._-]{1,128}` and must not contain `..` (path
    /// traversal guard, even though `/` is already excluded from the
    /// charset — spec §4.2 calls both out explicitly).
    pub fn parse(raw: &str) -> Result<Self, TaskError> {
        if raw.is_empty() || raw.len() > MAX_LEN {
            return Err(TaskError::new(
                ErrorKind::ValidationError,
                format!("session_id must be 1-{MAX_LEN} characters, got {}", raw.len()),
            ));
        }
        let valid_charset = raw.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid_charset {
            return Err(TaskError::new(
                ErrorKind::ValidationError,
                "session_id must match [A-Za-z0-9._-]{1,128}".to_string(),
            ));
        }
        if raw.contains("..") {
            return Err(TaskError::new(
                ErrorKind::ValidationError,
                "session_id must not contain '..'".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Generate a fresh session id with ≥16 bytes of URL-safe entropy
    /// (spec §4.2: "a fresh one is generated").
    pub fn generate() -> Self {
        Self(nanoid::nanoid!(22))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
