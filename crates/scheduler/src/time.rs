// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Small epoch-millis helper shared across the scheduler.

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
