// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Standard 5-field cron parsing (spec §4.8 "minute, hour, day-of-month,
//! month, day-of-week").
//!
//! The `cron` crate parses the 6-field dialect (seconds first); a literal
//! `"0"` seconds field is prepended so callers can write ordinary 5-field
//! expressions.

use std::str::FromStr;

use cron::Schedule;

use crate::error::SchedulerError;

pub fn parse(expr: &str) -> Result<Schedule, SchedulerError> {
    let six_field = format!("0 {expr}");
    Schedule::from_str(&six_field).map_err(|source| SchedulerError::InvalidCron { expr: expr.to_string(), source })
}

/// Next fire time at or after `now_ms`, in epoch milliseconds.
pub fn next_after(schedule: &Schedule, now_ms: u64) -> Option<u64> {
    let now = chrono::DateTime::from_timestamp_millis(now_ms as i64)?;
    schedule.after(&now).next().map(|dt| dt.timestamp_millis() as u64)
}

#[cfg(test)]
#[path = "cron_expr_tests.rs"]
mod tests;
