// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;

#[test]
fn rejects_a_malformed_expression() {
    assert!(parse("not a cron").is_err());
}

#[test]
fn parses_a_standard_five_field_expression() {
    assert!(parse("0 2 * * *").is_ok());
}

#[test]
fn next_after_advances_to_the_next_matching_minute() {
    let schedule = parse("*/15 * * * *").unwrap();
    // 2024-01-01T00:00:00Z
    let now_ms = 1_704_067_200_000;
    let next = next_after(&schedule, now_ms).unwrap();
    assert_eq!(next, now_ms + 15 * 60 * 1_000);
}

#[test]
fn next_after_is_strictly_in_the_future() {
    let schedule = parse("0 2 * * *").unwrap();
    let now_ms = 1_704_067_200_000;
    let next = next_after(&schedule, now_ms).unwrap();
    assert!(next > now_ms);
}
