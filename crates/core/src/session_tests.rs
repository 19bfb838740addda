// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;
use yare::parameterized;

#[parameterized(
    simple = { "my-session" },
    with_dots = { "session.v1_2" },
    max_len = { &"a".repeat(128) },
    single_char = { "a" },
)]
fn accepts_valid_session_ids(raw: &str) {
    assert!(SessionId::parse(raw).is_ok());
}

#[parameterized(
    empty = { "" },
    too_long = { &"a".repeat(129) },
    slash = { "foo/bar" },
    dotdot = { "foo..bar" },
    space = { "foo bar" },
    unicode = { "caf\u{00e9}" },
)]
fn rejects_invalid_session_ids(raw: &str) {
    let err = SessionId::parse(raw).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::ValidationError);
}

#[test]
fn generated_ids_have_at_least_16_bytes_of_suffix() {
    let id = SessionId::generate();
    assert!(id.as_str().len() >= 16);
}

#[test]
fn generated_ids_are_unique() {
    assert_ne!(SessionId::generate(), SessionId::generate());
}
