// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

use super::*;

#[test]
fn first_pin_succeeds() {
    let mut session = Session::new("s1", 0);
    assert!(session.pin_worker("http://127.0.0.1:9000"));
    assert_eq!(session.worker_url.as_deref(), Some("http://127.0.0.1:9000"));
}

#[test]
fn repinning_same_worker_is_a_noop_success() {
    let mut session = Session::new("s1", 0);
    session.pin_worker("http://127.0.0.1:9000");
    assert!(session.pin_worker("http://127.0.0.1:9000"));
}

#[test]
fn pinning_a_different_worker_fails() {
    let mut session = Session::new("s1", 0);
    session.pin_worker("http://127.0.0.1:9000");
    assert!(!session.pin_worker("http://127.0.0.1:9001"));
    assert_eq!(session.worker_url.as_deref(), Some("http://127.0.0.1:9000"));
}
