// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Workspace-level end-to-end scenarios (spec §8 "End-to-end scenarios").
//!
//! Component-level invariants (single-task admission, auto-resume,
//! cancellation, crash recovery of the queue itself) are covered by the
//! crate-level test suites next to the code they exercise. These tests
//! drive the control plane's actual HTTP surface against an in-process
//! mock worker, the way the real dispatcher and discovery loops would see
//! it in production.

mod specs;
