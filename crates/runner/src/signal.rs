// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agency Contributors

//! Process-group signal delivery for cancelling a running CLI child
//! (spec §4.2 "Cancellation": graceful terminate, escalate to kill).

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Send `SIGTERM` to the process group rooted at `pgid`, giving the child a
/// chance to flush output and exit cleanly.
pub fn graceful_terminate(pgid: i32) -> nix::Result<()> {
    signal::killpg(Pid::from_raw(pgid), Signal::SIGTERM)
}

/// Send `SIGKILL` to the process group rooted at `pgid`. Used when a child
/// fails to exit within the grace period after [`graceful_terminate`].
pub fn forceful_kill(pgid: i32) -> nix::Result<()> {
    signal::killpg(Pid::from_raw(pgid), Signal::SIGKILL)
}
