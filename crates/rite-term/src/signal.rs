// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// SIGWINCH — terminal resize notification.
//
// The handler does the one thing that is async-signal-safe: it raises an
// atomic flag. Nothing reacts immediately. The input decoder tests and
// clears the flag the next time a read comes back empty, so a resize turns
// into exactly one `Event::Resize` no matter how many signals arrived.

use std::sync::atomic::{AtomicBool, Ordering};

/// A test-and-clear resize notification.
#[derive(Debug)]
pub struct ResizeFlag(AtomicBool);

impl ResizeFlag {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark a resize as pending.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Return whether a resize was pending, clearing it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::Relaxed)
    }

    /// Whether a resize is pending, without clearing it.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ResizeFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Raised by the SIGWINCH handler.
pub static RESIZE_PENDING: ResizeFlag = ResizeFlag::new();

/// Install the SIGWINCH handler that raises [`RESIZE_PENDING`].
///
/// `SA_RESTART` is left off so a blocking `poll` wakes up on resize.
#[cfg(unix)]
pub fn install_resize_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZE_PENDING.raise();
}

#[cfg(not(unix))]
pub fn install_resize_handler() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears() {
        let flag = ResizeFlag::new();
        assert!(!flag.take());

        flag.raise();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
        assert!(!flag.is_raised());
    }

    #[cfg(unix)]
    #[test]
    fn handler_raises_global_flag() {
        install_resize_handler();
        RESIZE_PENDING.take();

        unsafe {
            libc::raise(libc::SIGWINCH);
        }
        assert!(RESIZE_PENDING.take());
    }
}
