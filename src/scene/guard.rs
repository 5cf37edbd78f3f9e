//! Scoped "already running" flag.

use std::cell::Cell;

/// A boolean flag that is set for exactly as long as a [`GuardToken`] lives.
///
/// Entering while the flag is set yields `None`; callers treat that as a
/// no-op, not an error.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    active: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and returns a token that clears it on drop, or `None`
    /// if the flag is already set.
    pub fn enter(&self) -> Option<GuardToken<'_>> {
        if self.active.replace(true) {
            return None;
        }
        Some(GuardToken { flag: &self.active })
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Clears its [`ReentrancyGuard`] when dropped, on every exit path.
#[derive(Debug)]
pub struct GuardToken<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
