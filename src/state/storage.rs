//! Stored-URL state and the navigation seam.
//!
//! DESIGN
//! ======
//! When an unauthenticated user hits a guarded route, the guard stores the
//! target URL here before redirecting to login. Once the identity cache
//! resolves a signed-in account it takes the slot and hands it to the
//! [`Navigator`], so the user lands where they originally wanted to go.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::sync::Mutex;

/// Single-slot store for the URL to restore after login.
#[derive(Debug, Default)]
pub struct StateStorage {
    url: Mutex<Option<String>>,
}

impl StateStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a URL to navigate to after the next successful login.
    /// Overwrites any previously stored URL.
    pub fn store_url(&self, url: impl Into<String>) {
        let mut slot = self.url.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(url.into());
    }

    /// Take the stored URL, clearing the slot. Restoration is one-shot.
    #[must_use]
    pub fn take_url(&self) -> Option<String> {
        let mut slot = self.url.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        slot.take()
    }

    /// Drop any stored URL without navigating.
    pub fn clear_url(&self) {
        let mut slot = self.url.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
    }
}

/// Router seam consumed by the identity cache.
///
/// The UI layer implements this against its actual router; tests record
/// the calls.
pub trait Navigator: Send + Sync {
    /// Navigate the application to the given URL.
    fn navigate_by_url(&self, url: &str);
}
