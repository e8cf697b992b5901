//! In-flight provisioning guard

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Set of slugs with a provisioning run in progress, for this process only.
#[derive(Clone, Default)]
pub struct ProvisioningGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Held for the duration of one run; releases the slug on drop.
pub struct GuardToken {
    slug: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ProvisioningGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if a run for `slug` is already in flight.
    pub fn try_acquire(&self, slug: &str) -> Option<GuardToken> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert(slug.to_string()) {
            return None;
        }
        Some(GuardToken {
            slug: slug.to_string(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_running(&self, slug: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(slug)
    }
}

impl Drop for GuardToken {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.slug);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let guard = ProvisioningGuard::new();
        let token = guard.try_acquire("sharma-dhaba");
        assert!(token.is_some());
        assert!(guard.try_acquire("sharma-dhaba").is_none());
        assert!(guard.try_acquire("other-site").is_some());

        drop(token);
        assert!(!guard.is_running("sharma-dhaba"));
        assert!(guard.try_acquire("sharma-dhaba").is_some());
    }

    #[test]
    fn released_on_panic_unwind() {
        let guard = ProvisioningGuard::new();
        let cloned = guard.clone();
        let result = std::panic::catch_unwind(move || {
            let _token = cloned.try_acquire("sharma-dhaba");
            panic!("pipeline blew up");
        });
        assert!(result.is_err());
        assert!(!guard.is_running("sharma-dhaba"));
    }
}
