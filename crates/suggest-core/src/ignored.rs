//! Session-scoped registry of dismissed suggestions.

use crate::action::ErrorKey;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Set of [`ErrorKey`]s the user has dismissed.
///
/// Cloning yields another handle to the same set, so the checker and the session can share one
/// registry. Keys are never removed.
#[derive(Debug, Clone, Default)]
pub struct IgnoredErrors {
    keys: Arc<Mutex<HashSet<ErrorKey>>>,
}

impl IgnoredErrors {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as ignored. Returns `true` if it was not ignored before.
    pub fn ignore(&self, key: ErrorKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key)
    }

    /// Whether `key` has been ignored during this session.
    pub fn is_ignored(&self, key: &ErrorKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    /// Number of ignored keys.
    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been ignored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_is_idempotent() {
        let ignored = IgnoredErrors::new();
        let key = ErrorKey::new(1, 4, "teh");
        assert!(!ignored.is_ignored(&key));

        assert!(ignored.ignore(key.clone()));
        assert!(!ignored.ignore(key.clone()));
        assert!(ignored.is_ignored(&key));
        assert_eq!(ignored.len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let ignored = IgnoredErrors::new();
        let handle = ignored.clone();
        handle.ignore(ErrorKey::new(0, 1, "a"));
        assert!(ignored.is_ignored(&ErrorKey::new(0, 1, "a")));
        assert!(IgnoredErrors::new().is_empty());
    }
}
