//! Typed per-request values passed down the handler chain.
//!
//! Canonical request fields are fixed once normalization finishes. Middleware that need to
//! hand something to later entries (an authenticated user id, a loaded record) insert it here
//! instead, keyed by its Rust type.
//!
//! ```rust
//! use lambdafai_core::Extensions;
//!
//! #[derive(Debug, PartialEq)]
//! struct UserId(u32);
//!
//! let mut ext = Extensions::new();
//! ext.insert(UserId(7));
//! assert_eq!(ext.get::<UserId>(), Some(&UserId(7)));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Map from a value's type to the value itself.
#[derive(Clone, Default)]
pub struct Extensions {
    map: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Arc::new(value));
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Shared handle to a value, for moving into spawned work.
    pub fn get_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|value| value.clone().downcast::<T>().ok())
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Remove a value. Returns true if one was present.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> bool {
        self.map.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("count", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct UserId(String);

    #[test]
    fn test_insert_and_get() {
        let mut ext = Extensions::new();
        ext.insert(1u32);
        ext.insert(UserId("u-1".to_string()));

        assert_eq!(ext.get::<u32>(), Some(&1));
        assert_eq!(ext.get::<UserId>(), Some(&UserId("u-1".to_string())));
        assert_eq!(ext.get::<String>(), None);
        assert_eq!(ext.len(), 2);
    }

    #[test]
    fn test_insert_replaces_same_type() {
        let mut ext = Extensions::new();
        ext.insert(1u32);
        ext.insert(2u32);
        assert_eq!(ext.get::<u32>(), Some(&2));
        assert_eq!(ext.len(), 1);
    }

    #[test]
    fn test_get_arc_and_remove() {
        let mut ext = Extensions::new();
        ext.insert(UserId("u-2".to_string()));

        let shared = ext.get_arc::<UserId>().unwrap();
        assert_eq!(shared.0, "u-2");

        assert!(ext.contains::<UserId>());
        assert!(ext.remove::<UserId>());
        assert!(!ext.remove::<UserId>());
        assert!(ext.is_empty());
    }
}
