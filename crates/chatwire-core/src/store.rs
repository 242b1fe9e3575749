//! Injected key-value capability for auxiliary request context.
//!
//! Handlers that need to stash small string values between requests (the
//! "remember this for later" style of tool action) depend on this trait
//! instead of a process-global map. The default [`MemoryStore`] is a
//! synchronized in-memory table scoped to the server process; swapping in
//! an external cache or database is a matter of implementing two methods.

use std::collections::HashMap;
use std::sync::RwLock;

/// Get/set string values by key.
pub trait ContextStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Process-lifetime in-memory implementation of [`ContextStore`].
///
/// The interior `RwLock` makes concurrent writers from simultaneous
/// requests safe; contention is irrelevant at the value sizes involved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContextStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner
            .read()
            .expect("context store lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.inner
            .write()
            .expect("context store lock poisoned")
            .insert(key.to_owned(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("color"), None);

        store.set("color", "teal".into());
        assert_eq!(store.get("color"), Some("teal".into()));

        store.set("color", "mauve".into());
        assert_eq!(store.get("color"), Some("mauve".into()));
    }
}
