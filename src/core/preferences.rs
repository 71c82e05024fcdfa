use std::sync::Arc;

use crate::core::storage::KeyValueStore;

/// Well-known key of the dark-mode flag
pub const DARK_MODE_KEY: &str = "uc_dark";

/// Display preferences persisted next to the history
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored as the string "true"/"false"; anything else reads as light mode
    pub fn dark_mode(&self) -> bool {
        match self.store.get(DARK_MODE_KEY) {
            Ok(Some(flag)) => flag == "true",
            Ok(None) => false,
            Err(e) => {
                eprintln!("[Preferences] Failed to read theme: {}", e);
                false
            }
        }
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        let flag = if enabled { "true" } else { "false" };
        if let Err(e) = self.store.set(DARK_MODE_KEY, flag) {
            eprintln!("[Preferences] Failed to save theme: {}", e);
        }
    }

    /// Flip the flag and return the new value
    pub fn toggle_dark_mode(&self) -> bool {
        let enabled = !self.dark_mode();
        self.set_dark_mode(enabled);
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::tests::BrokenStore;
    use crate::core::storage::InMemoryStore;

    #[test]
    fn defaults_to_light() {
        let prefs = Preferences::new(Arc::new(InMemoryStore::new()));
        assert!(!prefs.dark_mode());
    }

    #[test]
    fn toggle_flips_and_persists() {
        let store = Arc::new(InMemoryStore::new());
        let prefs = Preferences::new(store.clone());

        assert!(prefs.toggle_dark_mode());
        assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert!(prefs.dark_mode());

        assert!(!prefs.toggle_dark_mode());
        assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn garbage_reads_as_light() {
        let store = Arc::new(InMemoryStore::new());
        store.set(DARK_MODE_KEY, "yes please").unwrap();
        assert!(!Preferences::new(store).dark_mode());
    }

    #[test]
    fn broken_storage_reads_as_light() {
        let prefs = Preferences::new(Arc::new(BrokenStore));
        assert!(!prefs.dark_mode());
        prefs.set_dark_mode(true);
        assert!(!prefs.dark_mode());
    }
}
