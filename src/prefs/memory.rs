use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

use super::Preferences;
use crate::error::{JournalError, Result};

/// In-memory preference store for testing.
///
/// Uses `RefCell` for interior mutability since the collection has a single
/// caller. This keeps `Preferences` on `&self` without a lock.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RefCell<HashMap<String, String>>,
    simulate_write_error: Cell<bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(JournalError::Io(io::Error::other("Simulated write error")));
        }
        Ok(())
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("a").unwrap(), None);

        prefs.set("a", "1").unwrap();
        prefs.set("a", "2").unwrap();
        assert_eq!(prefs.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(prefs.len(), 1);

        prefs.remove("a").unwrap();
        assert_eq!(prefs.get("a").unwrap(), None);
        assert!(prefs.is_empty());

        // Removing twice is fine
        prefs.remove("a").unwrap();
    }

    #[test]
    fn simulated_write_errors() {
        let prefs = MemoryPreferences::new();
        prefs.set("kept", "value").unwrap();
        prefs.set_simulate_write_error(true);

        assert!(prefs.set("new", "value").is_err());
        assert!(prefs.remove("kept").is_err());
        assert!(prefs.contains_key("kept"));
        assert!(!prefs.contains_key("new"));

        // Reads keep working
        assert_eq!(prefs.get("kept").unwrap().as_deref(), Some("value"));
    }
}
