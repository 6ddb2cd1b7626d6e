//! Persisted display order
//!
//! The user-controlled ordering of the photo list, stored as a JSON object
//! mapping each item's order key to an integer position under a single
//! preference key. Only relative order matters; positions may have gaps after
//! removals until the next full rewrite.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::prefs::Preferences;

/// Preference key the whole map is stored under
pub const ORDER_DICT_KEY: &str = "orderDict";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct DisplayOrder {
    positions: BTreeMap<String, i64>,
}

impl DisplayOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions `0..n-1` in the order the keys are given
    pub fn from_sequence<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let positions = keys
            .into_iter()
            .enumerate()
            .map(|(position, key)| (key, position as i64))
            .collect();
        Self { positions }
    }

    /// Read the persisted map, `Ok(None)` if none was ever written
    pub fn load<P: Preferences + ?Sized>(prefs: &P) -> Result<Option<Self>> {
        match prefs.get(ORDER_DICT_KEY)? {
            Some(json) => Ok(Some(Self::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Persist the whole map (always a full rewrite of the stored value)
    pub fn save<P: Preferences + ?Sized>(&self, prefs: &P) -> Result<()> {
        prefs.set(ORDER_DICT_KEY, &self.to_json()?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn position(&self, key: &str) -> Option<i64> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn insert(&mut self, key: String, position: i64) {
        self.positions.insert(key, position);
    }

    pub fn remove(&mut self, key: &str) -> Option<i64> {
        self.positions.remove(key)
    }

    /// One past the largest position, or 0 when empty
    pub fn next_position(&self) -> i64 {
        self.positions.values().max().map_or(0, |max| max + 1)
    }

    /// Keep only the entries for which `keep` returns true
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.positions.retain(|key, _| keep(key));
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Entries sorted by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.positions.iter().map(|(key, position)| (key.as_str(), *position))
    }

    /// Keys sorted by position
    pub fn keys_in_order(&self) -> Vec<&str> {
        let mut entries: Vec<(&str, i64)> = self.iter().collect();
        entries.sort_by_key(|(key, position)| (*position, *key));
        entries.into_iter().map(|(key, _)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferences;

    #[test]
    fn from_sequence_numbers_from_zero() {
        let order = DisplayOrder::from_sequence(vec!["b".to_string(), "a".to_string()]);

        assert_eq!(order.position("b"), Some(0));
        assert_eq!(order.position("a"), Some(1));
        assert_eq!(order.keys_in_order(), vec!["b", "a"]);
    }

    #[test]
    fn next_position_follows_the_maximum() {
        let mut order = DisplayOrder::new();
        assert_eq!(order.next_position(), 0);

        order.insert("a".into(), 0);
        order.insert("b".into(), 7);
        assert_eq!(order.next_position(), 8);

        order.remove("b");
        assert_eq!(order.next_position(), 1);
    }

    #[test]
    fn stored_as_a_flat_json_object() {
        let order = DisplayOrder::from_sequence(vec!["x_displayOrder_".to_string()]);
        assert_eq!(order.to_json().unwrap(), r#"{"x_displayOrder_":0}"#);
    }

    #[test]
    fn load_returns_none_until_saved() {
        let prefs = MemoryPreferences::new();
        assert_eq!(DisplayOrder::load(&prefs).unwrap(), None);

        let order = DisplayOrder::from_sequence(vec!["a".to_string(), "b".to_string()]);
        order.save(&prefs).unwrap();

        assert_eq!(DisplayOrder::load(&prefs).unwrap(), Some(order));
        assert!(prefs.contains_key(ORDER_DICT_KEY));
    }

    #[test]
    fn corrupt_map_is_an_error() {
        let prefs = MemoryPreferences::new();
        prefs.set(ORDER_DICT_KEY, "not json").unwrap();
        assert!(DisplayOrder::load(&prefs).is_err());
    }

    #[test]
    fn retain_drops_entries() {
        let mut order = DisplayOrder::from_sequence(["a", "b", "c"].map(String::from));
        order.retain(|key| key != "b");

        assert_eq!(order.len(), 2);
        assert!(!order.contains("b"));
        assert_eq!(order.keys_in_order(), vec!["a", "c"]);
    }
}
