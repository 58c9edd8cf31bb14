//! Mapping from a note's unique identifier to its Confluence page id.
//!
//! An empty page id marks an identifier that has been assigned to a note but
//! not yet connected to a page. Entries are never removed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping(BTreeMap<String, String>);

impl Mapping {
    /// Page id recorded for `unique_id`, possibly empty
    pub fn get(&self, unique_id: &str) -> Option<&str> {
        self.0.get(unique_id).map(String::as_str)
    }

    /// Record `page_id` for `unique_id`, replacing any previous value
    pub fn set(&mut self, unique_id: &str, page_id: &str) {
        self.0.insert(unique_id.to_string(), page_id.to_string());
    }

    /// Create an empty entry for a freshly assigned identifier.
    /// An existing entry is left untouched.
    pub fn insert_slot(&mut self, unique_id: &str) {
        self.0.entry(unique_id.to_string()).or_default();
    }

    /// The page id for `unique_id` when it is actually connected
    pub fn connected_page(&self, unique_id: &str) -> Option<&str> {
        self.get(unique_id).filter(|page_id| !page_id.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
