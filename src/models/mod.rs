//! Data models for taskdeck entities.
//!
//! This module defines the core data structures:
//! - `Item` - a single todo entry with completion state and timestamps
//! - `TodoList` - a named, ordered collection of items with its own id counter
//! - `Index` - the persisted catalog mapping list names to file locations
//! - `ItemFilter` - query filter over an item's completion state
//!
//! Field order on the serialized structs is load-bearing: serde emits keys
//! in declaration order, which is what keeps the on-disk JSON byte-stable.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// A single todo entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    /// Positive id, unique within the owning list, never reused
    pub id: u64,

    /// Description text (non-empty)
    pub text: String,

    /// Completion state
    pub completed: bool,

    /// Creation timestamp, set once, immutable
    pub created_at: DateTime<Utc>,

    /// Set exactly when `completed` transitions false to true
    pub completed_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create a new pending item with the given id and text.
    pub fn new(id: u64, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Mark the item completed. Returns false if it already was, in which
    /// case nothing changes (`completed_at` keeps its original value).
    pub fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(Utc::now());
        true
    }
}

/// A named, ordered collection of items with a monotonic id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoList {
    /// List name, unique across the store
    pub name: String,

    /// Next id to issue; strictly greater than every id ever issued
    pub next_id: u64,

    /// Items in insertion order (= display order)
    pub items: Vec<Item>,
}

impl TodoList {
    /// Create a new empty list.
    pub fn new(name: String) -> Self {
        Self {
            name,
            next_id: 1,
            items: Vec::new(),
        }
    }

    /// Append a new pending item, allocating the next id.
    /// Returns a copy of the stored item.
    pub fn add_item(&mut self, text: String) -> Item {
        let item = Item::new(self.next_id, text);
        self.next_id += 1;
        self.items.push(item.clone());
        item
    }

    /// Resolve a numeric token to an item position.
    ///
    /// An exact id match always wins. Only when no item carries the token
    /// as its id is the token read as a 1-based position in display order.
    pub fn resolve_token(&self, token: u64) -> Option<usize> {
        if let Some(pos) = self.items.iter().position(|i| i.id == token) {
            return Some(pos);
        }
        let idx = usize::try_from(token).ok()?;
        if idx >= 1 && idx <= self.items.len() {
            return Some(idx - 1);
        }
        None
    }

    /// Check the structural invariants a list file must satisfy.
    ///
    /// Returns a human-readable reason on the first violation; the storage
    /// layer wraps it into a `CorruptStore` error with the file path.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err("list name is empty".to_string());
        }
        if self.next_id < 1 {
            return Err("next_id must be at least 1".to_string());
        }
        let mut seen = std::collections::BTreeSet::new();
        for item in &self.items {
            if item.id < 1 {
                return Err(format!("item id {} is not positive", item.id));
            }
            if !seen.insert(item.id) {
                return Err(format!("duplicate item id {}", item.id));
            }
            if item.id >= self.next_id {
                return Err(format!(
                    "next_id {} is not greater than item id {}",
                    self.next_id, item.id
                ));
            }
            if item.text.is_empty() {
                return Err(format!("item {} has empty text", item.id));
            }
            if item.completed != item.completed_at.is_some() {
                return Err(format!(
                    "item {} violates the completion invariant (completed={} but completed_at {} set)",
                    item.id,
                    item.completed,
                    if item.completed_at.is_some() { "is" } else { "is not" }
                ));
            }
        }
        Ok(())
    }
}

/// Index entry: where a list lives, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexEntry {
    /// Relative file name, e.g. `work.json`
    pub path: String,
}

/// Persisted catalog mapping list names to file locations.
///
/// Backed by a `BTreeMap` so serialization always emits names in ascending
/// order. Deserialization rejects duplicate names in the JSON text instead
/// of silently keeping the last one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Index {
    lists: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.lists.get(name)
    }

    pub fn insert(&mut self, name: String, entry: IndexEntry) {
        self.lists.insert(name, entry);
    }

    pub fn remove(&mut self, name: &str) -> Option<IndexEntry> {
        self.lists.remove(name)
    }

    /// List names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.lists.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check entry invariants: paths must be plain file names.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, entry) in &self.lists {
            if name.is_empty() {
                return Err("index contains an empty list name".to_string());
            }
            if entry.path.is_empty() {
                return Err(format!("list '{}' has an empty path", name));
            }
            if entry.path.contains('/') || entry.path.contains('\\') {
                return Err(format!(
                    "list '{}' has a non-relative path '{}'",
                    name, entry.path
                ));
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Index {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = Index;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of list names to index entries")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Index, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut lists = BTreeMap::new();
                while let Some((name, entry)) = map.next_entry::<String, IndexEntry>()? {
                    if lists.insert(name.clone(), entry).is_some() {
                        return Err(de::Error::custom(format!(
                            "duplicate list name '{}'",
                            name
                        )));
                    }
                }
                Ok(Index { lists })
            }
        }

        deserializer.deserialize_map(IndexVisitor)
    }
}

/// Query filter over item completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Pending => !item.completed,
            ItemFilter::Completed => item.completed,
        }
    }
}

impl fmt::Display for ItemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemFilter::All => "all",
            ItemFilter::Pending => "pending",
            ItemFilter::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// File stem of the index file; lists may not claim it as a name.
pub const RESERVED_LIST_NAME: &str = "lists";

/// Validate a list name supplied by the caller.
///
/// Names double as file names under the data directory, so anything that
/// could escape it or collide with the index file is rejected.
pub fn validate_list_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(invalid("name must not contain path separators"));
    }
    if name == "." || name == ".." || name.starts_with('.') {
        return Err(invalid("name must not start with '.'"));
    }
    if name == RESERVED_LIST_NAME {
        return Err(invalid("name is reserved for the store index"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_pending() {
        let item = Item::new(1, "Email team".to_string());
        assert_eq!(item.id, 1);
        assert!(!item.completed);
        assert!(item.completed_at.is_none());
    }

    #[test]
    fn complete_sets_timestamp_once() {
        let mut item = Item::new(1, "Email team".to_string());
        assert!(item.complete());
        assert!(item.completed);
        let first = item.completed_at;
        assert!(first.is_some());

        // Idempotent: second call reports no transition and keeps the stamp.
        assert!(!item.complete());
        assert_eq!(item.completed_at, first);
    }

    #[test]
    fn add_item_allocates_monotonic_ids() {
        let mut list = TodoList::new("work".to_string());
        assert_eq!(list.add_item("a".to_string()).id, 1);
        assert_eq!(list.add_item("b".to_string()).id, 2);
        list.items.remove(0);
        assert_eq!(list.add_item("c".to_string()).id, 3);
        assert_eq!(list.next_id, 4);
    }

    #[test]
    fn resolve_prefers_exact_id_over_position() {
        let mut list = TodoList::new("work".to_string());
        list.add_item("a".to_string()); // id 1
        list.add_item("b".to_string()); // id 2
        list.add_item("c".to_string()); // id 3
        list.items.remove(0);
        // Display order is now [id 2, id 3]; token 2 is both id 2 (pos 0)
        // and position 2 (id 3). The id match must win.
        let pos = list.resolve_token(2).unwrap();
        assert_eq!(list.items[pos].id, 2);
    }

    #[test]
    fn resolve_falls_back_to_position() {
        let mut list = TodoList::new("work".to_string());
        list.add_item("a".to_string());
        list.add_item("b".to_string());
        list.items.remove(0);
        // Only item left has id 2 at position 1; token 1 matches no id.
        let pos = list.resolve_token(1).unwrap();
        assert_eq!(list.items[pos].id, 2);
        assert!(list.resolve_token(99).is_none());
        assert!(list.resolve_token(0).is_none());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut list = TodoList::new("work".to_string());
        list.add_item("a".to_string());
        let dup = list.items[0].clone();
        list.items.push(dup);
        let err = list.validate().unwrap_err();
        assert!(err.contains("duplicate item id"), "{err}");
    }

    #[test]
    fn validate_rejects_stale_next_id() {
        let mut list = TodoList::new("work".to_string());
        list.add_item("a".to_string());
        list.next_id = 1;
        let err = list.validate().unwrap_err();
        assert!(err.contains("next_id"), "{err}");
    }

    #[test]
    fn validate_rejects_completion_mismatch() {
        let mut list = TodoList::new("work".to_string());
        list.add_item("a".to_string());
        list.items[0].completed = true; // no completed_at
        let err = list.validate().unwrap_err();
        assert!(err.contains("completion invariant"), "{err}");
    }

    #[test]
    fn index_deserialize_rejects_duplicate_names() {
        let json = r#"{"work": {"path": "work.json"}, "work": {"path": "work.json"}}"#;
        let err = serde_json::from_str::<Index>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate list name"), "{err}");
    }

    #[test]
    fn index_serializes_names_in_order() {
        let mut index = Index::new();
        index.insert(
            "zeta".to_string(),
            IndexEntry {
                path: "zeta.json".to_string(),
            },
        );
        index.insert(
            "alpha".to_string(),
            IndexEntry {
                path: "alpha.json".to_string(),
            },
        );
        let json = serde_json::to_string(&index).unwrap();
        assert!(json.find("alpha").unwrap() < json.find("zeta").unwrap());
    }

    #[test]
    fn list_name_validation() {
        assert!(validate_list_name("work").is_ok());
        assert!(validate_list_name("work-2026").is_ok());
        for bad in ["", "  ", "a/b", "a\\b", ".", "..", ".hidden", "lists"] {
            assert!(
                matches!(validate_list_name(bad), Err(Error::InvalidName { .. })),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn filter_matches() {
        let mut item = Item::new(1, "a".to_string());
        assert!(ItemFilter::All.matches(&item));
        assert!(ItemFilter::Pending.matches(&item));
        assert!(!ItemFilter::Completed.matches(&item));
        item.complete();
        assert!(ItemFilter::All.matches(&item));
        assert!(!ItemFilter::Pending.matches(&item));
        assert!(ItemFilter::Completed.matches(&item));
    }
}
