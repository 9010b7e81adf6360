//! Command implementations for the td CLI.
//!
//! This module is the only mutation/query surface over the store. Every
//! operation is a fresh read-modify-write transaction: load the relevant
//! files, validate, mutate in memory, persist atomically, return a typed
//! result. Nothing is cached between invocations.
//!
//! The CLI layer (argument parsing, rendering, exit codes) lives in
//! `cli`/`main`; commands never print or prompt. Destructive operations
//! take an explicit `confirmed` flag instead of reading input.

use std::path::Path;

use serde::Serialize;

use crate::models::{Index, IndexEntry, Item, ItemFilter, TodoList, validate_list_name};
use crate::storage::{Store, list_file_name};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output: Serialize {
    /// Serialize to a compact JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Result of `td init`.
#[derive(Debug, Serialize)]
pub struct InitResult {
    pub initialized: bool,
    pub path: String,
}

impl Output for InitResult {
    fn to_human(&self) -> String {
        if self.initialized {
            format!("Initialized todo store at {}", self.path)
        } else {
            format!("Todo store already initialized at {}", self.path)
        }
    }
}

/// One row of `td lists`.
#[derive(Debug, Serialize)]
pub struct ListSummary {
    pub name: String,
    pub total: usize,
    pub completed: usize,
}

/// Result of `td lists`.
#[derive(Debug, Serialize)]
pub struct ListsResult {
    pub lists: Vec<ListSummary>,
}

impl Output for ListsResult {
    fn to_human(&self) -> String {
        if self.lists.is_empty() {
            return "No lists yet. Create one with `td list create <name>`.".to_string();
        }
        self.lists
            .iter()
            .map(|l| format!("{} ({} items, {} done)", l.name, l.total, l.completed))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of `td list create`.
#[derive(Debug, Serialize)]
pub struct ListCreated {
    pub name: String,
}

impl Output for ListCreated {
    fn to_human(&self) -> String {
        format!("Created list '{}'", self.name)
    }
}

/// Result of `td list delete`.
#[derive(Debug, Serialize)]
pub struct ListDeleted {
    pub name: String,
}

impl Output for ListDeleted {
    fn to_human(&self) -> String {
        format!("Deleted list '{}'", self.name)
    }
}

/// Result of `td item add`.
#[derive(Debug, Serialize)]
pub struct ItemAdded {
    pub list: String,
    pub item: Item,
}

impl Output for ItemAdded {
    fn to_human(&self) -> String {
        format!("Added {}. {} to '{}'", self.item.id, self.item.text, self.list)
    }
}

/// Result of `td item rm`.
#[derive(Debug, Serialize)]
pub struct ItemRemoved {
    pub list: String,
    pub item: Item,
}

impl Output for ItemRemoved {
    fn to_human(&self) -> String {
        format!("Removed {}. {} from '{}'", self.item.id, self.item.text, self.list)
    }
}

/// Result of `td item done`.
#[derive(Debug, Serialize)]
pub struct ItemCompleted {
    pub list: String,
    pub item: Item,
    pub already_completed: bool,
}

impl Output for ItemCompleted {
    fn to_human(&self) -> String {
        if self.already_completed {
            format!("Item {} in '{}' was already completed", self.item.id, self.list)
        } else {
            format!("Completed {}. {} in '{}'", self.item.id, self.item.text, self.list)
        }
    }
}

/// Result of `td item ls` / `td item finished`.
#[derive(Debug, Serialize)]
pub struct ItemsResult {
    pub list: String,
    pub filter: ItemFilter,
    pub items: Vec<Item>,
}

impl Output for ItemsResult {
    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return match self.filter {
                ItemFilter::All => format!("List '{}' is empty", self.list),
                _ => format!("No {} items in '{}'", self.filter, self.list),
            };
        }
        self.items
            .iter()
            .map(|item| {
                let mark = if item.completed { "x" } else { " " };
                format!("[{}] {}. {}", mark, item.id, item.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Initialize the store. Idempotent; reports whether anything was created.
pub fn init(data_dir: &Path) -> Result<InitResult> {
    let store = Store::open(data_dir);
    let created = store.ensure_initialized()?;
    Ok(InitResult {
        initialized: created,
        path: store.root().display().to_string(),
    })
}

/// All list names in ascending order, with item counts.
pub fn list_lists(data_dir: &Path) -> Result<ListsResult> {
    let store = Store::open(data_dir);
    let index = store.load_index()?;
    let mut lists = Vec::with_capacity(index.len());
    for (name, entry) in index.iter() {
        let list = store.load_list(&entry.path)?;
        let completed = list.items.iter().filter(|i| i.completed).count();
        lists.push(ListSummary {
            name: name.to_string(),
            total: list.items.len(),
            completed,
        });
    }
    Ok(ListsResult { lists })
}

/// Create a new empty list and register it in the index.
///
/// Initializes the store first if needed, so this works on a fresh data
/// directory without an explicit `td init`.
pub fn create_list(data_dir: &Path, name: &str) -> Result<ListCreated> {
    validate_list_name(name)?;
    let store = Store::open(data_dir);
    store.ensure_initialized()?;

    let mut index = store.load_index()?;
    if index.contains(name) {
        return Err(Error::DuplicateList(name.to_string()));
    }

    // List file first, index second: the index commit is what makes the
    // list visible, so a crash in between leaves no dangling entry.
    let list = TodoList::new(name.to_string());
    store.save_list(&list)?;
    index.insert(
        name.to_string(),
        IndexEntry {
            path: list_file_name(name),
        },
    );
    store.save_index(&index)?;

    Ok(ListCreated {
        name: name.to_string(),
    })
}

/// Delete a list and its file. Requires `confirmed` to be set; the CLI
/// layer owns prompting or the `--yes` flag.
pub fn delete_list(data_dir: &Path, name: &str, confirmed: bool) -> Result<ListDeleted> {
    let store = Store::open(data_dir);
    let mut index = store.load_index()?;
    let Some(entry) = index.get(name).cloned() else {
        return Err(Error::ListNotFound(name.to_string()));
    };
    if !confirmed {
        return Err(Error::ConfirmationRequired(name.to_string()));
    }

    // Index first: an orphaned list file is harmless, a dangling index
    // entry is a corrupt store.
    index.remove(name);
    store.save_index(&index)?;
    store.remove_list_file(&entry.path)?;

    Ok(ListDeleted {
        name: name.to_string(),
    })
}

/// Append a new pending item to a list.
pub fn add_item(data_dir: &Path, list_name: &str, text: &str) -> Result<ItemAdded> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidItem("item text must not be empty".to_string()));
    }

    let store = Store::open(data_dir);
    let index = store.load_index()?;
    let mut list = load_named_list(&store, &index, list_name)?;
    let item = list.add_item(text.to_string());
    store.save_list(&list)?;

    Ok(ItemAdded {
        list: list_name.to_string(),
        item,
    })
}

/// Remove an item, addressed by id or 1-based position (id wins).
pub fn remove_item(data_dir: &Path, list_name: &str, token: u64) -> Result<ItemRemoved> {
    let store = Store::open(data_dir);
    let index = store.load_index()?;
    let mut list = load_named_list(&store, &index, list_name)?;
    let pos = list.resolve_token(token).ok_or(Error::ItemNotFound {
        list: list_name.to_string(),
        token,
    })?;
    let item = list.items.remove(pos);
    store.save_list(&list)?;

    Ok(ItemRemoved {
        list: list_name.to_string(),
        item,
    })
}

/// Complete an item, addressed by id or 1-based position (id wins).
///
/// Completing an already-completed item is an idempotent success: the file
/// is not rewritten and the original `completed_at` is preserved.
pub fn complete_item(data_dir: &Path, list_name: &str, token: u64) -> Result<ItemCompleted> {
    let store = Store::open(data_dir);
    let index = store.load_index()?;
    let mut list = load_named_list(&store, &index, list_name)?;
    let pos = list.resolve_token(token).ok_or(Error::ItemNotFound {
        list: list_name.to_string(),
        token,
    })?;

    let transitioned = list.items[pos].complete();
    if transitioned {
        store.save_list(&list)?;
    }

    Ok(ItemCompleted {
        list: list_name.to_string(),
        item: list.items[pos].clone(),
        already_completed: !transitioned,
    })
}

/// Items of a list in display order, optionally filtered by completion.
pub fn get_items(data_dir: &Path, list_name: &str, filter: ItemFilter) -> Result<ItemsResult> {
    let store = Store::open(data_dir);
    let index = store.load_index()?;
    let list = load_named_list(&store, &index, list_name)?;
    let items = list
        .items
        .into_iter()
        .filter(|i| filter.matches(i))
        .collect();

    Ok(ItemsResult {
        list: list_name.to_string(),
        filter,
        items,
    })
}

fn load_named_list(store: &Store, index: &Index, name: &str) -> Result<TodoList> {
    let entry = index
        .get(name)
        .ok_or_else(|| Error::ListNotFound(name.to_string()))?;
    store.load_list(&entry.path)
}
