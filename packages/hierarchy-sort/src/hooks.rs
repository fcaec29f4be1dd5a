//! Filter hooks: ordered callbacks that transform a typed value
//!
//! Callbacks run in ascending priority; equal priorities run in the order
//! they were registered. Each callback receives the value returned by the
//! previous one.

use std::fmt;

use crate::domain::{NodeRecord, SortOutcome};

/// Priority used by [`Filters::add`]
pub const DEFAULT_PRIORITY: i32 = 10;

pub type FilterFn<T> = Box<dyn Fn(T) -> T + Send + Sync>;

struct FilterEntry<T> {
    name: String,
    priority: i32,
    callback: FilterFn<T>,
}

/// Ordered list of named filter callbacks
pub struct Filters<T> {
    entries: Vec<FilterEntry<T>>,
}

impl<T> Default for Filters<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Filters<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` at [`DEFAULT_PRIORITY`]
    pub fn add<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.add_with_priority(name, DEFAULT_PRIORITY, callback);
    }

    pub fn add_with_priority<F>(&mut self, name: impl Into<String>, priority: i32, callback: F)
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        // After every entry with priority <= this one: keeps registration order.
        let at = self.entries.partition_point(|e| e.priority <= priority);
        self.entries.insert(
            at,
            FilterEntry {
                name: name.into(),
                priority,
                callback: Box::new(callback),
            },
        );
    }

    /// Remove every callback registered under `name`; true if any was removed
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `value` through every callback in order
    pub fn apply(&self, value: T) -> T {
        self.entries
            .iter()
            .fold(value, |acc, entry| (entry.callback)(acc))
    }

    fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

impl<T> fmt::Debug for Filters<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Extension points of [`crate::HierarchicalSort`]
#[derive(Debug, Default)]
pub struct SortHooks {
    /// Applied to the fetched records before sorting
    pub records: Filters<Vec<NodeRecord>>,
    /// Applied to the finished outcome
    pub outcome: Filters<SortOutcome>,
}
