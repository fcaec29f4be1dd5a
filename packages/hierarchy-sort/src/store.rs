//! Record store port and an in-memory adapter
//!
//! A `RecordSource` answers the `id => parent` query that feeds the sorter.
//! It only ever returns the two ids per entity, never full bodies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ancestry::AncestorLookup;
use crate::domain::{NodeId, NodeRecord, ROOT};
use crate::error::Result;

/// Selection of records to sort. Results are never paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    /// Only entities of this kind (e.g. "page")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Only these ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<NodeId>>,
}

impl RecordQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn include(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.include = Some(ids.into_iter().collect());
        self
    }

    fn matches(&self, node: &StoredNode) -> bool {
        if let Some(kind) = &self.kind {
            if &node.kind != kind {
                return false;
            }
        }
        if let Some(ids) = &self.include {
            if !ids.contains(&node.id) {
                return false;
            }
        }
        true
    }
}

/// Source of `(id, parent)` records
pub trait RecordSource {
    fn hierarchy_records(&self, query: &RecordQuery) -> Result<Vec<NodeRecord>>;
}

/// Entity as kept by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNode {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: NodeId,
    #[serde(default)]
    pub kind: String,
}

impl StoredNode {
    pub fn new(id: NodeId, parent_id: NodeId, kind: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            kind: kind.into(),
        }
    }
}

/// In-memory entity store, iterated in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: Vec<StoredNode>,
    by_id: HashMap<NodeId, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing (in place) any node with the same id
    pub fn insert(&mut self, node: StoredNode) -> Option<StoredNode> {
        match self.by_id.get(&node.id) {
            Some(&idx) => Some(std::mem::replace(&mut self.nodes[idx], node)),
            None => {
                self.by_id.insert(node.id, self.nodes.len());
                self.nodes.push(node);
                None
            }
        }
    }

    /// Re-parent a stored node; false if `id` is unknown
    pub fn set_parent(&mut self, id: NodeId, parent_id: NodeId) -> bool {
        match self.by_id.get(&id) {
            Some(&idx) => {
                self.nodes[idx].parent_id = parent_id;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: NodeId) -> Option<StoredNode> {
        let idx = self.by_id.remove(&id)?;
        let removed = self.nodes.remove(idx);
        for slot in self.by_id.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: NodeId) -> Option<&StoredNode> {
        self.by_id.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredNode> {
        self.nodes.iter()
    }
}

impl FromIterator<StoredNode> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = StoredNode>>(iter: I) -> Self {
        let mut store = MemoryStore::new();
        for node in iter {
            store.insert(node);
        }
        store
    }
}

impl RecordSource for MemoryStore {
    fn hierarchy_records(&self, query: &RecordQuery) -> Result<Vec<NodeRecord>> {
        Ok(self
            .nodes
            .iter()
            .filter(|node| query.matches(node))
            .map(|node| NodeRecord::new(node.id, node.parent_id))
            .collect())
    }
}

impl AncestorLookup for MemoryStore {
    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.get(id).map_or(ROOT, |node| node.parent_id))
    }
}
