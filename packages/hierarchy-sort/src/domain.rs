//! Domain models: input records and the sort outcome

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Node identifier. `0` is reserved for "no parent".
pub type NodeId = u64;

/// Parent id of a top-level node.
pub const ROOT: NodeId = 0;

/// One `(id, parent)` pair, as returned by an `id => parent` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: NodeId,
}

impl NodeRecord {
    pub fn new(id: NodeId, parent_id: NodeId) -> Self {
        Self { id, parent_id }
    }

    pub fn root(id: NodeId) -> Self {
        Self::new(id, ROOT)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id == ROOT
    }
}

impl From<(NodeId, NodeId)> for NodeRecord {
    fn from((id, parent_id): (NodeId, NodeId)) -> Self {
        Self::new(id, parent_id)
    }
}

/// Result of a hierarchical sort
///
/// `ordered_ids` lists every distinct input id once, parents before their
/// descendants. `levels` holds the depth of each of those ids.
///
/// `unresolved` lists the parent ids of orphan subtrees whose ancestor walk
/// ran into a cycle or the depth limit; levels inside those subtrees are
/// approximate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOutcome {
    pub ordered_ids: Vec<NodeId>,
    pub levels: HashMap<NodeId, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<NodeId>,
}

impl SortOutcome {
    pub fn len(&self) -> usize {
        self.ordered_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_ids.is_empty()
    }

    pub fn level_of(&self, id: NodeId) -> Option<usize> {
        self.levels.get(&id).copied()
    }

    /// Levels parallel to `ordered_ids` (index `i` is the level of
    /// `ordered_ids[i]`).
    ///
    /// Every emitted id has a level in outcomes built by the sort or by
    /// [`SortOutcome::from_json`].
    pub fn levels_in_order(&self) -> Vec<usize> {
        self.ordered_ids
            .iter()
            .map(|id| {
                let level = self.levels.get(id).copied();
                debug_assert!(level.is_some(), "no level for emitted id {}", id);
                level.unwrap_or_default()
            })
            .collect()
    }

    /// First emitted id without a level, if any
    fn missing_level(&self) -> Option<NodeId> {
        self.ordered_ids
            .iter()
            .copied()
            .find(|id| !self.levels.contains_key(id))
    }

    /// True when every orphan subtree got a fully resolved depth.
    pub fn is_exact(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Re-order a caller's entities to follow `ordered_ids`.
    ///
    /// Items whose key is not part of the outcome keep their relative order
    /// and go last.
    pub fn reorder<T, F>(&self, mut items: Vec<T>, key: F) -> Vec<T>
    where
        F: Fn(&T) -> NodeId,
    {
        let position: HashMap<NodeId, usize> = self
            .ordered_ids
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        items.sort_by_key(|item| position.get(&key(item)).copied().unwrap_or(usize::MAX));
        items
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an outcome, rejecting one whose `levels` miss an emitted id.
    pub fn from_json(json: &str) -> Result<Self> {
        let outcome: Self = serde_json::from_str(json)?;
        match outcome.missing_level() {
            Some(id) => {
                let message = format!("no level for emitted id {}", id);
                Err(serde_json::Error::custom(message).into())
            }
            None => Ok(outcome),
        }
    }
}
