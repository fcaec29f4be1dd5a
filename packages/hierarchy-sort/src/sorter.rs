//! Hierarchical sort of flat `(id, parent)` records
//!
//! # Algorithm
//! 1. Index the records: top-level ids (parent 0) and `parent → children`,
//!    both in input order. The index is read-only from here on.
//! 2. Depth-first pre-order emission from the top-level ids at depth 0,
//!    driven by an explicit stack. An id is emitted at most once, and a
//!    parent's children are expanded at most once (`consumed`).
//! 3. Parent keys never consumed by step 2 are orphan subtrees (dangling
//!    parent or cycle). Each starts at its top-most unconsumed in-collection
//!    ancestor, whose depth comes from the external ancestor walk.
//!
//! # Example
//! ```
//! use hierarchy_sort::{sort, NodeRecord, NoAncestors};
//!
//! let records = [NodeRecord::new(4, 2), NodeRecord::new(2, 0), NodeRecord::new(3, 2)];
//! let outcome = sort(&records, &NoAncestors).unwrap();
//!
//! assert_eq!(outcome.ordered_ids, vec![2, 4, 3]);
//! assert_eq!(outcome.levels_in_order(), vec![0, 1, 1]);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::ancestry::{walk_ancestors, AncestorLookup, AncestorWalk};
use crate::config::DEFAULT_MAX_ANCESTOR_DEPTH;
use crate::domain::{NodeId, NodeRecord, SortOutcome, ROOT};
use crate::error::Result;

/// Sort `records` with the default ancestor walk limit.
pub fn sort<L>(records: &[NodeRecord], lookup: &L) -> Result<SortOutcome>
where
    L: AncestorLookup + ?Sized,
{
    HierarchySorter::new(lookup).sort(records)
}

/// Children index built once per sort
#[derive(Debug, Default)]
struct ChildrenIndex {
    top_level: Vec<NodeId>,
    roots: FxHashSet<NodeId>,
    children: FxHashMap<NodeId, Vec<NodeId>>,
    /// Parent keys of `children`, in first-seen order
    parent_keys: Vec<NodeId>,
    /// First parent recorded for each id
    parent_of: FxHashMap<NodeId, NodeId>,
}

impl ChildrenIndex {
    fn build(records: &[NodeRecord]) -> Self {
        let mut index = ChildrenIndex::default();

        for record in records {
            if record.is_top_level() {
                index.top_level.push(record.id);
                index.roots.insert(record.id);
            } else {
                match index.children.get_mut(&record.parent_id) {
                    Some(siblings) => siblings.push(record.id),
                    None => {
                        index.parent_keys.push(record.parent_id);
                        index.children.insert(record.parent_id, vec![record.id]);
                    }
                }
            }
            index.parent_of.entry(record.id).or_insert(record.parent_id);
        }

        index
    }

    fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top-most ancestor of `key` (itself included) that is an unconsumed
    /// parent key reachable through in-collection parents.
    fn orphan_root(&self, key: NodeId, consumed: &FxHashSet<NodeId>) -> NodeId {
        let mut current = key;
        let mut seen = FxHashSet::default();
        seen.insert(key);

        while let Some(&parent) = self.parent_of.get(&current) {
            if parent == ROOT
                || consumed.contains(&parent)
                || !self.children.contains_key(&parent)
                || !seen.insert(parent)
            {
                break;
            }
            current = parent;
        }

        current
    }
}

/// Output under construction
#[derive(Debug, Default)]
struct Emission {
    ordered_ids: Vec<NodeId>,
    levels: HashMap<NodeId, usize>,
    consumed: FxHashSet<NodeId>,
}

impl Emission {
    /// Pre-order emission of `start` and everything below it.
    fn emit<'i>(&mut self, index: &'i ChildrenIndex, start: &'i [NodeId], level: usize) {
        let mut stack: Vec<(&'i [NodeId], usize)> = vec![(start, level)];

        while let Some(frame) = stack.last_mut() {
            let (pending, depth) = *frame;
            let Some((&id, rest)) = pending.split_first() else {
                stack.pop();
                continue;
            };
            frame.0 = rest;

            if self.levels.contains_key(&id) {
                continue;
            }
            // Top-level ids are only ever emitted at depth 0.
            if depth > 0 && index.roots.contains(&id) {
                continue;
            }

            self.ordered_ids.push(id);
            self.levels.insert(id, depth);

            let children = index.children_of(id);
            if !children.is_empty() && self.consumed.insert(id) {
                stack.push((children, depth + 1));
            }
        }
    }
}

/// Sorter bound to an ancestor lookup
#[derive(Debug)]
pub struct HierarchySorter<'a, L: ?Sized> {
    lookup: &'a L,
    max_ancestor_depth: usize,
}

impl<'a, L> HierarchySorter<'a, L>
where
    L: AncestorLookup + ?Sized,
{
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
        }
    }

    /// Hard limit for one ancestor walk (at least 1)
    pub fn max_ancestor_depth(mut self, depth: usize) -> Self {
        self.max_ancestor_depth = depth.max(1);
        self
    }

    /// Order `records` parents-first and compute their levels.
    ///
    /// Never fails on malformed hierarchies; only an error from the ancestor
    /// lookup is returned.
    pub fn sort(&self, records: &[NodeRecord]) -> Result<SortOutcome> {
        let index = ChildrenIndex::build(records);
        debug!(
            "sort: {} records, {} top-level, {} parents",
            records.len(),
            index.top_level.len(),
            index.parent_keys.len()
        );

        let mut emission = Emission::default();
        emission.emit(&index, &index.top_level, 0);

        let mut unresolved = Vec::new();
        for &key in &index.parent_keys {
            while !emission.consumed.contains(&key) {
                let start = index.orphan_root(key, &emission.consumed);
                let walk = walk_ancestors(self.lookup, start, self.max_ancestor_depth)?;

                match walk {
                    AncestorWalk::Resolved(depth) => {
                        debug!("sort: orphan subtree under {} at depth {}", start, depth);
                    }
                    AncestorWalk::Cycle { depth, at } => {
                        warn!(
                            "sort: ancestry of {} loops at {}; placing subtree at depth {}",
                            start, at, depth
                        );
                        unresolved.push(start);
                    }
                    AncestorWalk::Truncated { depth } => {
                        warn!(
                            "sort: ancestry of {} exceeds {} levels; placing subtree at depth {}",
                            start, self.max_ancestor_depth, depth
                        );
                        unresolved.push(start);
                    }
                }

                // An in-collection start sits on a cycle and gets expanded
                // once the cycle reaches it. Marking it afterwards keeps that.
                emission.emit(&index, index.children_of(start), walk.depth());
                emission.consumed.insert(start);
            }
        }

        trace!("sort: emitted {} ids", emission.ordered_ids.len());
        Ok(SortOutcome {
            ordered_ids: emission.ordered_ids,
            levels: emission.levels,
            unresolved,
        })
    }
}
