//! Ancestor lookups and hierarchy loop detection
//!
//! - `AncestorLookup`: port to an external store answering "who is the parent of X"
//! - `walk_ancestors`: depth of a node, counted by walking parents up to the root
//! - `find_hierarchy_loop`: tortoise-and-hare loop detection over the same port
//! - `check_parent_for_loops`: validates a proposed parent before it is stored
//!
//! The walk keeps a visited set and a hard step limit, so a store that
//! itself contains a cycle cannot make it run forever.

use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

use crate::domain::{NodeId, ROOT};
use crate::error::Result;

/// External parent lookup (id → parent id)
///
/// Implementations return [`ROOT`] for top-level nodes and for ids they do
/// not know about.
pub trait AncestorLookup {
    fn parent_of(&self, id: NodeId) -> Result<NodeId>;
}

impl<T: AncestorLookup + ?Sized> AncestorLookup for &T {
    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        (**self).parent_of(id)
    }
}

impl<S: std::hash::BuildHasher> AncestorLookup for HashMap<NodeId, NodeId, S> {
    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.get(&id).copied().unwrap_or(ROOT))
    }
}

impl AncestorLookup for BTreeMap<NodeId, NodeId> {
    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.get(&id).copied().unwrap_or(ROOT))
    }
}

/// Lookup that knows no parents: every id resolves to the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAncestors;

impl AncestorLookup for NoAncestors {
    fn parent_of(&self, _id: NodeId) -> Result<NodeId> {
        Ok(ROOT)
    }
}

/// Adapter turning a closure into an [`AncestorLookup`]
#[derive(Debug, Clone, Copy)]
pub struct FnLookup<F>(F);

/// Wrap a closure returning the parent id (or `ROOT`) as a lookup.
pub fn from_fn<F>(f: F) -> FnLookup<F>
where
    F: Fn(NodeId) -> NodeId,
{
    FnLookup(f)
}

impl<F> AncestorLookup for FnLookup<F>
where
    F: Fn(NodeId) -> NodeId,
{
    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        Ok((self.0)(id))
    }
}

/// Outcome of walking parents from a node up to the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestorWalk {
    /// Reached the root after `depth` steps.
    Resolved(usize),
    /// Revisited `at` after `depth` steps; the store contains a cycle.
    Cycle { depth: usize, at: NodeId },
    /// Gave up after `depth` steps (the configured maximum).
    Truncated { depth: usize },
}

impl AncestorWalk {
    /// Steps counted before the walk stopped.
    pub fn depth(&self) -> usize {
        match *self {
            AncestorWalk::Resolved(depth)
            | AncestorWalk::Cycle { depth, .. }
            | AncestorWalk::Truncated { depth } => depth,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, AncestorWalk::Resolved(_))
    }
}

/// Count parent hops from `start` to the root.
///
/// `start` itself counts as the first hop, so a node whose parent is the
/// root has depth 1 and `walk_ancestors(lookup, ROOT, _)` is `Resolved(0)`.
pub fn walk_ancestors<L>(lookup: &L, start: NodeId, max_depth: usize) -> Result<AncestorWalk>
where
    L: AncestorLookup + ?Sized,
{
    let mut depth = 0;
    let mut current = start;
    let mut visited = FxHashSet::default();

    while current != ROOT {
        if !visited.insert(current) {
            return Ok(AncestorWalk::Cycle { depth, at: current });
        }
        if depth >= max_depth {
            return Ok(AncestorWalk::Truncated { depth });
        }
        depth += 1;
        current = lookup.parent_of(current)?;
    }

    trace!("walk_ancestors: {} resolved at depth {}", start, depth);
    Ok(AncestorWalk::Resolved(depth))
}

/// Parent lookup with an optional override for a single node
struct Stepper<'a, L: ?Sized> {
    lookup: &'a L,
    overridden: Option<(NodeId, NodeId)>,
}

impl<L: AncestorLookup + ?Sized> Stepper<'_, L> {
    fn parent_of(&self, id: NodeId) -> Result<NodeId> {
        match self.overridden {
            Some((node, parent)) if node == id => Ok(parent),
            _ => self.lookup.parent_of(id),
        }
    }

    /// Floyd's tortoise and hare. Returns some member of the loop reachable
    /// from `start`, and (when `collect` is set) every node touched on the
    /// way to detecting it.
    fn tortoise_hare(&self, start: NodeId, collect: bool) -> Result<(Option<NodeId>, Vec<NodeId>)> {
        let mut tortoise = start;
        let mut hare = start;
        let mut seen = FxHashSet::default();
        let mut members = Vec::new();

        while tortoise != ROOT {
            // One step past the hare, then the hare moves two steps.
            let evanescent = self.parent_of(hare)?;
            if evanescent == ROOT {
                break;
            }
            hare = self.parent_of(evanescent)?;
            if hare == ROOT {
                break;
            }

            if collect {
                for id in [tortoise, evanescent, hare] {
                    if seen.insert(id) {
                        members.push(id);
                    }
                }
            }

            // Tortoise got lapped: must be a loop.
            if tortoise == evanescent || tortoise == hare {
                return Ok((Some(tortoise), members));
            }

            tortoise = self.parent_of(tortoise)?;
        }

        Ok((None, Vec::new()))
    }
}

/// Find the loop, if any, in the ancestry of `start`.
///
/// `start_parent` overrides the stored parent of `start`, which lets callers
/// test a proposed parent before saving it. Returns the loop members in
/// discovery order; empty when the chain ends at the root.
///
/// # Example
/// ```
/// use hierarchy_sort::ancestry::{find_hierarchy_loop, from_fn};
///
/// // 1 → 2 → 3 → 4 → 2
/// let lookup = from_fn(|id| match id { 1 => 2, 2 => 3, 3 => 4, 4 => 2, _ => 0 });
/// assert_eq!(find_hierarchy_loop(&lookup, 1, None).unwrap(), vec![2, 3, 4]);
/// ```
pub fn find_hierarchy_loop<L>(
    lookup: &L,
    start: NodeId,
    start_parent: Option<NodeId>,
) -> Result<Vec<NodeId>>
where
    L: AncestorLookup + ?Sized,
{
    let stepper = Stepper {
        lookup,
        overridden: start_parent.map(|parent| (start, parent)),
    };

    let member = match stepper.tortoise_hare(start, false)? {
        (Some(member), _) => member,
        (None, _) => return Ok(Vec::new()),
    };

    let (_, members) = stepper.tortoise_hare(member, true)?;
    Ok(members)
}

/// Parent to store for a node, plus loop members the caller should detach
/// (reset to the root) to break a pre-existing loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentAssignment {
    pub parent: NodeId,
    pub detach: Vec<NodeId>,
}

impl ParentAssignment {
    fn keep(parent: NodeId) -> Self {
        Self {
            parent,
            detach: Vec::new(),
        }
    }
}

/// Validate `proposed_parent` for `id` against the stored hierarchy.
///
/// - proposed root → root
/// - `id` as its own parent → root
/// - `id` unknown (`ROOT`) → proposed parent as-is
/// - assignment would put `id` in a loop → root
/// - proposed ancestry already loops elsewhere → keep proposed, report the
///   loop members in `detach`
pub fn check_parent_for_loops<L>(
    lookup: &L,
    id: NodeId,
    proposed_parent: NodeId,
) -> Result<ParentAssignment>
where
    L: AncestorLookup + ?Sized,
{
    if proposed_parent == ROOT {
        return Ok(ParentAssignment::keep(ROOT));
    }
    if id == ROOT {
        return Ok(ParentAssignment::keep(proposed_parent));
    }
    if proposed_parent == id {
        return Ok(ParentAssignment::keep(ROOT));
    }

    let members = find_hierarchy_loop(lookup, id, Some(proposed_parent))?;
    if members.is_empty() {
        return Ok(ParentAssignment::keep(proposed_parent));
    }
    if members.contains(&id) {
        return Ok(ParentAssignment::keep(ROOT));
    }

    Ok(ParentAssignment {
        parent: proposed_parent,
        detach: members,
    })
}
