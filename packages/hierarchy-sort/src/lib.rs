//! Hierarchy Sort - parents-first ordering for flat `(id, parent)` records
//!
//! Takes an unordered list of `(id, parent_id)` pairs (parent `0` = top level)
//! and produces:
//!
//! - `ordered_ids`: depth-first pre-order, every parent before its
//!   descendants, siblings in input order, each id exactly once
//! - `levels`: depth of every emitted id (top level = 0)
//!
//! Dangling parents and cycles never fail the sort. Subtrees that cannot be
//! reached from a top-level record get their starting depth from an external
//! [`AncestorLookup`]; that walk is cycle-guarded and depth-limited, and any
//! subtree whose depth could not be resolved is listed in
//! [`SortOutcome::unresolved`].
//!
//! ## Modules
//!
//! - [`sorter`]: the sort itself
//! - [`ancestry`]: lookup port, ancestor walk, loop detection
//! - [`cache`]: LRU cache in front of a lookup
//! - [`hooks`]: ordered filter callbacks around the sort
//! - [`store`]: record source port + in-memory store
//! - [`service`]: request eligibility and `run`
//! - [`config`]: YAML configuration
//!
//! ## Usage
//!
//! ```rust
//! use hierarchy_sort::{HierarchicalSort, MemoryStore, RecordQuery, SortRequest, StoredNode};
//!
//! let store: MemoryStore = [
//!     StoredNode::new(4, 2, "page"),
//!     StoredNode::new(2, 0, "page"),
//!     StoredNode::new(3, 2, "page"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let request = SortRequest::hierarchical(RecordQuery::all().kind("page"));
//! let outcome = HierarchicalSort::default().run(&request, &store)?;
//!
//! assert_eq!(outcome.ordered_ids, vec![2, 4, 3]);
//! assert_eq!(outcome.level_of(4), Some(1));
//! # Ok::<(), hierarchy_sort::HierarchyError>(())
//! ```

pub mod ancestry;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod hooks;
pub mod service;
pub mod sorter;
pub mod store;

// Re-exports
pub use ancestry::{
    check_parent_for_loops, find_hierarchy_loop, from_fn, walk_ancestors, AncestorLookup,
    AncestorWalk, FnLookup, NoAncestors, ParentAssignment,
};
pub use cache::CachedLookup;
pub use config::{ConfigError, ConfigResult, SortConfig};
pub use domain::{NodeId, NodeRecord, SortOutcome, ROOT};
pub use error::{HierarchyError, Result};
pub use hooks::{Filters, SortHooks};
pub use service::{HierarchicalSort, SortRequest};
pub use sorter::{sort, HierarchySorter};
pub use store::{MemoryStore, RecordQuery, RecordSource, StoredNode};
