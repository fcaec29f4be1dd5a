//! Shared builders and invariant checks for hierarchy-sort tests

#![allow(dead_code)]

use hierarchy_sort::{NodeId, NodeRecord, SortOutcome, ROOT};
use std::collections::{HashMap, HashSet};

/// Install a test-friendly tracing subscriber (RUST_LOG controls verbosity)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records from `(id, parent)` pairs
pub fn records(pairs: &[(NodeId, NodeId)]) -> Vec<NodeRecord> {
    pairs.iter().copied().map(NodeRecord::from).collect()
}

pub fn levels(pairs: &[(NodeId, usize)]) -> HashMap<NodeId, usize> {
    pairs.iter().copied().collect()
}

/// Invariants every outcome must satisfy, whatever the input shape
pub fn assert_outcome_invariants(input: &[NodeRecord], outcome: &SortOutcome) {
    let distinct: HashSet<NodeId> = input.iter().map(|r| r.id).collect();
    let emitted: HashSet<NodeId> = outcome.ordered_ids.iter().copied().collect();

    assert_eq!(
        emitted.len(),
        outcome.ordered_ids.len(),
        "an id was emitted twice: {:?}",
        outcome.ordered_ids
    );
    assert_eq!(emitted, distinct, "emitted ids differ from input ids");
    assert_eq!(
        outcome.levels.len(),
        outcome.ordered_ids.len(),
        "levels and ordered_ids disagree"
    );
    for id in &outcome.ordered_ids {
        assert!(outcome.levels.contains_key(id), "no level for {}", id);
    }
    for record in input.iter().filter(|r| r.parent_id == ROOT) {
        assert_eq!(outcome.level_of(record.id), Some(0), "top-level {} not at 0", record.id);
    }
}
