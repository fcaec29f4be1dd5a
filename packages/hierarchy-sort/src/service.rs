//! Request-level entry point: eligibility, record fetch, hooks, caching

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ancestry::AncestorLookup;
use crate::cache::CachedLookup;
use crate::config::SortConfig;
use crate::domain::{NodeRecord, SortOutcome};
use crate::error::{HierarchyError, Result};
use crate::hooks::SortHooks;
use crate::sorter::HierarchySorter;
use crate::store::{RecordQuery, RecordSource};

/// Caller request asking for hierarchy ordering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(default)]
    pub orderby_hierarchy: bool,
    #[serde(default)]
    pub query: RecordQuery,
}

impl SortRequest {
    pub fn hierarchical(query: RecordQuery) -> Self {
        Self {
            orderby_hierarchy: true,
            query,
        }
    }
}

/// Configured hierarchical sort with its extension points
#[derive(Debug, Default)]
pub struct HierarchicalSort {
    config: SortConfig,
    hooks: SortHooks,
}

impl HierarchicalSort {
    pub fn new(config: SortConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hooks: SortHooks::default(),
        })
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn hooks(&self) -> &SortHooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut SortHooks {
        &mut self.hooks
    }

    /// True only when the request explicitly asks for hierarchy ordering
    pub fn is_eligible(request: &SortRequest) -> bool {
        request.orderby_hierarchy
    }

    /// Fetch every record matching the request and sort it
    ///
    /// The store doubles as the ancestor lookup for orphan subtrees.
    pub fn run<S>(&self, request: &SortRequest, store: &S) -> Result<SortOutcome>
    where
        S: RecordSource + AncestorLookup,
    {
        if !Self::is_eligible(request) {
            return Err(HierarchyError::NotEligible);
        }

        info!("hierarchical sort: query {:?}", request.query);
        let records = store.hierarchy_records(&request.query)?;
        let outcome = self.sort_records(records, store)?;
        info!("hierarchical sort: {} ids ordered", outcome.len());

        Ok(outcome)
    }

    /// Apply the `records` hooks, sort, then apply the `outcome` hooks
    pub fn sort_records<L>(&self, records: Vec<NodeRecord>, lookup: &L) -> Result<SortOutcome>
    where
        L: AncestorLookup + ?Sized,
    {
        let records = self.hooks.records.apply(records);

        let outcome = if self.config.cache_lookups {
            let cached = CachedLookup::new(lookup, self.config.lookup_cache_capacity);
            let outcome = self.sorter(&cached).sort(&records)?;
            if !cached.is_empty() {
                debug!(
                    "sort_records: {} ancestor lookups cached, hit rate {:.2}",
                    cached.len(),
                    cached.hit_rate()
                );
            }
            outcome
        } else {
            self.sorter(lookup).sort(&records)?
        };

        Ok(self.hooks.outcome.apply(outcome))
    }

    fn sorter<'a, L>(&self, lookup: &'a L) -> HierarchySorter<'a, L>
    where
        L: AncestorLookup + ?Sized,
    {
        HierarchySorter::new(lookup).max_ancestor_depth(self.config.max_ancestor_depth)
    }
}
