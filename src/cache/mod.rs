use crate::models::NameRecord;
use crate::sync::ToggleCache;
use std::collections::HashMap;

/// Logical queries that read a name record. The string form is the GraphQL operation name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub(crate) enum QueryName {
    #[strum(serialize = "getNameAuthors")]
    NameAuthors,
    #[strum(serialize = "getHybridStatus")]
    HybridStatus,
    #[strum(serialize = "getHeaderInfo")]
    HeaderInfo,
    #[strum(serialize = "getNameForIpniDifferences")]
    IpniDifferences,
    #[strum(serialize = "getChildren")]
    Children,
}

/// Queries whose results can change when the author string is written.
pub(crate) const AUTHORS_DEPENDENTS: &[QueryName] = &[
    QueryName::NameAuthors,
    QueryName::HeaderInfo,
    QueryName::IpniDifferences,
];

/// Queries refetched after a hybrid status write. `getHybridStatus` itself is kept
/// current by the optimistic flip.
pub(crate) const HYBRID_DEPENDENTS: &[QueryName] = &[QueryName::HeaderInfo, QueryName::Children];

/// Invalidation counters. Bumping a query's epoch makes every binding of it refetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct QueryEpochs(HashMap<QueryName, u64>);

impl QueryEpochs {
    pub fn get(&self, name: QueryName) -> u64 {
        self.0.get(&name).copied().unwrap_or(0)
    }

    pub fn invalidate(&mut self, names: &[QueryName]) {
        for name in names {
            let e = self.0.entry(*name).or_insert(0);
            *e = e.saturating_add(1);
        }
    }
}

/// Results of name queries, shared by every card looking at the same wfo id.
///
/// Writes are limited to storing fetched results and flipping `isHybrid` on a placement.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CacheStore {
    records: HashMap<(QueryName, String), Option<NameRecord>>,
}

impl CacheStore {
    pub fn get(&self, name: QueryName, wfo: &str) -> Option<&NameRecord> {
        self.records
            .get(&(name, wfo.to_string()))
            .and_then(|r| r.as_ref())
    }

    pub fn store(&mut self, name: QueryName, wfo: &str, record: Option<NameRecord>) {
        self.records.insert((name, wfo.to_string()), record);
    }
}

impl ToggleCache for CacheStore {
    fn hybrid_flag(&self, placement_id: &str) -> Option<bool> {
        self.records
            .values()
            .flatten()
            .filter_map(|r| r.taxon_placement.as_ref())
            .filter(|p| p.id == placement_id)
            .find_map(|p| p.is_hybrid)
    }

    /// Flips the flag on every cached copy of the placement that selected it,
    /// the way a normalized entity would be patched.
    fn flip_hybrid(&mut self, placement_id: &str) -> Option<bool> {
        let mut flipped = None;
        for flag in self
            .records
            .values_mut()
            .flatten()
            .filter_map(|r| r.taxon_placement.as_mut())
            .filter(|p| p.id == placement_id)
            .filter_map(|p| p.is_hybrid.as_mut())
        {
            *flag = !*flag;
            flipped = Some(*flag);
        }
        flipped
    }
}
