mod query;

pub(crate) use query::{use_name_query, QueryBinding};

use crate::api::ApiClient;
use crate::cache::{CacheStore, QueryEpochs, QueryName};
use leptos::prelude::*;
use tracing::debug;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Name query results shared by all cards.
    pub cache: RwSignal<CacheStore>,

    /// Per-query invalidation counters (kept apart from `cache` so storing a result
    /// does not retrigger fetches).
    pub epochs: RwSignal<QueryEpochs>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::load_from_storage()),
            cache: RwSignal::new(CacheStore::default()),
            epochs: RwSignal::new(QueryEpochs::default()),
        }
    }

    /// Refetch every binding of the given queries.
    pub fn invalidate(&self, names: &[QueryName]) {
        debug!(queries = ?names, "invalidating queries");
        self.epochs.update(|e| e.invalidate(names));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
