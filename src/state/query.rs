use super::AppContext;
use crate::api::{ApiClient, ApiResult};
use crate::cache::{CacheStore, QueryName};
use crate::models::NameRecord;
use crate::sync::{FetchMarker, SyncError};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{debug, warn};

/// Keyed read of one name query: `{loading, data, error}`.
///
/// Data lives in the shared cache so that writes from other cards (invalidation, the hybrid
/// flip) show up here. A fetch starts when the key changes or the query is invalidated.
#[derive(Clone, Copy)]
pub(crate) struct QueryBinding {
    pub name: QueryName,
    pub key: Signal<String>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<SyncError>>,
    pub marker: RwSignal<FetchMarker>,
    cache: RwSignal<CacheStore>,
}

impl QueryBinding {
    /// Last fetched record for the current key, if any.
    pub fn data(&self) -> Option<NameRecord> {
        let key = self.key.get();
        self.cache.with(|c| c.get(self.name, &key).cloned())
    }

    /// True once this binding fetched the current key since moving to it (even with no
    /// record). Entries cached on an earlier visit do not count.
    pub fn fresh(&self) -> bool {
        let key = self.key.get();
        self.marker.with(|m| m.is_fresh(&key))
    }

    /// A fetch is in flight and nothing fresh is shown for the current key yet.
    pub fn awaiting_first_load(&self) -> bool {
        self.loading.get() && !self.fresh()
    }
}

async fn fetch(api_client: &ApiClient, name: QueryName, wfo: &str) -> ApiResult<Option<NameRecord>> {
    match name {
        QueryName::NameAuthors => api_client.get_name_authors(wfo).await,
        QueryName::HybridStatus => api_client.get_hybrid_status(wfo).await,
        // Remaining queries belong to other panels; their records share the header shape.
        QueryName::HeaderInfo | QueryName::IpniDifferences | QueryName::Children => {
            api_client.get_header_info(wfo).await
        }
    }
}

pub(crate) fn use_name_query(name: QueryName, key: Signal<String>) -> QueryBinding {
    let AppContext(app) = expect_context::<AppContext>();
    let loading = RwSignal::new(false);
    let error: RwSignal<Option<SyncError>> = RwSignal::new(None);
    let request_id: RwSignal<u64> = RwSignal::new(0);
    let marker: RwSignal<FetchMarker> = RwSignal::new(FetchMarker::new());

    let epochs = app.epochs;
    let epoch = Memo::new(move |_| epochs.with(|e| e.get(name)));

    let cache = app.cache;
    let api_client = app.api_client;
    Effect::new(move |_| {
        let wfo = key.get();
        let epoch = epoch.get();
        if wfo.trim().is_empty() {
            return;
        }

        // Request id for stale-response protection.
        let rid = request_id.get_untracked().saturating_add(1);
        request_id.set(rid);
        loading.set(true);
        marker.update(|m| m.retarget(&wfo));

        debug!(query = %name, wfo = %wfo, epoch, "fetching");
        let client = api_client.get_untracked();
        spawn_local(async move {
            let result = fetch(&client, name, &wfo).await;

            // Ignore stale responses (and responses for an unmounted card).
            if request_id.try_get_untracked() != Some(rid) {
                debug!(query = %name, wfo = %wfo, "ignoring stale query response");
                return;
            }

            match result {
                Ok(record) => {
                    cache.update(|c| c.store(name, &wfo, record));
                    marker.update(|m| {
                        m.mark_fetched(&wfo);
                    });
                    error.set(None);
                }
                Err(e) => {
                    warn!(query = %name, wfo = %wfo, error = %e, "query failed");
                    error.set(Some(SyncError::fetch(&e)));
                }
            }
            loading.set(false);
        });
    });

    QueryBinding {
        name,
        key,
        loading,
        error,
        marker,
        cache,
    }
}
