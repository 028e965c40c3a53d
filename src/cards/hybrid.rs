use super::UpdateAlert;
use crate::cache::{QueryName, HYBRID_DEPENDENTS};
use crate::components::ui::{Card, CardContent, CardHeader, Checkbox, Tooltip, TooltipContent};
use crate::state::{use_name_query, AppContext};
use crate::sync::{hybrid_visibility, Completion, OptimisticToggle, SyncError, ToggleCache};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{debug, info, warn};

fn hybrid_label(pending: bool, checked: bool) -> &'static str {
    if pending {
        " Updating... "
    } else if checked {
        "Uncheck the box to make this a regular taxon."
    } else {
        "Check the box to make this a hybrid taxon."
    }
}

/// Hybrid flag of an accepted taxon. The checkbox flips the cached value immediately and
/// rolls it back if the server refuses.
#[component]
pub fn CardTaxonHybridStatus(#[prop(into)] wfo: Signal<String>) -> impl IntoView {
    let AppContext(app) = expect_context::<AppContext>();
    let query = use_name_query(QueryName::HybridStatus, wfo);
    let toggle: RwSignal<OptimisticToggle> = RwSignal::new(OptimisticToggle::new());
    let cache = app.cache;

    Effect::new(move |_| {
        let key = wfo.get();
        toggle.update(|t| t.bind(&key));
    });

    let visible = Memo::new(move |_| hybrid_visibility(query.data().as_ref()).is_editable());
    let placement_id = Memo::new(move |_| {
        query
            .data()
            .and_then(|r| r.taxon_placement)
            .map(|p| p.id)
    });

    let checked = Signal::derive(move || {
        placement_id
            .get()
            .and_then(|pid| cache.with(|c| c.hybrid_flag(&pid)))
            .unwrap_or(false)
    });
    let pending = Signal::derive(move || toggle.with(|t| t.is_pending()));

    let on_toggle = move |_requested: bool| {
        let key = wfo.get_untracked();
        let Some(pid) = placement_id.get_untracked() else {
            return;
        };
        let Some(numeric_id) = untrack(|| query.data())
            .and_then(|r| r.taxon_placement)
            .and_then(|p| p.numeric_id())
        else {
            warn!(placement = %pid, "placement id is not numeric; hybrid update skipped");
            return;
        };

        let mut intent = None;
        cache.update(|c| toggle.update(|t| intent = t.toggle(c, &key, &pid)));
        let Some(intent) = intent else {
            debug!(placement = %pid, "placement not cached; nothing to toggle");
            return;
        };

        info!(wfo = %key, placement = %pid, hybrid = intent.after, "updating hybrid status");
        let api_client = app.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client
                .update_hybrid_status(numeric_id, intent.after)
                .await
                .map_err(|e| SyncError::command(&e));

            // Card unmounted while the command was in flight.
            let Some(current_key) = wfo.try_get_untracked() else {
                return;
            };

            let mut completion = Completion::Stale;
            cache.update(|c| {
                toggle.update(|t| completion = t.complete(c, &intent, &current_key, result))
            });
            if completion == Completion::Succeeded {
                app.invalidate(HYBRID_DEPENDENTS);
            }
        });
    };

    let label = Signal::derive(move || hybrid_label(pending.get(), checked.get()).to_string());

    view! {
        <Show when=move || visible.get() fallback=|| ().into_view()>
            <Card>
                <CardHeader class="bg-secondary text-secondary-foreground py-2">
                    <Tooltip>
                        <span>"Hybrid Status"</span>
                        <TooltipContent>"A flag to indicate that this taxon is of hybrid origin."</TooltipContent>
                    </Tooltip>
                </CardHeader>
                <CardContent>
                    <Checkbox id="isHybrid" checked=checked on_toggle=Callback::new(on_toggle) label=label />
                    <UpdateAlert
                        report=Signal::derive(move || toggle.with(|t| t.report().cloned()))
                        pending=Signal::derive(|| false)
                        on_dismiss=Callback::new(move |_| toggle.update(|t| t.dismiss()))
                    />
                </CardContent>
            </Card>
        </Show>
    }
}
