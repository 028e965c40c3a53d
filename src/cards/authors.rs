use super::UpdateAlert;
use crate::cache::{CacheStore, QueryName, AUTHORS_DEPENDENTS};
use crate::components::ui::{
    Button, ButtonVariant, Card, CardContent, CardHeader, Input, Spinner, Tooltip,
    TooltipContent,
};
use crate::models::UpdateResponse;
use crate::state::{use_name_query, AppContext};
use crate::sync::{
    authors_visibility, submit_visible, CommandTicket, CommandTracker, Completion, EditBuffer,
    FetchMarker, SyncError,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{debug, info};

/// Feed the buffer from the cached author record, once this key has been fetched since the
/// card moved to it.
fn load_buffer(
    buffer: &mut EditBuffer<String>,
    marker: &FetchMarker,
    cache: &CacheStore,
    key: &str,
) {
    if !marker.is_fresh(key) {
        return;
    }
    let authoritative = cache
        .get(QueryName::NameAuthors, key)
        .and_then(|r| r.authors_string.clone());
    buffer.on_loaded(key, authoritative);
}

/// Apply a finished author update. A success makes the submitted value authoritative so the
/// buffer is clean before the refetch lands.
fn settle_submit(
    buffer: &mut EditBuffer<String>,
    tracker: &mut CommandTracker,
    ticket: &CommandTicket,
    submitted: String,
    result: Result<UpdateResponse, SyncError>,
) -> Completion {
    let completion = tracker.complete(ticket, buffer.bound_key(), result);
    if completion == Completion::Succeeded {
        buffer.on_authoritative(&ticket.key, Some(submitted));
    }
    completion
}

fn status_line(awaiting_load: bool, error: Option<&SyncError>) -> Option<String> {
    if awaiting_load {
        return Some("Loading name...".to_string());
    }
    error.map(|e| e.to_string())
}

/// Author-string card: a text field bound to `authorsString`, an "Update" button shown only
/// while the field differs from the server value, and the result of the last update.
///
/// `on_validate` receives `(authors_string, wfo)` for the external author validator.
#[component]
pub fn CardNameAuthors(
    #[prop(into)] wfo: Signal<String>,
    #[prop(optional, into)] on_validate: Option<Callback<(String, String)>>,
) -> impl IntoView {
    let AppContext(app) = expect_context::<AppContext>();
    let query = use_name_query(QueryName::NameAuthors, wfo);

    let buffer: RwSignal<EditBuffer<String>> = RwSignal::new(EditBuffer::new());
    let tracker: RwSignal<CommandTracker> = RwSignal::new(CommandTracker::new());

    // Key transitions: drop the old buffer and anything still in flight for the old key.
    Effect::new(move |prev: Option<String>| {
        let key = wfo.get();
        if prev.is_some_and(|p| p != key) {
            debug!(wfo = %key, "author card retargeted");
            buffer.update(|b| b.on_target_changed(&key));
            tracker.update(|t| t.reset());
        }
        key
    });

    // First fresh load binds the buffer; later refetches only move the authoritative side.
    let cache = app.cache;
    Effect::new(move |_| {
        let key = wfo.get();
        query
            .marker
            .with(|m| cache.with(|c| buffer.update(|b| load_buffer(b, m, c, &key))));
    });

    let visibility = Memo::new(move |_| authors_visibility(query.data().as_ref()));
    let editable = move || visibility.get().is_editable();
    let bound = move || buffer.with(|b| b.is_bound_to(&wfo.get()));

    let show_submit = move || {
        let dirty = buffer.with(|b| b.is_dirty());
        editable() && tracker.with(|t| submit_visible(dirty, t))
    };

    let submit = move || {
        let key = wfo.get_untracked();
        if key.trim().is_empty() || !buffer.with_untracked(|b| b.is_bound_to(&key)) {
            return;
        }
        let value = buffer.with_untracked(|b| b.value().clone());

        let mut ticket = None;
        tracker.update(|t| ticket = t.begin(&key));
        let Some(ticket) = ticket else {
            debug!(wfo = %key, "author update already pending");
            return;
        };

        info!(wfo = %key, authors = %value, "updating author string");
        let api_client = app.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client
                .update_authors_string(&ticket.key, &value)
                .await
                .map_err(|e| SyncError::command(&e));

            let mut completion = Completion::Stale;
            let settled = buffer.try_update(|b| {
                tracker.update(|t| completion = settle_submit(b, t, &ticket, value, result))
            });
            // Card unmounted while the command was in flight.
            if settled.is_none() {
                return;
            }
            match completion {
                Completion::Succeeded => app.invalidate(AUTHORS_DEPENDENTS),
                Completion::Stale => {
                    debug!(wfo = %ticket.key, "discarding author update response for abandoned key")
                }
                Completion::Rejected | Completion::Superseded => {}
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit();
    };

    let validate_button = move || {
        on_validate.map(|cb| {
            view! {
                <Button
                    variant=ButtonVariant::Outline
                    attr:r#type="button"
                    on:click=move |_| {
                        let (value, key) = buffer.with_untracked(|b| {
                            (b.value().clone(), b.bound_key().unwrap_or_default().to_string())
                        });
                        cb.run((value, key));
                    }
                >
                    "Validate"
                </Button>
            }
        })
    };

    view! {
        <form on:submit=on_submit>
            <Card>
                <CardHeader class="bg-secondary text-secondary-foreground py-2">
                    <Tooltip>
                        <span>"Author String"</span>
                        <TooltipContent>
                            "The names of the authors using standardized abbreviations where possible."
                        </TooltipContent>
                    </Tooltip>
                </CardHeader>
                <CardContent>
                    <div class="flex items-center gap-2">
                        <Input
                            id="authors"
                            name="authorsString"
                            placeholder="Abbreviated author names"
                            disabled=Signal::derive(move || !editable() || !bound())
                            value=Signal::derive(move || buffer.with(|b| b.value().clone()))
                            on_value=Callback::new(move |v: String| buffer.update(|b| b.on_user_edit(v)))
                        />
                        {validate_button}
                    </div>

                    {move || {
                        let awaiting = query.awaiting_first_load();
                        status_line(awaiting, query.error.get().as_ref()).map(|text| {
                            let tone = if awaiting { "text-muted-foreground" } else { "text-destructive" };
                            view! {
                                <div class=format!("mt-2 inline-flex items-center gap-2 text-xs {tone}")>
                                    {awaiting.then(|| view! { <Spinner /> })}
                                    {text}
                                </div>
                            }
                        })
                    }}

                    <UpdateAlert
                        report=Signal::derive(move || tracker.with(|t| t.report().cloned()))
                        pending=Signal::derive(move || tracker.with(|t| t.is_pending()))
                        on_dismiss=Callback::new(move |_| tracker.update(|t| t.dismiss()))
                    />

                    <Show when=show_submit fallback=|| ().into_view()>
                        <div class="mt-4 flex justify-end">
                            <Button attr:r#type="submit">"Update"</Button>
                        </div>
                    </Show>
                </CardContent>
            </Card>
        </form>
    }
}
