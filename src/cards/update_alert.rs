use crate::components::ui::{
    Alert, AlertDescription, AlertList, AlertTitle, Button, ButtonSize, ButtonVariant, Spinner,
};
use crate::models::ChildOutcome;
use crate::sync::CommandReport;
use leptos::prelude::*;

fn outcome_line(row: &ChildOutcome) -> String {
    let name = row.name.as_deref().unwrap_or("Update");
    match row.message.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(msg) => format!("{name}: {msg}"),
        None => name.to_string(),
    }
}

/// Message area for a card's last command: pending indicator while in flight, then the
/// primary result and every cascading child outcome until dismissed.
#[component]
pub fn UpdateAlert(
    #[prop(into)] report: Signal<Option<CommandReport>>,
    #[prop(into)] pending: Signal<bool>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || pending.get() fallback=|| ().into_view()>
            <div class="mt-3 inline-flex items-center gap-2 text-xs text-muted-foreground">
                <Spinner />
                "Updating..."
            </div>
        </Show>

        {move || {
            if pending.get() {
                return None;
            }
            report.get().and_then(|r| {
                let ok = r.is_success();
                let rows = r.rows();
                let (primary, children) = rows.split_first().map(|(p, c)| (p.clone(), c.to_vec()))?;
                let tone = if ok { "border-success/40" } else { "border-destructive/30 text-destructive" };

                Some(view! {
                    <Alert class=format!("mt-3 {tone}")>
                        <div class="flex items-start justify-between gap-2">
                            <div>
                                <AlertTitle>{if ok { "Updated" } else { "Update failed" }}</AlertTitle>
                                <AlertDescription>{outcome_line(&primary)}</AlertDescription>
                            </div>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Icon
                                attr:r#type="button"
                                attr:title="Dismiss"
                                on:click=move |_| on_dismiss.run(())
                            >
                                "×"
                            </Button>
                        </div>
                        {(!children.is_empty()).then(|| view! {
                            <AlertList>
                                {children
                                    .iter()
                                    .map(|c| {
                                        let cls = if c.success { "text-foreground" } else { "text-destructive" };
                                        view! { <li class=cls>{outcome_line(c)}</li> }
                                    })
                                    .collect_view()}
                            </AlertList>
                        })}
                    </Alert>
                })
            })
        }}
    }
}
