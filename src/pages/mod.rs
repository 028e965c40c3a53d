use crate::cards::{CardFormHeader, CardNameAuthors, CardTaxonHybridStatus};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    Input, Label,
};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use leptos_router::params::Params;
use tracing::info;

/// Trimmed wfo id from free text, `None` if nothing usable was typed.
fn normalize_wfo(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let wfo: RwSignal<String> = RwSignal::new(String::new());
    let token: RwSignal<String> = RwSignal::new(String::new());
    let authenticated = Signal::derive(move || app_state.0.api_client.with(|c| c.is_authenticated()));

    let on_open = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Some(id) = normalize_wfo(&wfo.get_untracked()) {
            navigate.with_value(|nav| nav(&format!("/name/{id}"), Default::default()));
        }
    };

    let on_save_token = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = token.get_untracked();
        if value.trim().is_empty() {
            return;
        }
        app_state.0.api_client.update(|c| {
            c.set_token(value.trim().to_string());
            c.save_to_storage();
        });
        token.set(String::new());
        info!("api token stored");
    };

    let on_logout = move |_| {
        app_state.0.api_client.update(|c| c.logout());
        info!("api token cleared");
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex w-full max-w-md flex-col gap-4 px-4 py-10">
                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Open a name"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_open>
                            <Label html_for="wfo" class="text-xs">"WFO ID"</Label>
                            <Input
                                id="wfo"
                                placeholder="wfo-0000000000"
                                class="h-8 text-sm"
                                value=wfo
                                on_value=Callback::new(move |v: String| wfo.set(v))
                            />
                            <Button class="w-full" size=ButtonSize::Sm attr:r#type="submit">"Open"</Button>
                        </form>
                    </CardContent>
                </Card>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"API token"</CardTitle>
                        <CardDescription class="text-xs">
                            {move || if authenticated.get() {
                                "A token is stored; edits are sent with it."
                            } else {
                                "Without a token every card is read-only."
                            }}
                        </CardDescription>
                    </CardHeader>
                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_save_token>
                            <Input
                                id="token"
                                r#type="password"
                                placeholder="Bearer token"
                                class="h-8 text-sm"
                                value=token
                                on_value=Callback::new(move |v: String| token.set(v))
                            />
                            <div class="flex gap-2">
                                <Button size=ButtonSize::Sm attr:r#type="submit">"Save"</Button>
                                <Show when=move || authenticated.get() fallback=|| ().into_view()>
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:r#type="button"
                                        on:click=on_logout
                                    >
                                        "Forget token"
                                    </Button>
                                </Show>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NameRouteParams {
    pub wfo: Option<String>,
}

/// All cards for one name. Navigating between names keeps the cards mounted and rebinds them.
#[component]
pub fn NamePage() -> impl IntoView {
    let params = leptos_router::hooks::use_params::<NameRouteParams>();

    // Use closures so params access happens inside a reactive tracking context.
    let wfo = Signal::derive(move || {
        params
            .get()
            .ok()
            .and_then(|p| p.wfo)
            .and_then(|w| normalize_wfo(&w))
            .unwrap_or_default()
    });

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex w-full max-w-2xl flex-col px-4 py-6">
                <div class="mb-4 text-xs">
                    <a href="/" class="text-muted-foreground underline underline-offset-4">"Home"</a>
                </div>
                <CardFormHeader wfo=wfo />
                <CardNameAuthors wfo=wfo />
                <CardTaxonHybridStatus wfo=wfo />
            </div>
        </div>
    }
}
