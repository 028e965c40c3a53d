use crate::pages::{HomePage, NamePage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Router hooks (`use_params`, `use_navigate`) require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("name/:wfo") view=NamePage />
                <Route path=path!("") view=HomePage />
            </Routes>
        </Router>
    }
}
