use crate::cache::QueryName;
use crate::components::ui::{Card, CardHeader, CardTitle};
use crate::header::{headline, CardHeader as HeaderKind, Headline};
use crate::state::use_name_query;
use leptos::prelude::*;

/// Name card heading: the rank/status label over the formatted full name.
#[component]
pub fn CardFormHeader(#[prop(into)] wfo: Signal<String>) -> impl IntoView {
    let query = use_name_query(QueryName::HeaderInfo, wfo);

    let label = Memo::new(move |_| HeaderKind::from_record(query.data().as_ref()).label());
    let title = move || match headline(query.data().as_ref()) {
        Headline::Markup(markup) => view! { <span inner_html=markup></span> }.into_any(),
        Headline::NoName => view! { <span>"No Name"</span> }.into_any(),
    };

    view! {
        <Card>
            {move || label.get().map(|text| view! {
                <CardHeader class="bg-primary text-primary-foreground py-2">{text}</CardHeader>
            })}
            <CardTitle class="px-6 py-4 text-xl">{title}</CardTitle>
        </Card>
    }
}
