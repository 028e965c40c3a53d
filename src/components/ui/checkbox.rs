use leptos::prelude::*;
use tw_merge::tw_merge;

/// Checkbox with an inline label. `checked` is controlled by the caller; clicks are reported
/// through `on_toggle` and the box re-renders from `checked`.
///
/// The browser flips the box before `on_toggle` runs. If the caller leaves `checked` as it was,
/// the DOM state is put back so the box never shows a value nobody accepted.
#[component]
pub fn Checkbox(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into)] checked: Signal<bool>,
    #[prop(into)] on_toggle: Callback<bool>,
    #[prop(into)] label: Signal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "size-4 shrink-0 rounded-[4px] border border-input shadow-xs accent-primary outline-none focus-visible:ring-2 focus-visible:ring-ring/50 hover:cursor-pointer",
        class
    );

    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        on_toggle.run(input.checked());
        input.set_checked(checked.get_untracked());
    };

    let label_for = id.clone();

    view! {
        <label data-name="Checkbox" class="flex items-center gap-2 text-sm leading-none select-none" r#for=label_for>
            <input
                type="checkbox"
                id=id
                class=merged_class
                prop:checked=move || checked.get()
                on:change=on_change
            />
            <span>{move || label.get()}</span>
        </label>
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_checkbox(id: &'static str, state: RwSignal<bool>, accept: bool) -> web_sys::HtmlInputElement {
        let document = document();
        let host: web_sys::HtmlElement = document
            .create_element("div")
            .expect("create host")
            .unchecked_into();
        document.body().expect("body").append_child(&host).expect("append host");

        let handle = leptos::mount::mount_to(host, move || {
            view! {
                <Checkbox
                    id=id
                    checked=state
                    on_toggle=Callback::new(move |v: bool| {
                        if accept {
                            state.set(v);
                        }
                    })
                    label=Signal::derive(|| "Hybrid".to_string())
                />
            }
        });
        handle.forget();

        document
            .get_element_by_id(id)
            .expect("checkbox rendered")
            .unchecked_into()
    }

    #[wasm_bindgen_test]
    fn test_refused_toggle_restores_dom_state() {
        let state = RwSignal::new(false);
        let input = mount_checkbox("refused-toggle", state, false);
        input.click();
        assert!(!input.checked());
        assert!(!state.get_untracked());
    }

    #[wasm_bindgen_test]
    fn test_accepted_toggle_keeps_dom_state() {
        let state = RwSignal::new(false);
        let input = mount_checkbox("accepted-toggle", state, true);
        input.click();
        assert!(input.checked());
        assert!(state.get_untracked());
    }
}
