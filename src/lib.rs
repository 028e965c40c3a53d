//! Name-curation cards for the WFO Plant List editor: author string, hybrid status and the
//! name header, each kept in sync with the GraphQL backend.

mod api;
mod app;
mod cache;
mod cards;
mod components;
mod header;
mod models;
mod pages;
mod state;
mod storage;
mod sync;

pub use app::App;
pub use cards::{CardFormHeader, CardNameAuthors, CardTaxonHybridStatus};

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
    mount_to_body(App);
}
