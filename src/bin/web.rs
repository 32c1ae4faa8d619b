#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, unused_imports, unused_variables)
)]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("pichunt-loader-web must be built for wasm32-unknown-unknown");
}

// ---------------------------------------------------------------------------
// Web target (wasm32) — everything below is only compiled for the browser.
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
use js_sys::Promise;
#[cfg(target_arch = "wasm32")]
use pichunt_loader::runtime::web::WebDocument;
#[cfg(target_arch = "wasm32")]
use pichunt_loader::source::HttpSource;
#[cfg(target_arch = "wasm32")]
use pichunt_loader::{ImageLoader, LoadOptions, logging};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::future_to_promise;

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    logging::init("info");
}

/// Loads the image described by the JSON at `endpoint_url` into the element
/// matching `target_selector`. The returned promise always resolves.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = loadImageFromJson)]
pub fn load_image_from_json(
    endpoint_url: String,
    target_selector: String,
    url_field_name: Option<String>,
    hide_on_error: Option<bool>,
    difficulty_display_id: Option<String>,
) -> Promise {
    let mut options = LoadOptions::default().hide_on_error(hide_on_error.unwrap_or(false));
    if let Some(field) = url_field_name.filter(|f| !f.is_empty()) {
        options = options.with_url_field(field);
    }
    if let Some(id) = difficulty_display_id.filter(|id| !id.is_empty()) {
        options = options.with_difficulty_display(id);
    }

    future_to_promise(async move {
        let Some(document) = WebDocument::current() else {
            tracing::error!("no document available");
            return Ok(JsValue::UNDEFINED);
        };
        let source = match HttpSource::new() {
            Ok(source) => source,
            Err(err) => {
                tracing::error!(error = %err, "failed to build HTTP client");
                return Ok(JsValue::UNDEFINED);
            }
        };

        ImageLoader::new(document, source)
            .load_image(&endpoint_url, &target_selector, &options)
            .await;
        Ok(JsValue::UNDEFINED)
    })
}
