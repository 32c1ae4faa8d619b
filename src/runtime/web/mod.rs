//! Browser runtime: the page abstraction backed by `web-sys`.

use crate::dom::{Document, Element, ImageCompletion, ImageOutcome};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, HtmlImageElement};

/// The window's current document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn find_one(&self, selector: &str) -> Option<WebElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(WebElement)
    }

    fn get_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }
}

#[derive(Debug, Clone)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    /// Registers a one-time `event` listener settling `completion` with `outcome`.
    ///
    /// A listener that cannot be registered settles the load as failed, so the
    /// container still ends up marked.
    fn listen_once(&self, event: &str, completion: ImageCompletion, outcome: ImageOutcome) {
        let settle = completion.clone();
        let callback = Closure::once_into_js(move || {
            settle.settle(outcome);
        });
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if let Err(err) = self
            .0
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.unchecked_ref(),
                &options,
            )
        {
            warn!(event, error = ?err, "failed to register image listener");
            completion.settle(ImageOutcome::Failed);
        }
    }
}

impl Element for WebElement {
    fn closest(&self, selector: &str) -> Option<Self> {
        self.0.closest(selector).ok().flatten().map(WebElement)
    }

    fn add_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().add_1(class) {
            warn!(class, error = ?err, "failed to add class");
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_image_source(&self, url: &str, completion: ImageCompletion) {
        self.listen_once("load", completion.clone(), ImageOutcome::Loaded);
        self.listen_once("error", completion.clone(), ImageOutcome::Failed);

        match self.0.dyn_ref::<HtmlImageElement>() {
            Some(image) => image.set_src(url),
            None => {
                if let Err(err) = self.0.set_attribute("src", url) {
                    warn!(url, error = ?err, "failed to assign image source");
                    completion.settle(ImageOutcome::Failed);
                }
            }
        }
    }
}
