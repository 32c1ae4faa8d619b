//! Page access abstraction shared by the loader and its runtimes.
//!
//! The loader never touches a concrete document. Runtimes implement
//! [`Document`] and [`Element`] for their own page model: the browser DOM on
//! the web, an in-memory tree natively.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Read-only lookups into a page.
pub trait Document {
    type Element: Element;

    /// First element matching `selector`.
    fn find_one(&self, selector: &str) -> Option<Self::Element>;

    fn get_by_id(&self, id: &str) -> Option<Self::Element>;
}

/// Mutations the loader performs on a page element.
pub trait Element: Clone + 'static {
    /// Nearest element matching `selector`, starting with the element itself.
    fn closest(&self, selector: &str) -> Option<Self>;

    /// Adds a class; adding one already present is a no-op.
    fn add_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    fn set_text(&self, text: &str);

    /// Registers `completion` for the next image load, then assigns `url` as
    /// the image source. The runtime settles the completion once the image has
    /// either rendered or failed.
    fn set_image_source(&self, url: &str, completion: ImageCompletion);
}

/// How an assigned image source ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Loaded,
    Failed,
}

type CompletionFn = Box<dyn FnOnce(ImageOutcome)>;

/// One-shot completion handler for an image source assignment.
///
/// Clones share the same callback; whichever clone settles first runs it and
/// every later settle is ignored.
#[derive(Clone)]
pub struct ImageCompletion {
    callback: Rc<RefCell<Option<CompletionFn>>>,
}

impl ImageCompletion {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(ImageOutcome) + 'static,
    {
        Self {
            callback: Rc::new(RefCell::new(Some(Box::new(callback)))),
        }
    }

    /// Runs the callback with `outcome`. Returns `false` if already settled.
    pub fn settle(&self, outcome: ImageOutcome) -> bool {
        let callback = self.callback.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback(outcome);
                true
            }
            None => false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.callback.borrow().is_none()
    }
}

impl fmt::Debug for ImageCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCompletion")
            .field("settled", &self.is_settled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageCompletion, ImageOutcome};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn settles_exactly_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let completion = {
            let seen = seen.clone();
            ImageCompletion::new(move |outcome| seen.borrow_mut().push(outcome))
        };
        let other = completion.clone();

        assert!(!completion.is_settled());
        assert!(other.settle(ImageOutcome::Failed));
        assert!(!completion.settle(ImageOutcome::Loaded));
        assert!(completion.is_settled());
        assert_eq!(*seen.borrow(), vec![ImageOutcome::Failed]);
    }

    #[test]
    fn failure_settled_at_registration_blocks_later_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let completion = {
            let seen = seen.clone();
            ImageCompletion::new(move |outcome| seen.borrow_mut().push(outcome))
        };
        let load_listener = completion.clone();
        let error_listener = completion.clone();

        // Registration of the error listener failed; the load is settled directly.
        assert!(completion.settle(ImageOutcome::Failed));
        assert!(!load_listener.settle(ImageOutcome::Loaded));
        assert!(!error_listener.settle(ImageOutcome::Failed));
        assert_eq!(*seen.borrow(), vec![ImageOutcome::Failed]);
    }
}
