//! pichunt-loader library: fetches image descriptors and applies them to a page.

pub mod config;
pub mod dom;
pub mod error;
pub mod loader;
pub mod logging;
pub mod model;
pub mod rating;
pub mod runtime;
pub mod source;

pub use loader::{ImageLoader, LoadOptions};
