//! Loader configuration: container lookup and state marker class names.
use std::env;

/// Class names and selectors the loader uses when marking load state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Selector for the ancestor that carries the load state markers.
    pub container_selector: String,
    pub loaded_class: String,
    pub error_class: String,
    /// Applied to the target itself, not the container.
    pub hidden_class: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            container_selector: ".image-container".to_string(),
            loaded_class: "loaded".to_string(),
            error_class: "error".to_string(),
            hidden_class: "hidden".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PICHUNT_CONTAINER_SELECTOR` - container selector (default: `.image-container`)
    /// - `PICHUNT_LOADED_CLASS` - success marker (default: `loaded`)
    /// - `PICHUNT_ERROR_CLASS` - failure marker (default: `error`)
    /// - `PICHUNT_HIDDEN_CLASS` - hide marker (default: `hidden`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(selector) = read("PICHUNT_CONTAINER_SELECTOR") {
            config.container_selector = selector;
        }
        if let Some(class) = read("PICHUNT_LOADED_CLASS") {
            config.loaded_class = class;
        }
        if let Some(class) = read("PICHUNT_ERROR_CLASS") {
            config.error_class = class;
        }
        if let Some(class) = read("PICHUNT_HIDDEN_CLASS") {
            config.hidden_class = class;
        }

        config
    }
}
