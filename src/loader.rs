//! The image loader: fetch a descriptor, assign its URL, mark the outcome.
//!
//! Each call to [`ImageLoader::load_image`] is a single linear pass:
//! Idle → Fetching → ImageLoading → Loaded | ImageError, or a failure after
//! fetching, parsing, or field extraction. Nothing is retried and no failure
//! escapes to the caller; every failure is logged and reflected as markers on
//! the page.

use crate::config::LoaderConfig;
use crate::dom::{Document, Element, ImageCompletion, ImageOutcome};
use crate::error::LoadError;
use crate::model::{DEFAULT_URL_FIELD, Descriptor, Difficulty};
use crate::rating::render_rating;
use crate::source::JsonSource;
use tracing::{debug, error, info};

/// Per-call options for [`ImageLoader::load_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Record field holding the image URL.
    pub url_field: String,
    /// Hide the target on HTTP, missing-field, and image render failures.
    pub hide_on_error: bool,
    /// Id of the element receiving the star rating, if any.
    pub difficulty_display_id: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            url_field: DEFAULT_URL_FIELD.to_string(),
            hide_on_error: false,
            difficulty_display_id: None,
        }
    }
}

impl LoadOptions {
    pub fn with_url_field(mut self, field: impl Into<String>) -> Self {
        self.url_field = field.into();
        self
    }

    pub fn hide_on_error(mut self, hide: bool) -> Self {
        self.hide_on_error = hide;
        self
    }

    pub fn with_difficulty_display(mut self, id: impl Into<String>) -> Self {
        self.difficulty_display_id = Some(id.into());
        self
    }
}

pub struct ImageLoader<D, S> {
    document: D,
    source: S,
    config: LoaderConfig,
}

impl<D, S> ImageLoader<D, S>
where
    D: Document,
    S: JsonSource,
{
    pub fn new(document: D, source: S) -> Self {
        Self {
            document,
            source,
            config: LoaderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the descriptor at `endpoint_url` into the element matching `target_selector`.
    ///
    /// Always completes. When the target is missing no request is made.
    pub async fn load_image(
        &self,
        endpoint_url: &str,
        target_selector: &str,
        options: &LoadOptions,
    ) {
        let Some(target) = self.document.find_one(target_selector) else {
            let err = LoadError::TargetNotFound {
                selector: target_selector.to_string(),
            };
            error!(error = %err, "image load aborted");
            return;
        };

        if let Err(err) = self.assign(endpoint_url, &target, options).await {
            error!(endpoint = endpoint_url, error = %err, "image load failed");
            if options.hide_on_error && err.hides_target() {
                target.add_class(&self.config.hidden_class);
            }
            container_of(&target, &self.config).add_class(&self.config.error_class);
        }
    }

    async fn assign(
        &self,
        endpoint_url: &str,
        target: &D::Element,
        options: &LoadOptions,
    ) -> Result<(), LoadError> {
        debug!(endpoint = endpoint_url, "fetching");
        let value = self.source.fetch_json(endpoint_url).await?;
        let record = Descriptor::from(value).normalize(&options.url_field);
        info!(
            id = record.details.id,
            realm = record.details.realm.as_deref(),
            area = record.details.area.as_deref(),
            location = record.details.location.as_deref(),
            appeared = record.details.appeared.as_deref(),
            tier = record.tier().map(Difficulty::as_str),
            "descriptor resolved"
        );

        if let Some(display_id) = options.difficulty_display_id.as_deref() {
            let rating = render_rating(record.difficulty);
            match self.document.get_by_id(display_id) {
                Some(display) => display.set_text(&rating),
                None => debug!(id = display_id, "difficulty display not found"),
            }
        }

        let url = record.url.ok_or_else(|| LoadError::MissingUrlField {
            field: options.url_field.clone(),
        })?;

        let completion = self.completion_for(target, &url, options.hide_on_error);
        debug!(url = url.as_str(), "image loading");
        target.set_image_source(&url, completion);
        Ok(())
    }

    fn completion_for(
        &self,
        target: &D::Element,
        url: &str,
        hide_on_error: bool,
    ) -> ImageCompletion {
        let container = container_of(target, &self.config);
        let target = target.clone();
        let config = self.config.clone();
        let url = url.to_string();

        ImageCompletion::new(move |outcome| match outcome {
            ImageOutcome::Loaded => {
                debug!(url = url.as_str(), "image loaded");
                container.add_class(&config.loaded_class);
            }
            ImageOutcome::Failed => {
                let err = LoadError::ImageRender { url };
                error!(error = %err, "image render failed");
                container.add_class(&config.error_class);
                if hide_on_error {
                    target.add_class(&config.hidden_class);
                }
            }
        })
    }
}

/// The element carrying load state: the nearest container, else the target itself.
fn container_of<E: Element>(target: &E, config: &LoaderConfig) -> E {
    target
        .closest(&config.container_selector)
        .unwrap_or_else(|| target.clone())
}
