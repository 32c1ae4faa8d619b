//! Native stand-in for the browser's image fetch.
//!
//! After the loader assigns a source, the probe requests that URL and settles
//! the element's pending load: success when the server answers with an image,
//! failure otherwise. Relative sources resolve against the descriptor
//! endpoint, the way a browser resolves them against the page.

use super::memory::MemoryElement;
use crate::dom::ImageOutcome;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ImageProbe {
    client: reqwest::Client,
}

impl ImageProbe {
    pub fn new() -> anyhow::Result<Self> {
        Self::from_builder(reqwest::Client::builder())
    }

    pub fn from_builder(builder: reqwest::ClientBuilder) -> anyhow::Result<Self> {
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Requests `url`, resolved against `base`, and reports whether it rendered as an image.
    pub async fn check(&self, base: &str, url: &str) -> ImageOutcome {
        let resolved = match Url::parse(base).and_then(|base| base.join(url)) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(base, url, error = %err, "cannot resolve image url");
                return ImageOutcome::Failed;
            }
        };

        let response = match self.client.get(resolved.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %resolved, error = %err, "image request failed");
                return ImageOutcome::Failed;
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        debug!(
            url = %resolved,
            %status,
            content_type = content_type.as_str(),
            "image response"
        );

        if status.is_success() && is_image_content_type(&content_type) {
            ImageOutcome::Loaded
        } else {
            ImageOutcome::Failed
        }
    }

    /// Settles the pending load on `element`, if there is one.
    pub async fn settle(&self, base: &str, element: &MemoryElement) -> Option<ImageOutcome> {
        if !element.image_pending() {
            return None;
        }
        let url = element.source()?;
        let outcome = self.check(base, &url).await;
        element.finish_image(outcome);
        Some(outcome)
    }
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}
