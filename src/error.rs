//! Failures that can occur while loading an image descriptor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image element not found: {selector}")]
    TargetNotFound { selector: String },

    #[error("network error: HTTP {status}")]
    Http { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid descriptor body: {0}")]
    BodyParse(#[from] serde_json::Error),

    #[error("no image URL found in field `{field}`")]
    MissingUrlField { field: String },

    #[error("failed to load image: {url}")]
    ImageRender { url: String },
}

impl LoadError {
    /// Whether callers that opted into hiding should hide the target for this failure.
    pub fn hides_target(&self) -> bool {
        matches!(
            self,
            LoadError::Http { .. }
                | LoadError::MissingUrlField { .. }
                | LoadError::ImageRender { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::LoadError;

    #[test]
    fn only_status_field_and_render_failures_hide() {
        assert!(LoadError::Http { status: 404 }.hides_target());
        assert!(
            LoadError::MissingUrlField {
                field: "url".to_string()
            }
            .hides_target()
        );
        assert!(
            LoadError::ImageRender {
                url: "a.png".to_string()
            }
            .hides_target()
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!LoadError::BodyParse(parse).hides_target());
        assert!(
            !LoadError::TargetNotFound {
                selector: "#img".to_string()
            }
            .hides_target()
        );
    }

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            LoadError::Http { status: 503 }.to_string(),
            "network error: HTTP 503"
        );
        assert_eq!(
            LoadError::MissingUrlField {
                field: "image".to_string()
            }
            .to_string(),
            "no image URL found in field `image`"
        );
    }
}
