//! Shared data model types used by both native and web runtimes.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Name of the record field holding the image URL unless the caller overrides it.
pub const DEFAULT_URL_FIELD: &str = "url";

/// The JSON payload returned by an image endpoint.
///
/// Endpoints answer either with a single record or with a list whose first
/// element is the record. Anything else carries no record at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Descriptor {
    Batch(Vec<Value>),
    Record(Map<String, Value>),
    Other(Value),
}

impl Descriptor {
    /// Returns the record this descriptor points at, if any.
    pub fn record(&self) -> Option<&Map<String, Value>> {
        match self {
            Descriptor::Record(map) => Some(map),
            Descriptor::Batch(items) => items.first().and_then(Value::as_object),
            Descriptor::Other(_) => None,
        }
    }

    /// Normalizes the descriptor into a single [`ImageRecord`].
    pub fn normalize(&self, url_field: &str) -> ImageRecord {
        self.record()
            .map(|record| ImageRecord::from_map(record, url_field))
            .unwrap_or_default()
    }
}

impl From<Value> for Descriptor {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Descriptor::Batch(items),
            Value::Object(map) => Descriptor::Record(map),
            other => Descriptor::Other(other),
        }
    }
}

/// An image record resolved from a [`Descriptor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRecord {
    /// The image URL, present only when the field holds a non-empty string.
    pub url: Option<String>,
    /// Difficulty score in `[0, 1]`; non-numeric values are treated as absent.
    pub difficulty: Option<f64>,
    pub details: ImageDetails,
}

impl ImageRecord {
    pub fn from_map(record: &Map<String, Value>, url_field: &str) -> Self {
        let url = record
            .get(url_field)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        let difficulty = record.get("difficulty").and_then(Value::as_f64);

        Self {
            url,
            difficulty,
            details: ImageDetails::from_map(record),
        }
    }

    /// The named tier the difficulty score falls into.
    pub fn tier(&self) -> Option<Difficulty> {
        self.difficulty.and_then(Difficulty::from_score)
    }
}

/// Descriptive metadata the Pichunt API attaches to an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub realm: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating_count: Option<u64>,
    /// Date the image was served as the daily image (`YYYY-MM-DD`).
    #[serde(default, deserialize_with = "lenient")]
    pub appeared: Option<String>,
}

impl ImageDetails {
    fn from_map(record: &Map<String, Value>) -> Self {
        // `lenient` absorbs per-field type mismatches, so this only fails on non-objects.
        Self::deserialize(Value::Object(record.clone())).unwrap_or_default()
    }
}

/// Deserializes an optional field, dropping values of the wrong type instead of failing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Named difficulty tier used when asking the API for a new image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Half-open score range `[low, high)` covered by this tier.
    pub fn score_range(self) -> (f64, f64) {
        match self {
            Difficulty::Easy => (0.0, 0.33),
            Difficulty::Medium => (0.33, 0.67),
            Difficulty::Hard => (0.67, 1.01),
        }
    }

    /// Classifies a score; scores outside every range yield `None`.
    pub fn from_score(score: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| {
            let (low, high) = tier.score_range();
            score >= low && score < high
        })
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!(
                "Unknown difficulty: {}. Available difficulties: easy, medium, hard",
                s
            )),
        }
    }
}

/// The image endpoints exposed by the Pichunt API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEndpoint {
    NewImage(Difficulty),
    Daily,
}

impl ImageEndpoint {
    /// Builds the absolute endpoint URL against `api_base`.
    pub fn url(self, api_base: &str) -> String {
        let base = api_base.trim_end_matches('/');
        match self {
            ImageEndpoint::NewImage(difficulty) => {
                format!("{}/api/new-image?difficulty={}", base, difficulty.as_str())
            }
            ImageEndpoint::Daily => format!("{}/api/daily-image", base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> Descriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn record_from_single_object() {
        let record = descriptor(json!({"url": "a.png", "difficulty": 0.5})).normalize("url");
        assert_eq!(record.url.as_deref(), Some("a.png"));
        assert_eq!(record.difficulty, Some(0.5));
    }

    #[test]
    fn record_from_first_array_element() {
        let desc = descriptor(json!([{"url": "a.png"}, {"url": "b.png"}]));
        assert!(matches!(desc, Descriptor::Batch(_)));
        assert_eq!(desc.normalize("url").url.as_deref(), Some("a.png"));
    }

    #[test]
    fn empty_array_and_scalars_have_no_record() {
        assert!(descriptor(json!([])).record().is_none());
        assert!(descriptor(json!([1, 2])).record().is_none());
        assert!(descriptor(json!("a.png")).record().is_none());
        assert_eq!(descriptor(json!(null)).normalize("url"), ImageRecord::default());
    }

    #[test]
    fn url_field_is_configurable() {
        let record = descriptor(json!({"url": "a.png", "image": "b.png"})).normalize("image");
        assert_eq!(record.url.as_deref(), Some("b.png"));
    }

    #[test]
    fn empty_or_non_string_url_is_absent() {
        assert_eq!(descriptor(json!({"url": ""})).normalize("url").url, None);
        assert_eq!(descriptor(json!({"url": 42})).normalize("url").url, None);
        assert_eq!(descriptor(json!({"other": "a.png"})).normalize("url").url, None);
    }

    #[test]
    fn non_numeric_difficulty_is_absent() {
        let record = descriptor(json!({"url": "a.png", "difficulty": "easy"})).normalize("url");
        assert_eq!(record.difficulty, None);
        let record = descriptor(json!({"url": "a.png", "difficulty": null})).normalize("url");
        assert_eq!(record.difficulty, None);
    }

    #[test]
    fn details_tolerate_wrong_types() {
        let record = descriptor(json!({
            "id": 7,
            "url": "a.png",
            "realm": "Isle of Dawn",
            "area": 3,
            "location": null,
            "rating_count": 12
        }))
        .normalize("url");
        assert_eq!(
            record.details,
            ImageDetails {
                id: Some(7),
                realm: Some("Isle of Dawn".to_string()),
                area: None,
                location: None,
                rating_count: Some(12),
                appeared: None,
            }
        );
    }

    #[test]
    fn daily_descriptor_keeps_appeared_date() {
        let record = descriptor(json!({
            "id": 3,
            "url": "daily.png",
            "difficulty": 0.5,
            "appeared": "2026-10-19"
        }))
        .normalize("url");
        assert_eq!(record.details.appeared.as_deref(), Some("2026-10-19"));
        assert_eq!(record.tier(), Some(Difficulty::Medium));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn scores_map_to_tiers() {
        assert_eq!(Difficulty::from_score(0.0), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_score(0.33), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_score(0.83), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_score(1.0), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_score(-0.1), None);
        assert_eq!(Difficulty::from_score(f64::NAN), None);
    }

    #[test]
    fn endpoint_urls() {
        assert_eq!(
            ImageEndpoint::NewImage(Difficulty::Medium).url("http://localhost:5000/"),
            "http://localhost:5000/api/new-image?difficulty=medium"
        );
        assert_eq!(
            ImageEndpoint::Daily.url("http://localhost:5000"),
            "http://localhost:5000/api/daily-image"
        );
    }
}
