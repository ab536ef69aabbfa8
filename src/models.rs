//! Record shapes exchanged with the catalog API.
//!
//! Field names follow the API's camelCase JSON. Nested and optional fields
//! default to empty so partially populated records still decode.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier assigned by the API.
pub type RecordId = u64;

/// Display format for release dates and date inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cover reference used when a record has none.
pub const DEFAULT_COVER_IMAGE: &str = "/images/default-cover.png";

/// Preview shown in the edit form when the record has no cover.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

/// Today's date in `DATE_FORMAT`, the default for date inputs.
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Format an API timestamp for display.
///
/// Accepts RFC 3339, naive datetimes and plain dates. Values that parse as
/// none of those are shown verbatim; absent values are empty.
pub fn format_release_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DATE_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DATE_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return date.format(DATE_FORMAT).to_string();
    }
    raw.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Singer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Singer {
    /// "First Last", skipping whichever half is missing.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Album summary embedded in a music record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRef {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Music {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub albums: Vec<AlbumRef>,
    #[serde(default)]
    pub singer: Option<Singer>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Currency {
    pub id: Option<RecordId>,
    pub name: String,
    pub code: String,
    pub symbol: String,
}

/// Subscription plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plan {
    pub id: Option<RecordId>,
    pub cover_image: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Length of the plan in days.
    pub duration: u32,
    pub currency_id: Option<RecordId>,
    pub currency: Currency,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            id: None,
            cover_image: DEFAULT_COVER_IMAGE.to_string(),
            name: String::new(),
            description: String::new(),
            price: 0.0,
            duration: 0,
            currency_id: None,
            currency: Currency::default(),
        }
    }
}

/// Author of a prayer request or reply.
///
/// Only the commonly present fields are typed; anything else the API sends
/// is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrayerRequest {
    pub id: Option<RecordId>,
    pub author: Option<Author>,
    pub is_anonymous: bool,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub is_praying: bool,
    pub number_of_prays: u32,
    pub replies: Vec<Reply>,
    pub is_approved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_without_singer_or_albums() {
        let music: Music = serde_json::from_str(r#"{"id": 7, "title": "Intro"}"#).unwrap();
        assert_eq!(music.id, 7);
        assert!(music.singer.is_none());
        assert!(music.albums.is_empty());
        assert!(music.cover_image.is_none());
    }

    #[test]
    fn test_singer_display_name_partial() {
        let singer = Singer {
            first_name: Some("Nina".into()),
            last_name: None,
        };
        assert_eq!(singer.display_name(), "Nina");
        assert_eq!(Singer::default().display_name(), "");
    }

    #[test]
    fn test_plan_defaults() {
        let plan: Plan = serde_json::from_str("{}").unwrap();
        assert_eq!(plan, Plan::default());
        assert_eq!(plan.cover_image, DEFAULT_COVER_IMAGE);
    }

    #[test]
    fn test_prayer_request_keeps_unknown_author_fields() {
        let json = r#"{
            "id": 3,
            "author": {"id": 9, "firstName": "Ada", "church": "St. Mark"},
            "title": "Healing",
            "replies": [{"content": "Praying", "author": null, "likes": 2}],
            "numberOfPrays": 4
        }"#;
        let request: PrayerRequest = serde_json::from_str(json).unwrap();
        let author = request.author.unwrap();
        assert_eq!(author.first_name.as_deref(), Some("Ada"));
        assert_eq!(author.extra.get("church"), Some(&Value::from("St. Mark")));
        assert_eq!(request.replies.len(), 1);
        assert_eq!(request.replies[0].extra.get("likes"), Some(&Value::from(2)));
        assert!(!request.is_approved);
    }

    #[test]
    fn test_format_release_date_variants() {
        assert_eq!(format_release_date(None), "");
        assert_eq!(format_release_date(Some("2024-03-09")), "2024-03-09");
        assert_eq!(
            format_release_date(Some("2024-03-09T10:00:00.000Z")),
            "2024-03-09"
        );
        assert_eq!(
            format_release_date(Some("2024-03-09T10:00:00")),
            "2024-03-09"
        );
        assert_eq!(format_release_date(Some("soon")), "soon");
    }
}
