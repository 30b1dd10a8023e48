use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single diary record. Remote payloads decode to the same shape, so
/// every field beyond `id`, `content` and `date` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: usize,
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub title: Option<String>,
}

impl DiaryEntry {
    pub fn new(id: usize, content: String, date: String) -> Self {
        DiaryEntry {
            id,
            content,
            date,
            images: None,
            location: None,
            mood: None,
            tags: None,
            title: None,
        }
    }

    /// Parsed timestamp used for ordering. An unparsable `date` yields
    /// `None`, which sorts as older than every parsable date.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date)
    }

    pub fn has_images(&self) -> bool {
        self.images.as_ref().is_some_and(|imgs| !imgs.is_empty())
    }

    pub fn has_location(&self) -> bool {
        self.location.as_deref().is_some_and(|loc| !loc.is_empty())
    }

    pub fn has_mood(&self) -> bool {
        self.mood.as_deref().is_some_and(|mood| !mood.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
    }
    None
}
