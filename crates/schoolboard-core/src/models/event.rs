use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "eventDate", alias = "date", default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(alias = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(alias = "createdBy", default)]
    pub created_by: Option<String>,
}

impl Event {
    pub fn formatted_date(&self) -> String {
        match &self.event_date {
            Some(date) => format_date(date),
            None => "TBD".to_string(),
        }
    }

    /// Calendar day of the event, if the date parses.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.event_date.as_deref()?;
        let day = raw.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// True when the event is today or later. Undated events count as upcoming.
    pub fn is_upcoming(&self) -> bool {
        match self.date() {
            Some(date) => date >= Utc::now().date_naive(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: Option<&str>) -> Event {
        Event {
            id: 1,
            title: "Science Fair".to_string(),
            description: None,
            event_date: date.map(str::to_string),
            location: None,
            image_url: None,
            created_by: None,
        }
    }

    #[test]
    fn test_event_date_parsing() {
        assert_eq!(
            event(Some("2026-03-14T09:00:00Z")).date(),
            NaiveDate::from_ymd_opt(2026, 3, 14)
        );
        assert_eq!(event(Some("2026-03-14")).date(), NaiveDate::from_ymd_opt(2026, 3, 14));
        assert_eq!(event(Some("soon")).date(), None);
    }

    #[test]
    fn test_formatted_date() {
        assert_eq!(event(Some("2026-03-14T09:00:00Z")).formatted_date(), "Mar 14, 2026");
        assert_eq!(event(None).formatted_date(), "TBD");
    }

    #[test]
    fn test_is_upcoming() {
        assert!(!event(Some("2001-01-01")).is_upcoming());
        assert!(event(Some("2999-01-01")).is_upcoming());
        assert!(event(None).is_upcoming());
    }

    #[test]
    fn test_event_accepts_camel_case_aliases() {
        let json = r#"{"id": 3, "title": "Sports Day", "eventDate": "2026-05-01", "imageUrl": "https://cdn/x.png"}"#;
        let parsed: Event = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.event_date.as_deref(), Some("2026-05-01"));
        assert!(parsed.image_url.is_some());
    }
}
