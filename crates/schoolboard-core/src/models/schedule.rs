use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Weekday {
    #[serde(alias = "monday", alias = "Mon")]
    Monday,
    #[serde(alias = "tuesday", alias = "Tue")]
    Tuesday,
    #[serde(alias = "wednesday", alias = "Wed")]
    Wednesday,
    #[serde(alias = "thursday", alias = "Thu")]
    Thursday,
    #[serde(alias = "friday", alias = "Fri")]
    Friday,
    #[serde(alias = "saturday", alias = "Sat")]
    Saturday,
    #[serde(alias = "sunday", alias = "Sun")]
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Schedule {
    pub id: i64,
    #[serde(alias = "className", alias = "class")]
    pub class_name: String,
    pub subject: String,
    #[serde(alias = "teacherId", default)]
    pub teacher_id: Option<String>,
    #[serde(alias = "dayOfWeek", alias = "day")]
    pub day_of_week: Weekday,
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    pub end_time: String,
    #[serde(default)]
    pub room: Option<String>,
}

impl Schedule {
    fn parse_time(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }

    pub fn start(&self) -> Option<NaiveTime> {
        Self::parse_time(&self.start_time)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        Self::parse_time(&self.end_time)
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        Some((self.end()? - self.start()?).num_minutes())
    }

    /// Slot label like "Monday 08:00-08:45".
    pub fn slot_label(&self) -> String {
        let fmt = |t: Option<NaiveTime>, raw: &str| {
            t.map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| raw.to_string())
        };
        format!(
            "{:?} {}-{}",
            self.day_of_week,
            fmt(self.start(), &self.start_time),
            fmt(self.end(), &self.end_time)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Schedule {
        serde_json::from_str(
            r#"{
                "id": 12,
                "class_name": "7B",
                "subject": "Mathematics",
                "teacher_id": "t-1",
                "day_of_week": "monday",
                "start_time": "08:00:00",
                "end_time": "08:45"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_schedule_parses_lowercase_day() {
        assert_eq!(schedule().day_of_week, Weekday::Monday);
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(schedule().duration_minutes(), Some(45));
    }

    #[test]
    fn test_slot_label() {
        assert_eq!(schedule().slot_label(), "Monday 08:00-08:45");
    }

    #[test]
    fn test_unparseable_time_has_no_duration() {
        let mut s = schedule();
        s.end_time = "late".to_string();
        assert_eq!(s.duration_minutes(), None);
        assert_eq!(s.slot_label(), "Monday 08:00-late");
    }
}
