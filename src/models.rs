use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Serde helper for the `"HH:MM"` wire format used by every time field.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One schedule slot of a class: a subject taught by one teacher in one
/// period of one day. `period` is `None` only for malformed rows, which are
/// kept visible as degenerate single-period groups instead of being dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: i64,
    pub day: String,
    pub subject: String,
    pub teacher_name: String,
    pub period: Option<u8>,
    #[schema(value_type = String, example = "06:30")]
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "07:15")]
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

/// A maximal run of consecutive periods sharing `(day, subject, teacher)`.
///
/// `periods` is strictly increasing by 1 and `schedule_ids[i]` belongs to
/// `periods[i]`; `start_time`/`end_time` come from the run's first and last
/// entry. `group_key` is `"{day}-{subject}-{teacher}-{run_index}"` so
/// deletion and export actions can address exactly this run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGroup {
    pub group_key: String,
    pub day: String,
    pub subject: String,
    pub teacher_name: String,
    #[schema(value_type = String, example = "06:30")]
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "08:00")]
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub periods: Vec<u8>,
    pub schedule_ids: Vec<i64>,
}

/// Payload for adding one schedule slot; times are filled in from the fixed
/// period table, so callers only name the slot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleEntry {
    pub day: String,
    pub subject: String,
    pub teacher_name: String,
    pub period: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    Present,
    Sick,
    Excused,
    Absent,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Sick => "Sick",
            AttendanceStatus::Excused => "Excused",
            AttendanceStatus::Absent => "Absent",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    pub class_name: String,
    #[schema(value_type = String, format = "date", example = "2026-01-12")]
    pub date: NaiveDate,
    pub subject: String,
    pub teacher_name: String,
    pub period: Option<u8>,
    #[schema(value_type = String, example = "06:30")]
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "07:15")]
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub status: AttendanceStatus,
}

/// One day's attendance report for a class, submitted by its representative.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSubmission {
    #[schema(value_type = String, format = "date", example = "2026-01-12")]
    pub date: NaiveDate,
    pub entries: Vec<AttendanceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceItem {
    pub subject: String,
    pub teacher_name: String,
    pub period: u8,
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_entry_time_wire_format() {
        let entry = ScheduleEntry {
            id: 1,
            day: "Senin".to_string(),
            subject: "Math".to_string(),
            teacher_name: "T1".to_string(),
            period: Some(1),
            start_time: NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(7, 15, 0).unwrap(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""startTime":"06:30""#));
        assert!(json.contains(r#""teacherName":"T1""#));

        let back: ScheduleEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AttendanceStatus::Sick.to_string(), "Sick");
        assert_eq!(AttendanceStatus::Present.to_string(), "Present");
    }
}
