//! Attendance report rows and their CSV rendering.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::grouping::{format_periods_with_count, group_schedule};
use crate::models::{AttendanceRecord, AttendanceStatus, ScheduleEntry, hhmm};

/// One report row: a consecutive run of periods of the same subject and
/// teacher, for one class on one date, all carrying the same status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceGroup {
    pub class_name: String,
    #[schema(value_type = String, format = "date", example = "2026-01-12")]
    pub date: NaiveDate,
    pub subject: String,
    pub teacher_name: String,
    pub periods: Vec<u8>,
    pub period_label: String,
    #[schema(value_type = String, example = "06:30")]
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "08:00")]
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub status: AttendanceStatus,
}

/// Collapses raw attendance records into report rows.
///
/// Records are partitioned by `(class, date, status)` and each partition is
/// run through the consecutive-period grouper, so a subject taught over
/// periods 1-3 with the same status becomes one row spanning the earliest
/// start and latest end time. Rows come back sorted by date, class and
/// first period.
pub fn group_attendance(records: &[AttendanceRecord]) -> Vec<AttendanceGroup> {
    type PartitionKey = (String, NaiveDate, AttendanceStatus);

    let mut order: Vec<PartitionKey> = Vec::new();
    let mut partitions: HashMap<PartitionKey, Vec<ScheduleEntry>> = HashMap::new();

    for record in records {
        let key = (record.class_name.clone(), record.date, record.status);
        if !partitions.contains_key(&key) {
            order.push(key.clone());
        }
        // The grouper keys on (day, subject, teacher); the date string takes
        // the day position so runs never cross dates.
        partitions.entry(key).or_default().push(ScheduleEntry {
            id: record.id,
            day: record.date.to_string(),
            subject: record.subject.clone(),
            teacher_name: record.teacher_name.clone(),
            period: record.period,
            start_time: record.start_time,
            end_time: record.end_time,
        });
    }

    let mut rows = Vec::new();
    for key in order {
        let (class_name, date, status) = key.clone();
        let Some(entries) = partitions.remove(&key) else {
            continue;
        };
        for group in group_schedule(&entries) {
            rows.push(AttendanceGroup {
                class_name: class_name.clone(),
                date,
                subject: group.subject,
                teacher_name: group.teacher_name,
                period_label: format_periods_with_count(&group.periods),
                periods: group.periods,
                start_time: group.start_time,
                end_time: group.end_time,
                status,
            });
        }
    }

    rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.class_name.cmp(&b.class_name))
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    rows
}

/// Writes report rows as a CSV document, one row per group.
#[derive(Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, rows: &[AttendanceGroup]) -> Vec<u8> {
        if rows.is_empty() {
            return Vec::new();
        }

        let mut out = String::from("date,class,periods,subject,teacher,time,status\r\n");
        for row in rows {
            let fields = [
                row.date.to_string(),
                row.class_name.clone(),
                row.period_label.clone(),
                row.subject.clone(),
                row.teacher_name.clone(),
                format!(
                    "{}-{}",
                    row.start_time.format("%H:%M"),
                    row.end_time.format("%H:%M")
                ),
                row.status.to_string(),
            ];
            let line = fields
                .iter()
                .map(|f| escape_field(f))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push_str("\r\n");
        }
        out.into_bytes()
    }
}

fn escape_field(field: &str) -> String {
    let needs_quotes = field
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r'));
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
