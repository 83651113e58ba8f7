use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    AttendanceRecord, AttendanceStatus, AttendanceSubmission, NewScheduleEntry, ScheduleEntry,
};
use crate::periods::{self, period_times};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("class {0} has no schedule")]
    UnknownClass(String),
    #[error("schedule entry {0} not found")]
    ScheduleNotFound(i64),
    #[error("period {period} on {day} is already scheduled")]
    SlotTaken { day: String, period: u8 },
    #[error("period must be between 1 and 10")]
    InvalidPeriod,
    #[error("{0} is not a school day")]
    UnknownDay(String),
}

/// In-memory backing store for schedules and attendance history.
///
/// Readers get cloned snapshots, so the grouping pipeline always works over
/// request-scoped data and never observes a concurrent mutation.
#[derive(Default)]
pub struct Store {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    next_schedule_id: i64,
    next_attendance_id: i64,
    schedules: HashMap<String, Vec<ScheduleEntry>>,
    attendance: Vec<AttendanceRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schedule(
        &self,
        class_name: &str,
        new: NewScheduleEntry,
    ) -> Result<ScheduleEntry, StoreError> {
        let mut created = self.add_schedule_batch(class_name, vec![new])?;
        Ok(created.remove(0))
    }

    /// Adds a batch of slots atomically: every row is validated (day, period
    /// range, conflicts with existing slots and within the batch itself)
    /// before any is committed, so a bad row rejects the whole batch instead
    /// of leaving it half-applied.
    pub fn add_schedule_batch(
        &self,
        class_name: &str,
        new_entries: Vec<NewScheduleEntry>,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let mut claimed: HashSet<(&str, u8)> = HashSet::new();
        for new in &new_entries {
            if !periods::is_school_day(&new.day) {
                return Err(StoreError::UnknownDay(new.day.clone()));
            }
            if period_times(new.period).is_none() {
                return Err(StoreError::InvalidPeriod);
            }
            if !claimed.insert((new.day.as_str(), new.period)) {
                return Err(StoreError::SlotTaken {
                    day: new.day.clone(),
                    period: new.period,
                });
            }
        }

        let mut inner = self.inner.write().expect("store lock poisoned");
        if let Some(existing) = inner.schedules.get(class_name) {
            for new in &new_entries {
                if existing
                    .iter()
                    .any(|e| e.day == new.day && e.period == Some(new.period))
                {
                    return Err(StoreError::SlotTaken {
                        day: new.day.clone(),
                        period: new.period,
                    });
                }
            }
        }

        let mut created = Vec::with_capacity(new_entries.len());
        for new in new_entries {
            let (start_time, end_time) =
                period_times(new.period).ok_or(StoreError::InvalidPeriod)?;
            inner.next_schedule_id += 1;
            created.push(ScheduleEntry {
                id: inner.next_schedule_id,
                day: new.day,
                subject: new.subject,
                teacher_name: new.teacher_name,
                period: Some(new.period),
                start_time,
                end_time,
            });
        }
        inner
            .schedules
            .entry(class_name.to_string())
            .or_default()
            .extend(created.iter().cloned());
        Ok(created)
    }

    /// Snapshot of a class's schedule, optionally restricted to one day.
    pub fn class_schedule(
        &self,
        class_name: &str,
        day: Option<&str>,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        let entries = inner
            .schedules
            .get(class_name)
            .ok_or_else(|| StoreError::UnknownClass(class_name.to_string()))?;
        Ok(entries
            .iter()
            .filter(|e| day.is_none_or(|d| e.day == d))
            .cloned()
            .collect())
    }

    pub fn delete_schedule(&self, class_name: &str, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let entries = inner
            .schedules
            .get_mut(class_name)
            .ok_or_else(|| StoreError::UnknownClass(class_name.to_string()))?;
        let position = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::ScheduleNotFound(id))?;
        entries.remove(position);
        Ok(())
    }

    pub fn record_attendance(
        &self,
        class_name: &str,
        submission: AttendanceSubmission,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        // Validate every row before touching state so a bad row rejects the
        // whole submission instead of leaving half a day recorded.
        for item in &submission.entries {
            if period_times(item.period).is_none() {
                return Err(StoreError::InvalidPeriod);
            }
        }

        let mut inner = self.inner.write().expect("store lock poisoned");
        let mut created = Vec::with_capacity(submission.entries.len());
        for item in submission.entries {
            let (start_time, end_time) =
                period_times(item.period).ok_or(StoreError::InvalidPeriod)?;
            inner.next_attendance_id += 1;
            let record = AttendanceRecord {
                id: inner.next_attendance_id,
                class_name: class_name.to_string(),
                date: submission.date,
                subject: item.subject,
                teacher_name: item.teacher_name,
                period: Some(item.period),
                start_time,
                end_time,
                status: item.status,
            };
            inner.attendance.push(record.clone());
            created.push(record);
        }
        Ok(created)
    }

    /// Snapshot of attendance history, optionally filtered by class and/or
    /// date. An empty result is not an error here; callers decide.
    pub fn attendance_history(
        &self,
        class_name: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Vec<AttendanceRecord> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .attendance
            .iter()
            .filter(|r| class_name.is_none_or(|c| r.class_name == c))
            .filter(|r| date.is_none_or(|d| r.date == d))
            .cloned()
            .collect()
    }

    pub fn status_counts(&self) -> HashMap<AttendanceStatus, usize> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut counts = HashMap::new();
        for record in &inner.attendance {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }
}
