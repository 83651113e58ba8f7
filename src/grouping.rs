//! Consecutive-period grouping and period-range labels.
//!
//! Schedule and attendance rows arrive as a flat list; every view (report
//! tables, the weekly grid, CSV export) wants one entry per *run* of
//! consecutive periods taught by the same teacher for the same subject.
//! Both the admin and the class-representative surfaces go through the one
//! function below, with any day filtering applied by the caller upstream.

use std::collections::HashMap;

use crate::models::{ScheduleEntry, ScheduleGroup};

type BucketKey = (String, String, String);

/// Partitions entries by `(day, subject, teacher_name)` and splits each
/// partition into maximal runs of consecutive periods, one group per run.
///
/// Input order is not assumed; within a partition entries are sorted by
/// period before the run scan. A missing period sorts first (as period 0)
/// and always forms its own run. Buckets are emitted in first-appearance
/// order of their key, runs in period order within a bucket.
pub fn group_schedule(entries: &[ScheduleEntry]) -> Vec<ScheduleGroup> {
    let mut order: Vec<BucketKey> = Vec::new();
    let mut buckets: HashMap<BucketKey, Vec<ScheduleEntry>> = HashMap::new();

    for entry in entries {
        let key = (
            entry.day.clone(),
            entry.subject.clone(),
            entry.teacher_name.clone(),
        );
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(entry.clone());
    }

    let mut groups = Vec::new();
    for key in order {
        let Some(mut bucket) = buckets.remove(&key) else {
            continue;
        };
        bucket.sort_by_key(|e| e.period.unwrap_or(0));

        let mut run: Vec<ScheduleEntry> = Vec::new();
        let mut run_index = 0usize;
        for entry in bucket {
            let extends = match (run.last().and_then(|prev| prev.period), entry.period) {
                (Some(prev), Some(current)) => current == prev + 1,
                _ => false,
            };
            if !run.is_empty() && !extends {
                groups.push(close_run(&key, run_index, &run));
                run_index += 1;
                run.clear();
            }
            run.push(entry);
        }
        if !run.is_empty() {
            groups.push(close_run(&key, run_index, &run));
        }
    }

    groups
}

fn close_run(key: &BucketKey, run_index: usize, run: &[ScheduleEntry]) -> ScheduleGroup {
    let (day, subject, teacher_name) = key;
    let first = &run[0];
    let last = &run[run.len() - 1];
    ScheduleGroup {
        group_key: format!("{day}-{subject}-{teacher_name}-{run_index}"),
        day: day.clone(),
        subject: subject.clone(),
        teacher_name: teacher_name.clone(),
        start_time: first.start_time,
        end_time: last.end_time,
        periods: run.iter().map(|e| e.period.unwrap_or(0)).collect(),
        schedule_ids: run.iter().map(|e| e.id).collect(),
    }
}

fn is_consecutive(periods: &[u8]) -> bool {
    periods.windows(2).all(|pair| pair[1] == pair[0] + 1)
}

/// Human-readable label for a group's period list: `"Period 3"`,
/// `"Period 3-5"` for a consecutive run, or a comma-joined fallback for a
/// non-consecutive set (unreachable after grouping, but must not panic).
pub fn format_periods(periods: &[u8]) -> String {
    match periods {
        [] => String::new(),
        [only] => format!("Period {only}"),
        [first, .., last] if is_consecutive(periods) => format!("Period {first}-{last}"),
        _ => {
            let joined = periods
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Period {joined}")
        }
    }
}

/// Like [`format_periods`] with a duration suffix for multi-period runs,
/// used where the label doubles as a length indicator (reports, export).
pub fn format_periods_with_count(periods: &[u8]) -> String {
    let label = format_periods(periods);
    if periods.len() > 1 && is_consecutive(periods) {
        format!("{label} ({} periods)", periods.len())
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveTime;

    use super::*;
    use crate::periods::period_times;

    fn entry(id: i64, day: &str, subject: &str, teacher: &str, period: u8) -> ScheduleEntry {
        let (start_time, end_time) = period_times(period).unwrap();
        ScheduleEntry {
            id,
            day: day.to_string(),
            subject: subject.to_string(),
            teacher_name: teacher.to_string(),
            period: Some(period),
            start_time,
            end_time,
        }
    }

    #[test]
    fn test_splits_on_period_gap() {
        let entries: Vec<_> = [1, 2, 3, 5, 6]
            .iter()
            .enumerate()
            .map(|(i, &p)| entry(i as i64 + 1, "Senin", "Math", "T1", p))
            .collect();

        let groups = group_schedule(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].periods, vec![1, 2, 3]);
        assert_eq!(groups[1].periods, vec![5, 6]);
        assert_eq!(groups[0].group_key, "Senin-Math-T1-0");
        assert_eq!(groups[1].group_key, "Senin-Math-T1-1");
    }

    #[test]
    fn test_single_entry_bucket() {
        let solo = entry(7, "Rabu", "Physics", "T9", 4);
        let groups = group_schedule(std::slice::from_ref(&solo));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].periods, vec![4]);
        assert_eq!(groups[0].schedule_ids, vec![7]);
        assert_eq!(groups[0].start_time, solo.start_time);
        assert_eq!(groups[0].end_time, solo.end_time);
    }

    #[test]
    fn test_unsorted_input_is_sorted_per_bucket() {
        let entries = vec![
            entry(3, "Senin", "Math", "T1", 3),
            entry(1, "Senin", "Math", "T1", 1),
            entry(2, "Senin", "Math", "T1", 2),
        ];
        let groups = group_schedule(&entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].periods, vec![1, 2, 3]);
        assert_eq!(groups[0].schedule_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_adjacent_periods_different_identity_never_merge() {
        let entries = vec![
            entry(1, "Senin", "Math", "T1", 1),
            entry(2, "Senin", "Biology", "T1", 2),
            entry(3, "Senin", "Math", "T2", 2),
        ];
        let groups = group_schedule(&entries);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.periods.len() == 1));
    }

    #[test]
    fn test_partition_completeness() {
        let entries = vec![
            entry(10, "Senin", "Math", "T1", 1),
            entry(11, "Senin", "Math", "T1", 2),
            entry(12, "Selasa", "Math", "T1", 1),
            entry(13, "Senin", "Art", "T2", 5),
            entry(14, "Senin", "Math", "T1", 7),
        ];
        let groups = group_schedule(&entries);

        let grouped_ids: Vec<i64> = groups.iter().flat_map(|g| g.schedule_ids.clone()).collect();
        let unique: BTreeSet<i64> = grouped_ids.iter().copied().collect();
        assert_eq!(grouped_ids.len(), entries.len());
        assert_eq!(unique.len(), entries.len());
        let input_ids: BTreeSet<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(unique, input_ids);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let entries = vec![
            entry(1, "Senin", "Math", "T1", 1),
            entry(2, "Senin", "Math", "T1", 2),
            entry(3, "Senin", "Math", "T1", 5),
            entry(4, "Kamis", "Chemistry", "T3", 2),
        ];
        let first = group_schedule(&entries);

        // Flatten each group back into per-period entries and regroup.
        let flattened: Vec<ScheduleEntry> = first
            .iter()
            .flat_map(|g| {
                g.periods
                    .iter()
                    .zip(&g.schedule_ids)
                    .map(|(&p, &id)| entry(id, &g.day, &g.subject, &g.teacher_name, p))
                    .collect::<Vec<_>>()
            })
            .collect();
        let second = group_schedule(&flattened);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_period_forms_its_own_run() {
        let mut broken = entry(1, "Senin", "Math", "T1", 1);
        broken.period = None;
        let entries = vec![entry(2, "Senin", "Math", "T1", 1), broken];

        let groups = group_schedule(&entries);
        assert_eq!(groups.len(), 2);
        // None sorts first as period 0 and never extends into period 1.
        assert_eq!(groups[0].periods, vec![0]);
        assert_eq!(groups[0].schedule_ids, vec![1]);
        assert_eq!(groups[1].periods, vec![1]);
    }

    #[test]
    fn test_two_missing_periods_stay_separate() {
        let mut a = entry(1, "Senin", "Math", "T1", 1);
        a.period = None;
        let mut b = entry(2, "Senin", "Math", "T1", 2);
        b.period = None;

        let groups = group_schedule(&[a, b]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let entries = vec![
            entry(1, "Senin", "Math", "T1", 1),
            entry(2, "Senin", "Math", "T1", 2),
            entry(3, "Senin", "Art", "T2", 3),
        ];
        let groups = group_schedule(&entries);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_key, "Senin-Math-T1-0");
        assert_eq!(groups[0].periods, vec![1, 2]);
        assert_eq!(groups[0].schedule_ids, vec![1, 2]);
        assert_eq!(groups[0].start_time, NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(groups[0].end_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());

        assert_eq!(groups[1].group_key, "Senin-Art-T2-0");
        assert_eq!(groups[1].periods, vec![3]);
        assert_eq!(groups[1].schedule_ids, vec![3]);
        assert_eq!(groups[1].start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(groups[1].end_time, NaiveTime::from_hms_opt(8, 45, 0).unwrap());
    }

    #[test]
    fn test_format_periods() {
        assert_eq!(format_periods(&[3]), "Period 3");
        assert_eq!(format_periods(&[3, 4, 5]), "Period 3-5");
        assert_eq!(format_periods(&[3, 5]), "Period 3, 5");
        assert_eq!(format_periods(&[]), "");
    }

    #[test]
    fn test_format_periods_with_count() {
        assert_eq!(format_periods_with_count(&[3]), "Period 3");
        assert_eq!(format_periods_with_count(&[3, 4, 5]), "Period 3-5 (3 periods)");
        assert_eq!(format_periods_with_count(&[3, 5]), "Period 3, 5");
    }
}
