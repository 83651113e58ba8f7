//! Weekly schedule grid view-model.
//!
//! A multi-period group occupies several grid rows. Instead of leaving the
//! renderer to skip continuation rows by iteration order, every occupied
//! cell carries an explicit `span` and `anchor` flag: the anchor cell is
//! drawn with `span` rows, the continuation cells are suppressed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::grouping::format_periods;
use crate::models::ScheduleGroup;
use crate::periods::DAYS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub period: u8,
    pub group_key: String,
    pub subject: String,
    pub teacher_name: String,
    pub label: String,
    pub span: u8,
    pub anchor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn {
    pub day: String,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekGrid {
    pub days: Vec<DayColumn>,
}

/// Lays grouped entries out as one column per school day, cells sorted by
/// period. Groups carrying a period 0 placeholder (malformed source rows)
/// have no bell-table row and are left off the grid.
pub fn build_week_grid(groups: &[ScheduleGroup]) -> WeekGrid {
    let days = DAYS
        .iter()
        .map(|&day| {
            let mut cells: Vec<GridCell> = groups
                .iter()
                .filter(|g| g.day == day)
                .flat_map(cells_for_group)
                .collect();
            cells.sort_by_key(|c| c.period);
            DayColumn {
                day: day.to_string(),
                cells,
            }
        })
        .collect();

    WeekGrid { days }
}

fn cells_for_group(group: &ScheduleGroup) -> Vec<GridCell> {
    let span = group.periods.len() as u8;
    let label = format_periods(&group.periods);
    group
        .periods
        .iter()
        .filter(|&&period| period > 0)
        .enumerate()
        .map(|(i, &period)| GridCell {
            period,
            group_key: group.group_key.clone(),
            subject: group.subject.clone(),
            teacher_name: group.teacher_name.clone(),
            label: label.clone(),
            span,
            anchor: i == 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_schedule;
    use crate::models::ScheduleEntry;
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
    fn test_multi_period_group_spans_with_single_anchor() {
        let groups = group_schedule(&[
            entry(1, "Senin", "Math", "T1", 1),
            entry(2, "Senin", "Math", "T1", 2),
            entry(3, "Senin", "Math", "T1", 3),
        ]);
        let grid = build_week_grid(&groups);

        let monday = &grid.days[0];
        assert_eq!(monday.day, "Senin");
        assert_eq!(monday.cells.len(), 3);
        assert!(monday.cells.iter().all(|c| c.span == 3));
        assert!(monday.cells.iter().all(|c| c.label == "Period 1-3"));
        let anchors: Vec<_> = monday.cells.iter().filter(|c| c.anchor).collect();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].period, 1);
    }

    #[test]
    fn test_days_are_ordered_and_cells_sorted() {
        let groups = group_schedule(&[
            entry(1, "Selasa", "Art", "T2", 5),
            entry(2, "Selasa", "Math", "T1", 2),
            entry(3, "Senin", "Physics", "T3", 4),
        ]);
        let grid = build_week_grid(&groups);

        assert_eq!(grid.days.len(), 6);
        assert_eq!(grid.days[0].day, "Senin");
        assert_eq!(grid.days[0].cells.len(), 1);
        let tuesday = &grid.days[1];
        assert_eq!(tuesday.cells[0].period, 2);
        assert_eq!(tuesday.cells[1].period, 5);
        assert!(grid.days[2..].iter().all(|d| d.cells.is_empty()));
    }

    #[test]
    fn test_zero_period_placeholder_left_off_grid() {
        let mut broken = entry(1, "Senin", "Math", "T1", 1);
        broken.period = None;
        let grid = build_week_grid(&group_schedule(&[broken]));
        assert!(grid.days.iter().all(|d| d.cells.is_empty()));
    }
}
