use chrono::{Duration, NaiveTime};
use once_cell::sync::Lazy;

/// School days in display order.
pub const DAYS: [&str; 6] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"];

pub const PERIOD_COUNT: u8 = 10;
const PERIOD_MINUTES: i64 = 45;

/// Fixed school-wide bell table: ten back-to-back 45-minute periods starting
/// at 06:30. Index 0 holds period 1.
pub static PERIOD_TABLE: Lazy<Vec<(NaiveTime, NaiveTime)>> = Lazy::new(|| {
    let first = NaiveTime::from_hms_opt(6, 30, 0).expect("valid bell time");
    (0..PERIOD_COUNT as i64)
        .map(|i| {
            (
                first + Duration::minutes(i * PERIOD_MINUTES),
                first + Duration::minutes((i + 1) * PERIOD_MINUTES),
            )
        })
        .collect()
});

/// Start/end times of a 1-based period, `None` outside 1..=10.
pub fn period_times(period: u8) -> Option<(NaiveTime, NaiveTime)> {
    if (1..=PERIOD_COUNT).contains(&period) {
        Some(PERIOD_TABLE[period as usize - 1])
    } else {
        None
    }
}

pub fn is_school_day(day: &str) -> bool {
    DAYS.contains(&day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_times_first_and_last() {
        let (start, end) = period_times(1).unwrap();
        assert_eq!(start, NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(7, 15, 0).unwrap());

        let (start, end) = period_times(10).unwrap();
        assert_eq!(start, NaiveTime::from_hms_opt(13, 15, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    }

    #[test]
    fn test_period_times_out_of_range() {
        assert!(period_times(0).is_none());
        assert!(period_times(11).is_none());
    }

    #[test]
    fn test_table_is_gap_free() {
        for pair in PERIOD_TABLE.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_is_school_day() {
        assert!(is_school_day("Senin"));
        assert!(is_school_day("Sabtu"));
        assert!(!is_school_day("Minggu"));
        assert!(!is_school_day("senin"));
    }
}
