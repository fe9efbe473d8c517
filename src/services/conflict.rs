//! Time-conflict detection
//!
//! Pure interval-overlap computation over candidate events. The database
//! prefilter narrows candidates by date; everything here is side-effect
//! free and operates on minutes since midnight.

use chrono::{NaiveTime, Timelike};

use crate::models::event::Event;

/// Minutes since midnight for a wall-clock time
pub fn minutes_since_midnight(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Strict interval-overlap test.
///
/// Two intervals overlap when `start1 < end2 && start2 < end1`.
/// Back-to-back intervals (one ending exactly when the other starts) do
/// not overlap.
pub fn times_overlap(
    start1: NaiveTime,
    end1: NaiveTime,
    start2: NaiveTime,
    end2: NaiveTime,
) -> bool {
    let time1_start = minutes_since_midnight(start1);
    let time1_end = minutes_since_midnight(end1);
    let time2_start = minutes_since_midnight(start2);
    let time2_end = minutes_since_midnight(end2);

    time1_start < time2_end && time2_start < time1_end
}

/// Filter date-window candidates down to actual time conflicts.
///
/// `exclude_event_id` removes that event from the candidate set before
/// the overlap test (used when checking a request against its own
/// materialized event).
pub fn filter_overlapping(
    candidates: Vec<Event>,
    time_start: NaiveTime,
    time_end: NaiveTime,
    exclude_event_id: Option<i64>,
) -> Vec<Event> {
    candidates
        .into_iter()
        .filter(|event| {
            if exclude_event_id == Some(event.id) {
                return false;
            }
            times_overlap(time_start, time_end, event.time_start, event.time_end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_overlapping_intervals() {
        assert!(times_overlap(t(10, 0), t(12, 0), t(11, 0), t(13, 0)));
        assert!(times_overlap(t(11, 0), t(13, 0), t(10, 0), t(12, 0)));
        // containment
        assert!(times_overlap(t(10, 0), t(18, 0), t(12, 0), t(13, 0)));
        // identical
        assert!(times_overlap(t(10, 0), t(12, 0), t(10, 0), t(12, 0)));
    }

    #[test]
    fn test_back_to_back_does_not_conflict() {
        assert!(!times_overlap(t(10, 0), t(12, 0), t(12, 0), t(13, 0)));
        assert!(!times_overlap(t(12, 0), t(13, 0), t(10, 0), t(12, 0)));
        assert!(!times_overlap(t(16, 0), t(18, 0), t(18, 0), t(20, 0)));
    }

    #[test]
    fn test_disjoint_intervals() {
        assert!(!times_overlap(t(8, 0), t(9, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn test_minutes_since_midnight() {
        assert_eq!(minutes_since_midnight(t(0, 0)), 0);
        assert_eq!(minutes_since_midnight(t(10, 30)), 630);
        assert_eq!(minutes_since_midnight(t(23, 59)), 1439);
    }

    proptest! {
        /// The overlap test agrees with the definition
        /// `a.start < b.end && b.start < a.end` for all minute pairs.
        #[test]
        fn prop_overlap_matches_definition(
            a_start in 0u32..1440,
            a_end in 0u32..1440,
            b_start in 0u32..1440,
            b_end in 0u32..1440,
        ) {
            let to_time = |m: u32| NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap();
            let expected = a_start < b_end && b_start < a_end;
            prop_assert_eq!(
                times_overlap(to_time(a_start), to_time(a_end), to_time(b_start), to_time(b_end)),
                expected
            );
        }

        /// Back-to-back intervals never conflict.
        #[test]
        fn prop_back_to_back_never_conflicts(start in 0u32..720, len in 1u32..360) {
            let to_time = |m: u32| NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap();
            let boundary = start + len;
            prop_assert!(!times_overlap(
                to_time(start),
                to_time(boundary),
                to_time(boundary),
                to_time((boundary + len).min(1439)),
            ));
        }
    }
}
