use serde::Serialize;
use utoipa::ToSchema;

/// Aggregate attendance report across every counter pair fed in.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceReport {
    /// Total classes held across all summed records.
    #[schema(example = 100)]
    pub total: i64,
    /// Classes attended across all summed records.
    #[schema(example = 70)]
    pub attended: i64,
    /// attended / total * 100, or 0 when no classes were ever held.
    #[schema(example = 70.0)]
    pub percentage: f64,
    /// Minimum further classes (all attended) needed to reach 75%.
    #[schema(example = 20)]
    pub needed: i64,
}

impl AttendanceReport {
    /// Pure aggregation over pre-summed counters. Inputs are assumed valid
    /// (the update policy guarantees 0 <= attended <= total).
    pub fn from_totals(total: i64, attended: i64) -> Self {
        let percentage = if total > 0 {
            (attended as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        AttendanceReport {
            total,
            attended,
            percentage,
            needed: classes_needed(total, attended),
        }
    }

    /// Sums a collection of (total_classes, attended_classes) pairs.
    pub fn from_records(records: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let (mut total, mut attended) = (0i64, 0i64);
        for (t, a) in records {
            total += t;
            attended += a;
        }
        Self::from_totals(total, attended)
    }
}

/// Smallest non-negative n with (attended + n) / (total + n) >= 0.75,
/// in closed form: ceil((75*total - 100*attended) / 25). Zero once the
/// ratio already meets 75%, including the no-classes-yet case.
fn classes_needed(total: i64, attended: i64) -> i64 {
    // attended/total >= 3/4, without division
    if attended.saturating_mul(4) >= total.saturating_mul(3) {
        return 0;
    }
    let deficit = total.saturating_mul(75).saturating_sub(attended.saturating_mul(100));
    (deficit + 24) / 25
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio_meets_75(total: i64, attended: i64) -> bool {
        4 * attended >= 3 * total
    }

    #[test]
    fn seventy_of_hundred_needs_twenty_more() {
        let report = AttendanceReport::from_totals(100, 70);
        assert_eq!(report.percentage, 70.0);
        assert_eq!(report.needed, 20);
        // 20 really closes the gap, 19 does not
        assert!(ratio_meets_75(120, 90));
        assert!(!ratio_meets_75(119, 89));
    }

    #[test]
    fn empty_history_has_no_deficit() {
        let report = AttendanceReport::from_totals(0, 0);
        assert_eq!(report.percentage, 0.0);
        assert_eq!(report.needed, 0);
    }

    #[test]
    fn full_attendance_needs_nothing() {
        let report = AttendanceReport::from_totals(40, 40);
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.needed, 0);
    }

    #[test]
    fn exactly_threshold_needs_nothing() {
        let report = AttendanceReport::from_totals(4, 3);
        assert_eq!(report.percentage, 75.0);
        assert_eq!(report.needed, 0);
    }

    #[test]
    fn percentage_stays_in_range() {
        for total in 0..=60 {
            for attended in 0..=total {
                let report = AttendanceReport::from_totals(total, attended);
                assert!(report.percentage >= 0.0 && report.percentage <= 100.0);
            }
        }
    }

    #[test]
    fn needed_is_minimal() {
        for total in 0..=60 {
            for attended in 0..=total {
                let n = AttendanceReport::from_totals(total, attended).needed;
                assert!(n >= 0);
                assert!(ratio_meets_75(total + n, attended + n));
                if n > 0 {
                    assert!(!ratio_meets_75(total + n - 1, attended + n - 1));
                }
            }
        }
    }

    #[test]
    fn sums_across_records() {
        let report = AttendanceReport::from_records(vec![(10, 5), (20, 10), (0, 0)]);
        assert_eq!(report.total, 30);
        assert_eq!(report.attended, 15);
        assert_eq!(report.percentage, 50.0);
        assert_eq!(report.needed, 30);
    }
}
