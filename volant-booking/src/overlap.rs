use chrono::{DateTime, Utc};
use uuid::Uuid;

use volant_domain::Booking;

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// share at least one instant. Adjacent intervals (`a_end == b_start`) do
/// not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// First existing booking whose interval collides with `[start, end)`,
/// skipping `exclude` so an update never conflicts with its own record.
/// Callers pass the store's active listing, which already filters out
/// cancelled and completed bookings.
pub(crate) fn first_conflict<'a>(
    existing: &'a [Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Option<&'a Booking> {
    existing
        .iter()
        .filter(|b| exclude != Some(b.id))
        .find(|b| overlaps(start, end, b.start_time, b.end_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        assert!(!overlaps(at(10, 0), at(11, 0), at(11, 0), at(12, 0)));
        assert!(!overlaps(at(11, 0), at(12, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn partial_and_full_containment_overlap() {
        // Straddling the start
        assert!(overlaps(at(10, 30), at(11, 30), at(10, 0), at(11, 0)));
        // Fully inside
        assert!(overlaps(at(10, 15), at(10, 45), at(10, 0), at(11, 0)));
        // Fully containing
        assert!(overlaps(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
        // Identical
        assert!(overlaps(at(10, 0), at(11, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(at(8, 0), at(9, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (at(10, 0), at(11, 0), at(10, 30), at(11, 30)),
            (at(10, 0), at(11, 0), at(11, 0), at(12, 0)),
            (at(10, 0), at(11, 0), at(14, 0), at(15, 0)),
        ];
        for (a1, a2, b1, b2) in cases {
            assert_eq!(overlaps(a1, a2, b1, b2), overlaps(b1, b2, a1, a2));
        }
    }

    #[test]
    fn conflict_scan_skips_excluded_id() {
        let day = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();
        let booking = volant_domain::Booking {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            start_time: day,
            end_time: day + Duration::hours(1),
            purpose: volant_domain::BookingPurpose::SelfDrive,
            status: volant_domain::BookingStatus::Confirmed,
            created_at: day,
            updated_at: day,
        };
        let existing = vec![booking.clone()];

        assert!(first_conflict(&existing, day, day + Duration::hours(1), None).is_some());
        assert!(first_conflict(&existing, day, day + Duration::hours(1), Some(booking.id)).is_none());
    }
}
