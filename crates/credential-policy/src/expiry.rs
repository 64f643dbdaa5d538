//! Password expiry arithmetic.

use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Returns `time` advanced by exactly `days` whole days, saturating at the
/// latest representable instant.
pub fn calc_expiry_date(time: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    time.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Returns an epoch-millisecond timestamp advanced by exactly `days` days.
pub fn calc_expiry_millis(millis: i64, days: u32) -> i64 {
    millis.saturating_add(i64::from(days) * MILLIS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ninety_days_is_exact() {
        let t = Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap();
        let expiry = calc_expiry_date(t, 90);
        assert_eq!(expiry - t, Duration::days(90));
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_millis_form_matches_date_form() {
        let t = Utc.with_ymd_and_hms(2023, 10, 29, 0, 0, 0).unwrap();
        let millis = calc_expiry_millis(t.timestamp_millis(), 30);
        assert_eq!(millis, calc_expiry_date(t, 30).timestamp_millis());
        assert_eq!(calc_expiry_millis(0, 1), 86_400_000);
    }

    #[test]
    fn test_expiry_saturates_at_latest_instant() {
        let near_end = DateTime::<Utc>::MAX_UTC - Duration::days(10);
        assert_eq!(calc_expiry_date(near_end, 90), DateTime::<Utc>::MAX_UTC);
        assert_eq!(calc_expiry_date(DateTime::<Utc>::MAX_UTC, 1), DateTime::<Utc>::MAX_UTC);
        assert_eq!(calc_expiry_millis(i64::MAX - 1, 90), i64::MAX);
    }
}
