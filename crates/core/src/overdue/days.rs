//! Overdue days since the last payment.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::periodicity::Periodicity;

/// Days overdue given the last payment date and the payment cadence.
///
/// `max(0, floor(now - last_payment in days) - cycle_days)`. An absent date
/// or a date after `now` yields 0. Callers substitute the origination date
/// when a client has never paid.
#[must_use]
pub fn overdue_days(
    last_payment: Option<DateTime<Utc>>,
    periodicity: Periodicity,
    now: DateTime<Utc>,
) -> i64 {
    let Some(last_payment) = last_payment else {
        return 0;
    };

    let elapsed = (now - last_payment).num_days();
    (elapsed - periodicity.cycle_days()).max(0)
}

/// Parses a stored or device-provided payment date.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) and `YYYY-MM-DD` (midnight UTC).
#[must_use]
pub fn parse_payment_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// Loosely typed variant of [`overdue_days`].
///
/// An unparsable date yields 0; an unknown periodicity falls back to the
/// monthly cycle.
#[must_use]
pub fn overdue_days_from_str(
    last_payment: Option<&str>,
    periodicity: &str,
    now: DateTime<Utc>,
) -> i64 {
    let periodicity = periodicity.parse().unwrap_or(Periodicity::Monthly);
    overdue_days(last_payment.and_then(parse_payment_date), periodicity, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case(10, Periodicity::Weekly, 3)]
    #[case(10, Periodicity::Monthly, 0)]
    #[case(10, Periodicity::Biweekly, 0)]
    #[case(7, Periodicity::Weekly, 0)]
    #[case(8, Periodicity::Weekly, 1)]
    #[case(45, Periodicity::Biweekly, 30)]
    #[case(95, Periodicity::Monthly, 65)]
    fn test_overdue_days(#[case] days_ago: i64, #[case] periodicity: Periodicity, #[case] expected: i64) {
        let last = now() - Duration::days(days_ago);
        assert_eq!(overdue_days(Some(last), periodicity, now()), expected);
    }

    #[test]
    fn test_partial_days_are_floored() {
        let last = now() - Duration::days(9) - Duration::hours(23);
        assert_eq!(overdue_days(Some(last), Periodicity::Weekly, now()), 2);
    }

    #[test]
    fn test_absent_date_is_not_overdue() {
        assert_eq!(overdue_days(None, Periodicity::Weekly, now()), 0);
    }

    #[test]
    fn test_future_date_is_not_overdue() {
        let last = now() + Duration::days(3);
        assert_eq!(overdue_days(Some(last), Periodicity::Weekly, now()), 0);
    }

    #[rstest]
    #[case(Some("2026-03-05T12:00:00Z"), "semanal", 3)]
    #[case(Some("2026-03-05T12:00:00Z"), "mensual", 0)]
    #[case(Some("2026-03-05 12:00:00"), "weekly", 3)]
    #[case(Some("2026-03-01"), "semanal", 7)]
    #[case(Some("not a date"), "semanal", 0)]
    #[case(None, "semanal", 0)]
    #[case(Some("2026-01-01"), "anual", 43)]
    fn test_overdue_days_from_str(
        #[case] last: Option<&str>,
        #[case] periodicity: &str,
        #[case] expected: i64,
    ) {
        assert_eq!(overdue_days_from_str(last, periodicity, now()), expected);
    }
}
