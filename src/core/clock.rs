use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::ports::Clock;

/// IST (UTC+5:30)，工廠所在地時區
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Calendar date at a fixed offset from UTC.
pub fn today_in<C: Clock + ?Sized>(clock: &C, utc_offset_minutes: i32) -> NaiveDate {
    (clock.now_utc() + Duration::minutes(utc_offset_minutes as i64)).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_rolls_over_before_utc_midnight() {
        // 18:45 UTC 已是 IST 隔天 00:15
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 9, 18, 45, 0).unwrap());
        assert_eq!(
            today_in(&clock, DEFAULT_UTC_OFFSET_MINUTES),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
        assert_eq!(
            today_in(&clock, 0),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
    }

    #[test]
    fn test_negative_offset() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap());
        assert_eq!(
            today_in(&clock, -300),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }
}
