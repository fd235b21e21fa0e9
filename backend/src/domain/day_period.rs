//! Day boundaries for the medicine indicator.
//!
//! A "period" runs from the reset hour on one calendar day to the reset hour
//! on the next, so a dose given late in the evening still counts after
//! midnight until the next reset.

use chrono::{DateTime, Duration, LocalResult, NaiveTime, Offset, TimeZone, Timelike, Utc};

pub const DEFAULT_RESET_HOUR: u32 = 6;

/// Start of the period containing `now`, in the time zone `now` carries.
///
/// Before the reset hour the period began on the previous day. A reset hour
/// that falls into a DST gap is read with the offset in force just before the gap.
pub fn period_start<Tz: TimeZone>(now: &DateTime<Tz>, reset_hour: u32) -> DateTime<Utc> {
    let reset_hour = reset_hour.min(23);
    let local_now = now.naive_local();

    let mut day = local_now.date();
    if local_now.hour() < reset_hour {
        day -= Duration::days(1);
    }

    let boundary = day.and_time(NaiveTime::from_hms_opt(reset_hour, 0, 0).unwrap_or(NaiveTime::MIN));
    match now.timezone().from_local_datetime(&boundary) {
        LocalResult::Single(start) | LocalResult::Ambiguous(start, _) => start.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = now
                .timezone()
                .from_local_datetime(&(boundary - Duration::hours(1)))
                .earliest()
                .map(|before| before.offset().fix())
                .unwrap_or_else(|| now.offset().fix());
            let offset_seconds = i64::from(before_gap.local_minus_utc());
            (boundary - Duration::seconds(offset_seconds)).and_utc()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, NaiveDateTime};

    fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_before_reset_hour_uses_previous_day() {
        assert_eq!(period_start(&utc(15, 5, 59), 6), utc(14, 6, 0));
    }

    #[test]
    fn test_at_and_after_reset_hour_uses_today() {
        assert_eq!(period_start(&utc(15, 6, 0), 6), utc(15, 6, 0));
        assert_eq!(period_start(&utc(15, 6, 1), 6), utc(15, 6, 0));
        assert_eq!(period_start(&utc(15, 23, 59), 6), utc(15, 6, 0));
    }

    #[test]
    fn test_midnight_stays_in_previous_period() {
        assert_eq!(period_start(&utc(15, 0, 0), 6), utc(14, 6, 0));
    }

    #[test]
    fn test_reset_hour_zero_is_midnight() {
        assert_eq!(period_start(&utc(15, 0, 0), 0), utc(15, 0, 0));
        assert_eq!(period_start(&utc(15, 13, 0), 0), utc(15, 0, 0));
    }

    #[test]
    fn test_boundary_follows_local_offset() {
        // 05:30 in UTC-4 is before the local reset, even though it is 09:30 UTC
        let eastern = FixedOffset::west_opt(4 * 3600).unwrap();
        let now = eastern.with_ymd_and_hms(2025, 6, 15, 5, 30, 0).unwrap();
        assert_eq!(period_start(&now, 6), utc(14, 10, 0));
    }

    /// +01:00 until 2025-03-30 05:00 UTC, +02:00 after; local 06:00-07:00 that day never occurs
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        fn transition() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2025, 3, 30).unwrap().and_hms_opt(5, 0, 0).unwrap()
        }

        fn winter() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::east_opt(2 * 3600).unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let gap_start = Self::transition() + Duration::hours(1);
            if *local < gap_start {
                LocalResult::Single(Self::winter())
            } else if *local < gap_start + Duration::hours(1) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::summer())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::transition() {
                Self::winter()
            } else {
                Self::summer()
            }
        }
    }

    #[test]
    fn test_reset_hour_inside_dst_gap() {
        // 09:00 summer time, the 06:00 reset was skipped by the clock change
        let now = SpringForward.with_ymd_and_hms(2025, 3, 30, 9, 0, 0).unwrap();
        let start = period_start(&now, 6);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 30, 5, 0, 0).unwrap());

        // The boundary is the moment the clocks jumped
        let dose = SpringForward.with_ymd_and_hms(2025, 3, 30, 7, 0, 0).unwrap();
        assert_eq!(dose.with_timezone(&Utc), start);
    }

    #[test]
    fn test_before_reset_on_dst_day_uses_previous_day() {
        let now = SpringForward.with_ymd_and_hms(2025, 3, 30, 5, 30, 0).unwrap();
        assert_eq!(period_start(&now, 6), Utc.with_ymd_and_hms(2025, 3, 29, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_month_rollover() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 3, 0, 0).unwrap();
        assert_eq!(period_start(&now, 6), utc(30, 6, 0));
    }
}
