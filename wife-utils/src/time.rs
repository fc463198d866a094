use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};

/// Next instant strictly after `now` whose wall-clock time in `now`'s zone is
/// `cutoff_hour:00:00`.
///
/// When the cutoff falls into a DST gap the first valid instant after it is
/// used; when it is ambiguous the earlier instant wins.
pub fn next_cutoff<Tz: TimeZone>(now: &DateTime<Tz>, cutoff_hour: u32) -> DateTime<Tz> {
    let hour = cutoff_hour.min(23);
    let tz = now.timezone();

    now.date_naive()
        .iter_days()
        .take(3)
        .filter_map(|date| date.and_hms_opt(hour, 0, 0))
        .filter_map(|naive| resolve_local(&tz, naive))
        .find(|candidate| candidate > now)
        .unwrap_or_else(|| now.clone() + Duration::days(1))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=2).find_map(|shift| {
        tz.from_local_datetime(&(naive + Duration::hours(shift)))
            .earliest()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc};
    use chrono_tz::America::{New_York, Sao_Paulo};

    fn local(offset_hours: i32) -> FixedOffset {
        FixedOffset::east_opt(offset_hours * 3600).unwrap()
    }

    #[test]
    fn late_evening_rolls_to_next_midnight() {
        let tz = local(8);
        let now = tz.with_ymd_and_hms(2025, 4, 10, 23, 59, 0).unwrap();

        assert_eq!(
            next_cutoff(&now, 0),
            tz.with_ymd_and_hms(2025, 4, 11, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn just_after_midnight_rolls_to_next_day() {
        let tz = local(8);
        let now = tz.with_ymd_and_hms(2025, 4, 10, 0, 1, 0).unwrap();

        assert_eq!(
            next_cutoff(&now, 0),
            tz.with_ymd_and_hms(2025, 4, 11, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn before_cutoff_expires_same_day() {
        let tz = local(-5);
        let now = tz.with_ymd_and_hms(2025, 4, 10, 3, 30, 0).unwrap();

        assert_eq!(
            next_cutoff(&now, 4),
            tz.with_ymd_and_hms(2025, 4, 10, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn exactly_at_cutoff_rolls_to_next_day() {
        let tz = local(0);
        let now = tz.with_ymd_and_hms(2025, 4, 10, 4, 0, 0).unwrap();

        assert_eq!(
            next_cutoff(&now, 4),
            tz.with_ymd_and_hms(2025, 4, 11, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn uses_local_wall_clock_not_utc() {
        // 20:00 UTC is already 04:00 on the next day at UTC+8.
        let tz = local(8);
        let now = tz.with_ymd_and_hms(2025, 4, 11, 4, 0, 0).unwrap();
        let expiry = next_cutoff(&now, 6);

        assert_eq!(expiry.hour(), 6);
        assert_eq!(expiry, tz.with_ymd_and_hms(2025, 4, 11, 6, 0, 0).unwrap());
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        let tz = local(0);
        let now = tz.with_ymd_and_hms(2024, 12, 31, 22, 0, 0).unwrap();

        assert_eq!(
            next_cutoff(&now, 5),
            tz.with_ymd_and_hms(2025, 1, 1, 5, 0, 0).unwrap()
        );
    }

    #[test]
    fn cutoff_in_spring_gap_moves_to_first_valid_hour() {
        // 02:00 does not exist in New York on 2025-03-09.
        let now = New_York.with_ymd_and_hms(2025, 3, 8, 23, 0, 0).unwrap();
        let expiry = next_cutoff(&now, 2);

        assert_eq!(expiry, New_York.with_ymd_and_hms(2025, 3, 9, 3, 0, 0).unwrap());
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 3, 9, 7, 0, 0).unwrap());
    }

    #[test]
    fn ambiguous_cutoff_in_autumn_fold_takes_earlier_instant() {
        // 01:00 happens twice in New York on 2025-11-02.
        let now = New_York.with_ymd_and_hms(2025, 11, 1, 23, 0, 0).unwrap();
        let expiry = next_cutoff(&now, 1);

        assert_eq!(expiry.hour(), 1);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 11, 2, 5, 0, 0).unwrap());
    }

    #[test]
    fn midnight_cutoff_skipped_by_dst_lands_at_one() {
        // Sao Paulo jumped from 00:00 to 01:00 on 2018-11-04.
        let now = Sao_Paulo.with_ymd_and_hms(2018, 11, 3, 23, 0, 0).unwrap();
        let expiry = next_cutoff(&now, 0);

        assert_eq!(expiry.hour(), 1);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2018, 11, 4, 3, 0, 0).unwrap());
    }
}
