use chrono::prelude::*;
use chrono_tz::Tz;

/// The calendar date of the given timestamp in the given timezone
pub fn date_in_timezone(timestamp_millis: i64, tz: &Tz) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .with_timezone(tz)
        .date_naive()
}

/// Accepts either a plain `YYYY-MM-DD` date or an RFC3339 / ISO datetime,
/// in which case only the date part is kept.
pub fn parse_date(datestr: &str) -> anyhow::Result<NaiveDate> {
    let datestr = datestr.trim();
    if let Ok(date) = NaiveDate::parse_from_str(datestr, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(datestr) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(datestr, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.date());
    }
    Err(anyhow::Error::msg(format!("Invalid date: {}", datestr)))
}

/// Accepts `HH:MM` and `HH:MM:SS`
pub fn parse_time(timestr: &str) -> anyhow::Result<NaiveTime> {
    let timestr = timestr.trim();
    NaiveTime::parse_from_str(timestr, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(timestr, "%H:%M:%S"))
        .map_err(|_| anyhow::Error::msg(format!("Invalid time: {}", timestr)))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_plain_and_iso_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(parse_date("2025-12-25").unwrap(), expected);
        assert_eq!(parse_date("2025-12-25T18:30:00").unwrap(), expected);
        assert_eq!(parse_date("2025-12-25T18:30:00+02:00").unwrap(), expected);
        assert!(parse_date("25/12/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn today_depends_on_timezone() {
        // 2025-12-24T23:30:00Z is already the 25th in Jerusalem
        let ts = Utc
            .with_ymd_and_hms(2025, 12, 24, 23, 30, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            date_in_timezone(ts, &chrono_tz::UTC),
            NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()
        );
        assert_eq!(
            date_in_timezone(ts, &chrono_tz::Asia::Jerusalem),
            NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()
        );
    }

    #[test]
    fn it_parses_times() {
        let expected = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
        assert_eq!(parse_time("18:30").unwrap(), expected);
        assert_eq!(parse_time(" 18:30:00 ").unwrap(), expected);
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("evening").is_err());
    }

    #[test]
    fn formats_for_messages() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(&date), "05/01/2025");
        let time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert_eq!(format_time(&time), "18:00");
    }
}
