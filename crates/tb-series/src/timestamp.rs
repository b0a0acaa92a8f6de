//! Date/Time cell parsing.
//!
//! Loggers export either a full date-time in the Time column or a time of
//! day next to a Date column; both are accepted.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%d.%m.%Y %H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%I:%M:%S %p", "%H:%M"];

pub fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
}

/// A Date cell, which may also carry a (midnight) time component.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
        .or_else(|| parse_datetime(cell).map(|dt| dt.date()))
}

pub fn parse_time_of_day(cell: &str) -> Option<NaiveTime> {
    let cell = cell.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(cell, fmt).ok())
}

/// Absolute instant of a sample from its Date and Time cells.
pub fn parse_timestamp(date_cell: &str, time_cell: &str) -> Option<NaiveDateTime> {
    if let Some(dt) = parse_datetime(time_cell) {
        return Some(dt);
    }
    let time = parse_time_of_day(time_cell)?;
    let date = parse_date(date_cell)?;
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn full_datetime_in_time_column() {
        assert_eq!(
            parse_timestamp("", "2024-03-18 09:15:02"),
            Some(ymd_hms(2024, 3, 18, 9, 15, 2))
        );
        assert_eq!(
            parse_timestamp("", "2024-03-18T09:15:02.500"),
            Some(ymd_hms(2024, 3, 18, 9, 15, 2) + chrono::Duration::milliseconds(500))
        );
    }

    #[test]
    fn time_of_day_with_date_column() {
        assert_eq!(
            parse_timestamp("3/18/2024", "09:15:02"),
            Some(ymd_hms(2024, 3, 18, 9, 15, 2))
        );
        assert_eq!(
            parse_timestamp("2024-03-18", "9:15:02 PM"),
            Some(ymd_hms(2024, 3, 18, 21, 15, 2))
        );
    }

    #[test]
    fn date_cell_with_midnight_time() {
        assert_eq!(
            parse_date("2024-03-18 00:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 18)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_timestamp("2024-03-18", "soon"), None);
        assert_eq!(parse_timestamp("yesterday", "09:15:02"), None);
    }
}
