//! Timestamp utilities
//!
//! Show start times are local wall-clock times stored at second precision.
//! Whether a show is past or upcoming is never stored; it is derived from
//! the current time on every read.

use chrono::{Local, NaiveDateTime, Timelike};

/// Storage format for show start times (lexical order == chronological order)
pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats accepted from the show form
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Current local time, truncated to whole seconds
pub fn now() -> NaiveDateTime {
    truncate(Local::now().naive_local())
}

/// Drop sub-second precision
pub fn truncate(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

/// Render a timestamp in the database storage format
pub fn to_db(value: NaiveDateTime) -> String {
    truncate(value).format(DB_FORMAT).to_string()
}

/// Parse a start time submitted by a form
pub fn parse_input(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(truncate)
}

/// Past/upcoming classification of a show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTiming {
    Past,
    Upcoming,
}

impl ShowTiming {
    /// A show is upcoming only if it starts strictly after `now`
    pub fn classify(start_time: NaiveDateTime, now: NaiveDateTime) -> Self {
        if start_time > now {
            ShowTiming::Upcoming
        } else {
            ShowTiming::Past
        }
    }
}

/// Split items into (past, upcoming) by their start time, preserving order
pub fn partition_by_time<T, F>(items: Vec<T>, now: NaiveDateTime, start_time: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> NaiveDateTime,
{
    items
        .into_iter()
        .partition(|item| ShowTiming::classify(start_time(item), now) == ShowTiming::Past)
}

/// Display formats for start times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// `Monday May, 21, 2035 at 9:30PM`
    Full,
    /// `Mon 05, 21, 2035 9:30PM`
    Medium,
}

pub fn format_datetime(value: NaiveDateTime, format: DisplayFormat) -> String {
    let pattern = match format {
        DisplayFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        DisplayFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
    };
    value.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_classify() {
        let now = at(2030, 1, 1, 12, 0);
        assert_eq!(ShowTiming::classify(at(2030, 1, 1, 12, 1), now), ShowTiming::Upcoming);
        assert_eq!(ShowTiming::classify(at(2029, 12, 31, 23, 0), now), ShowTiming::Past);
        // Starting exactly now is no longer upcoming
        assert_eq!(ShowTiming::classify(now, now), ShowTiming::Past);
    }

    #[test]
    fn test_partition_keeps_order() {
        let now = at(2030, 6, 1, 0, 0);
        let shows = vec![
            at(2030, 1, 1, 20, 0),
            at(2031, 1, 1, 20, 0),
            at(2029, 1, 1, 20, 0),
            at(2032, 1, 1, 20, 0),
        ];
        let (past, upcoming) = partition_by_time(shows, now, |s| *s);
        assert_eq!(past, vec![at(2030, 1, 1, 20, 0), at(2029, 1, 1, 20, 0)]);
        assert_eq!(upcoming, vec![at(2031, 1, 1, 20, 0), at(2032, 1, 1, 20, 0)]);
    }

    #[test]
    fn test_parse_input_formats() {
        let expected = at(2035, 5, 21, 21, 30);
        assert_eq!(parse_input("2035-05-21 21:30:00"), Some(expected));
        assert_eq!(parse_input("2035-05-21 21:30"), Some(expected));
        assert_eq!(parse_input("2035-05-21T21:30"), Some(expected));
        assert_eq!(parse_input(" 2035-05-21T21:30:00 "), Some(expected));
        assert_eq!(parse_input("21/05/2035"), None);
        assert_eq!(parse_input(""), None);
    }

    #[test]
    fn test_to_db_is_sortable() {
        let a = to_db(at(2030, 9, 1, 9, 5));
        let b = to_db(at(2030, 10, 1, 9, 5));
        assert_eq!(a, "2030-09-01 09:05:00");
        assert!(a < b);
    }

    #[test]
    fn test_now_has_no_fraction() {
        assert_eq!(now().nanosecond(), 0);
    }

    #[test]
    fn test_format_datetime() {
        let value = at(2035, 5, 21, 21, 30);
        assert_eq!(
            format_datetime(value, DisplayFormat::Full),
            "Monday May, 21, 2035 at 9:30PM"
        );
        assert_eq!(
            format_datetime(value, DisplayFormat::Medium),
            "Mon 05, 21, 2035 9:30PM"
        );
    }
}
