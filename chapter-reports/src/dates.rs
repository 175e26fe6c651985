use chrono::{Datelike, Month, NaiveDate};

use crate::EventRow;

/// Turns a calendar month name and an ordinal day ("September", "12th") into a
/// date in `year`.
#[must_use]
pub fn normalize(month: &str, day: &str, year: i32) -> Option<NaiveDate> {
    let month = month.trim().parse::<Month>().ok()?;
    let day = day
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .parse::<u32>()
        .ok()?;

    NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
}

/// Whether the event is scheduled on `today`, either by a raw `MM/DD` date
/// cell or by its month name and ordinal day.
#[must_use]
pub fn is_on(event: &EventRow, today: NaiveDate) -> bool {
    event.date == today.format("%m/%d").to_string()
        || normalize(&event.month, &event.date, today.year()) == Some(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ordinal_days_and_month_names() {
        assert_eq!(normalize("September", "12th", 2023), Some(date(2023, 9, 12)));
        assert_eq!(normalize("march", "1st", 2024), Some(date(2024, 3, 1)));
        assert_eq!(normalize(" Oct ", "22nd", 2024), Some(date(2024, 10, 22)));
        assert_eq!(normalize("October", "3", 2024), Some(date(2024, 10, 3)));
    }

    #[test]
    fn unparseable_cells() {
        assert_eq!(normalize("", "12th", 2023), None);
        assert_eq!(normalize("Smarch", "12th", 2023), None);
        assert_eq!(normalize("February", "30th", 2023), None);
        assert_eq!(normalize("February", "TBD", 2023), None);
    }

    #[test]
    fn today_matches_either_layout() {
        let today = date(2026, 10, 14);
        let by_name = EventRow {
            month: "October".into(),
            date: "14th".into(),
            ..Default::default()
        };
        let by_number = EventRow {
            date: "10/14".into(),
            ..Default::default()
        };
        let other_day = EventRow {
            month: "October".into(),
            date: "15th".into(),
            ..Default::default()
        };

        assert!(is_on(&by_name, today));
        assert!(is_on(&by_number, today));
        assert!(!is_on(&other_day, today));
    }
}
