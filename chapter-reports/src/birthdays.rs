use chrono::NaiveDate;

use crate::Table;

const BIRTHDAY_COLUMN: usize = 4;

/// Reduces a roster birthday ("September 13th") to the `%b %-d` form ("Sep 13").
#[must_use]
pub fn short_birthday(cell: &str) -> Option<String> {
    let mut parts = cell.split_whitespace();
    let month = parts.next()?;
    let day = parts.next()?;

    let month: String = month.chars().take(3).collect();
    // "1st" keeps one digit, "13th" and "13" keep two
    let digits = if day.chars().count() == 3 { 1 } else { 2 };
    let day: String = day.chars().take(digits).collect();

    Some(format!("{month} {day}"))
}

/// Lowercased "first last" names of active members whose birthday is `today`.
#[must_use]
pub fn birthdays_on(roster: &Table, today: NaiveDate) -> Vec<String> {
    let today = today.format("%b %-d").to_string();

    roster
        .rows
        .iter()
        .filter(|row| {
            row.get(BIRTHDAY_COLUMN)
                .and_then(|cell| short_birthday(cell))
                .is_some_and(|birthday| birthday == today)
        })
        .map(|row| {
            let first = row.first().map_or("", |cell| cell.trim());
            let last = row.get(1).map_or("", |cell| cell.trim());
            format!("{first} {last}").to_lowercase()
        })
        .collect()
}
