use crate::{MemberRow, SheetCategory, Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    Found(MemberRow),
    NotFound,
    /// More than one row survived the last-initial filter.
    Ambiguous(usize),
}

/// Finds the row of `display_name` ("First Last") in a roster worksheet.
///
/// Rows are kept when their first column contains the first name. For
/// attendance sheets the trailing column is dropped. When several rows remain,
/// the first column must also contain the first letter of the last name.
#[must_use]
pub fn match_member(table: &Table, display_name: &str, category: SheetCategory) -> Match {
    let mut names = display_name.split_whitespace();
    let Some(first_name) = names.next().map(str::to_lowercase) else {
        return Match::NotFound;
    };
    let last_initial = names
        .next()
        .and_then(|last| last.chars().next())
        .map(|initial| initial.to_lowercase().to_string());

    let mut headers = table.headers.clone();
    let mut rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .filter(|row| first_column(row).contains(&first_name))
        .cloned()
        .collect();

    if category.has_trailing_column() {
        headers.pop();
        for row in &mut rows {
            row.truncate(headers.len());
        }
    }

    if rows.len() > 1 {
        if let Some(initial) = &last_initial {
            rows.retain(|row| first_column(row).contains(initial.as_str()));
        }
    }

    match rows.len() {
        0 => Match::NotFound,
        1 => Match::Found(MemberRow {
            headers,
            cells: rows.swap_remove(0),
        }),
        count => Match::Ambiguous(count),
    }
}

fn first_column(row: &[String]) -> String {
    row.first().map(|cell| cell.to_lowercase()).unwrap_or_default()
}
