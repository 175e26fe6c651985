/// Cell values of one worksheet with the first row taken as header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a roster table: blank header cells are dropped and every data row
    /// is cut (or padded with empty cells) to the number of remaining headers.
    #[must_use]
    pub fn from_roster_values(values: Vec<Vec<String>>) -> Self {
        let mut values = values.into_iter();

        let headers: Vec<String> = values
            .next()
            .unwrap_or_default()
            .into_iter()
            .filter(|header| !header.is_empty())
            .collect();

        let width = headers.len();
        let rows = values
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub title: String,
    pub table: Table,
}

impl Worksheet {
    #[must_use]
    pub fn category(&self) -> SheetCategory {
        SheetCategory::of(&self.title)
    }
}

/// What a roster worksheet holds, inferred from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetCategory {
    ChapterAttendance,
    Ritual,
    Requirement,
    ActiveRoster,
    Other,
}

impl SheetCategory {
    #[must_use]
    pub fn of(title: &str) -> Self {
        const REQUIREMENT_KEYWORDS: [&str; 4] = ["service", "professional", "fundraising", "rush"];
        const ROSTER_KEYWORDS: [&str; 2] = ["active brother", "active member"];

        let title = title.to_lowercase();

        if title.contains("chapter attendance") {
            Self::ChapterAttendance
        } else if title.contains("ritual") {
            Self::Ritual
        } else if REQUIREMENT_KEYWORDS.iter().any(|k| title.contains(k)) {
            Self::Requirement
        } else if ROSTER_KEYWORDS.iter().any(|k| title.contains(k)) {
            Self::ActiveRoster
        } else {
            Self::Other
        }
    }

    /// Attendance sheets end with a totals/notes column that is not an event.
    #[must_use]
    pub fn has_trailing_column(self) -> bool {
        matches!(self, Self::ChapterAttendance | Self::Ritual)
    }
}

/// The single roster row that belongs to the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub headers: Vec<String>,
    pub cells: Vec<String>,
}

impl MemberRow {
    /// Completed count (or absence count on attendance sheets) in column 1.
    #[must_use]
    pub fn count(&self) -> &str {
        self.cells.get(1).map_or("", |cell| cell.trim())
    }

    /// Event columns from index 2 onward, paired with their header.
    pub fn events(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(&self.cells)
            .skip(2)
            .map(|(header, cell)| (header.as_str(), cell.as_str()))
    }

    #[must_use]
    pub fn events_marked(&self, flag: &str) -> Vec<&str> {
        self.events()
            .filter(|(_, cell)| *cell == flag)
            .map(|(header, _)| header)
            .collect()
    }
}

/// One row of the events calendar: `[Month, Date, Time, Event, Location, ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRow {
    pub month: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub location: String,
}

impl EventRow {
    #[must_use]
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |idx: usize| cells.get(idx).map_or_else(String::new, |c| c.trim().to_string());

        Self {
            month: cell(0),
            date: cell(1),
            time: cell(2),
            name: cell(3),
            location: cell(4),
        }
    }

    /// Calendar rows after the first `skip` header/spacer rows.
    #[must_use]
    pub fn from_calendar(values: &[Vec<String>], skip: usize) -> Vec<Self> {
        values
            .iter()
            .skip(skip)
            .map(|row| Self::from_cells(row))
            .collect()
    }
}
