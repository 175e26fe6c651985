mod birthdays;
mod dates;
mod intent;
mod links;
mod matcher;
mod reports;
mod structs;

pub use birthdays::{birthdays_on, short_birthday};
pub use dates::{is_on, normalize};
pub use intent::{classify, Intent, Rule, RULES};
pub use links::{extract_url, LinkKind};
pub use matcher::{match_member, Match};
pub use reports::{
    budget_link, chapter_attendance, requirements, ritual_attendance, todays_events,
    upcoming_events,
};
pub use structs::{EventRow, MemberRow, SheetCategory, Table, Worksheet};

/// Title of the worksheet holding the events calendar.
pub const CALENDAR_WORKSHEET: &str = "Semester Calendar";
