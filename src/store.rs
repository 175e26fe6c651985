//! The persisted events/roster/budget links.
//!
//! All three links live in a single row with id 1. The row is created by the
//! first update and changed in place afterwards.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chapter_reports::{extract_url, LinkKind};
use rusqlite::{params, Connection, OptionalExtension};

use crate::Result;

pub trait LinkStore: Send + Sync {
    fn get(&self, kind: LinkKind) -> Result<Option<String>>;

    /// Extracts the link from chat text and stores it. Returns the stored URL,
    /// or `None` (leaving the record untouched) when the text has no link.
    fn set(&self, kind: LinkKind, text: &str) -> Result<Option<String>>;
}

pub struct SqliteLinkStore {
    conn: Mutex<Connection>,
}

impl SqliteLinkStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS links (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                events_url  TEXT,
                roster_url  TEXT,
                budget_url  TEXT
            );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl LinkStore for SqliteLinkStore {
    fn get(&self, kind: LinkKind) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let url = conn
            .query_row(
                &format!("SELECT {} FROM links WHERE id = 1", kind.column()),
                [],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;

        Ok(url.flatten())
    }

    fn set(&self, kind: LinkKind, text: &str) -> Result<Option<String>> {
        let Some(url) = extract_url(text) else {
            return Ok(None);
        };

        let column = kind.column();
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            &format!(
                "INSERT INTO links (id, {column}) VALUES (1, ?1)
                 ON CONFLICT(id) DO UPDATE SET {column} = excluded.{column}"
            ),
            params![url],
        )?;

        Ok(Some(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_links() {
        let store = SqliteLinkStore::in_memory().unwrap();

        assert_eq!(store.get(LinkKind::Events).unwrap(), None);
        assert_eq!(store.get(LinkKind::Budget).unwrap(), None);
    }

    #[test]
    fn updates_share_one_record() {
        let store = SqliteLinkStore::in_memory().unwrap();

        store
            .set(LinkKind::Roster, "update roster <https://docs.google.com/spreadsheets/d/r1/edit>")
            .unwrap();
        store
            .set(LinkKind::Budget, "update budget <https://docs.google.com/spreadsheets/d/b1|budget>")
            .unwrap();
        store
            .set(LinkKind::Roster, "update roster <https://docs.google.com/spreadsheets/d/r2/edit>")
            .unwrap();

        assert_eq!(
            store.get(LinkKind::Roster).unwrap().as_deref(),
            Some("https://docs.google.com/spreadsheets/d/r2/edit")
        );
        assert_eq!(
            store.get(LinkKind::Budget).unwrap().as_deref(),
            Some("https://docs.google.com/spreadsheets/d/b1")
        );
        assert_eq!(store.get(LinkKind::Events).unwrap(), None);

        let conn = store.conn.lock().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn text_without_link_changes_nothing() {
        let store = SqliteLinkStore::in_memory().unwrap();
        store.set(LinkKind::Events, "update calendar <https://x.com/cal>").unwrap();

        assert_eq!(store.set(LinkKind::Events, "update calendar please").unwrap(), None);
        assert_eq!(
            store.get(LinkKind::Events).unwrap().as_deref(),
            Some("https://x.com/cal")
        );
    }
}
