//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Wiki-Ripple database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per visited page
CREATE TABLE IF NOT EXISTS page (
    page_id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_url TEXT NOT NULL,
    page_title TEXT NOT NULL,
    page_content TEXT NOT NULL,
    added_in TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_url ON page(page_url);

-- Link edges discovered on a page
CREATE TABLE IF NOT EXISTS link (
    link_id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES page(page_id),
    link TEXT NOT NULL,
    language TEXT,
    added_in TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_link_page ON link(page_id);

-- Media referenced from a page body
CREATE TABLE IF NOT EXISTS file (
    file_id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES page(page_id),
    file_url TEXT NOT NULL,
    added_in TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_file_page ON file(page_id, file_url);
"#;

/// Drops every table, children first
pub const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS file;
DROP TABLE IF EXISTS link;
DROP TABLE IF EXISTS page;
"#;

/// Creates any missing table
///
/// Existing data is kept, so a database can be reopened for statistics.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}

/// Drops all tables and creates them empty
pub fn reset_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["page", "link", "file"] {
            assert!(table_exists(&conn, table), "Table {} should exist", table);
        }
    }

    #[test]
    fn test_reset_clears_rows() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO page (page_url, page_title, page_content, added_in) VALUES ('u', 't', 'c', 'now')",
            [],
        )
        .unwrap();

        reset_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM page", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(table_exists(&conn, "file"));
    }
}
