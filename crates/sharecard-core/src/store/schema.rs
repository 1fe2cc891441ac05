//! SQLite schema for the share record store.

use rusqlite::{Connection, OptionalExtension, Result};

/// Current schema version. Increment when making breaking changes.
pub const SCHEMA_VERSION: i32 = 1;

/// Bring a database up to the current share store schema.
///
/// Creates the record table and its expiry index on first open.
pub fn init_schema(conn: &Connection) -> Result<()> {
    if stored_share_schema(conn)? < SCHEMA_VERSION {
        create_tables(conn)?;
        record_share_schema(conn, SCHEMA_VERSION)?;
    }

    Ok(())
}

/// Schema version recorded in the share store's metadata row, or 0 for a
/// database no share store has opened yet.
fn stored_share_schema(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS share_store_meta (
            schema_version INTEGER NOT NULL
        )",
        [],
    )?;

    let version = conn
        .query_row("SELECT schema_version FROM share_store_meta LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Replace the metadata row so the share store opens at `version` next time.
fn record_share_schema(conn: &Connection, version: i32) -> Result<()> {
    conn.execute_batch("DELETE FROM share_store_meta")?;
    conn.execute(
        "INSERT INTO share_store_meta (schema_version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per share token; timestamps are unix milliseconds
        CREATE TABLE IF NOT EXISTS share_records (
            key TEXT PRIMARY KEY,
            snapshot TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_share_records_expires ON share_records(expires_at);
        "#,
    )
}
