//! Versioned `parcel` schema.
//!
//! # Invariants
//! - Steps are ordered by strictly increasing `version`.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - `number` uses `AUTOINCREMENT`, so deleted numbers are never handed out again.

use super::open::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One forward-only schema change.
#[derive(Debug, Clone, Copy)]
pub struct SchemaStep {
    pub version: u32,
    /// Short label written to the migration log.
    pub name: &'static str,
    sql: &'static str,
}

const CREATE_PARCEL_TABLE: &str = "CREATE TABLE IF NOT EXISTS parcel (
    number INTEGER PRIMARY KEY AUTOINCREMENT,
    client INTEGER NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('registered', 'sent', 'delivered')),
    address TEXT NOT NULL,
    created_at TEXT NOT NULL
);";

// Serves `get_by_client`, which filters on client and orders by number.
const CREATE_CLIENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_parcel_client ON parcel (client, number);";

pub const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "parcel_table",
        sql: CREATE_PARCEL_TABLE,
    },
    SchemaStep {
        version: 2,
        name: "parcel_client_index",
        sql: CREATE_CLIENT_INDEX,
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the version recorded in `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Applies every step newer than the recorded version in one transaction.
///
/// Fails with `DbError::SchemaTooNew` for databases written by a newer build.
pub fn upgrade_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    for step in pending {
        info!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.name
        );
    }
    Ok(())
}
