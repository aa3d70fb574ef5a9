//! Parcel store contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate between `Parcel` records and rows of the `parcel` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every operation is a single SQL statement.
//! - Updates are unconditional; lifecycle rules belong to `ParcelService`.
//! - Deleting a missing parcel is not an error.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";

const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from parcel store operations.
///
/// `NotFound` is the only "absent" signal; every other variant is a storage
/// failure and is returned unchanged.
#[derive(Debug)]
pub enum StoreError {
    /// Parcel failed validation before a write.
    Validation(ParcelValidationError),
    /// Underlying SQLite failure.
    Db(DbError),
    /// No row exists for this number.
    NotFound(ParcelNumber),
    /// Persisted row cannot be converted into a `Parcel`.
    InvalidData(String),
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl StoreError {
    /// Returns whether this error means "no such parcel".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidData(message) => write!(f, "invalid persisted parcel data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "parcel store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "parcel store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParcelValidationError> for StoreError {
    fn from(value: ParcelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data access contract for parcel records.
pub trait ParcelStore {
    /// Inserts a parcel and returns its freshly assigned number.
    ///
    /// `parcel.number` is ignored.
    fn add(&self, parcel: &Parcel) -> StoreResult<ParcelNumber>;
    /// Loads one parcel, failing with `NotFound` when absent.
    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel>;
    /// Hard-deletes one parcel. Missing numbers are a no-op.
    fn delete(&self, number: ParcelNumber) -> StoreResult<()>;
    /// Overwrites the delivery address.
    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()>;
    /// Overwrites the status without transition checks.
    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> StoreResult<()>;
    /// Lists all parcels of one client in insertion order.
    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>>;
}

/// SQLite-backed parcel store borrowing a caller-owned connection.
pub struct SqliteParcelStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelStore<'conn> {
    /// Creates a store over any connection exposing the `parcel` table.
    ///
    /// Only the table shape is checked, never `PRAGMA user_version`.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_parcel_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelStore for SqliteParcelStore<'_> {
    fn add(&self, parcel: &Parcel) -> StoreResult<ParcelNumber> {
        parcel.validate()?;

        self.conn.execute(
            "INSERT INTO parcel (
                client,
                status,
                address,
                created_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address.as_str(),
                parcel.created_at.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"))?;

        let raw = stmt.query_row([number], read_raw_parcel).optional()?;
        match raw {
            Some(raw) => raw.into_parcel(),
            None => Err(StoreError::NotFound(number)),
        }
    }

    fn delete(&self, number: ParcelNumber) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM parcel WHERE number = ?1;", [number])?;
        Ok(())
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2;",
            params![address, number],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(number));
        }

        Ok(())
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2;",
            params![status.as_str(), number],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(number));
        }

        Ok(())
    }

    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PARCEL_SELECT_SQL}
             WHERE client = ?1
             ORDER BY number ASC;"
        ))?;

        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(read_raw_parcel(row)?.into_parcel()?);
        }

        Ok(parcels)
    }
}

/// Row image before status label parsing.
///
/// `query_row` closures can only fail with `rusqlite::Error`, so label
/// parsing happens after the row is read.
struct RawParcel {
    number: ParcelNumber,
    client: ClientId,
    status: String,
    address: String,
    created_at: String,
}

impl RawParcel {
    fn into_parcel(self) -> StoreResult<Parcel> {
        let status = ParcelStatus::parse(&self.status).ok_or_else(|| {
            StoreError::InvalidData(format!(
                "invalid status `{}` in parcel.status for number {}",
                self.status, self.number
            ))
        })?;

        Ok(Parcel {
            number: self.number,
            client: self.client,
            status,
            address: self.address,
            created_at: self.created_at,
        })
    }
}

fn read_raw_parcel(row: &Row<'_>) -> rusqlite::Result<RawParcel> {
    Ok(RawParcel {
        number: row.get("number")?,
        client: row.get("client")?,
        status: row.get("status")?,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_parcel_connection_ready(conn: &Connection) -> StoreResult<()> {
    if !table_exists(conn, PARCEL_TABLE)? {
        return Err(StoreError::MissingRequiredTable(PARCEL_TABLE));
    }

    for column in PARCEL_COLUMNS {
        if !table_has_column(conn, PARCEL_TABLE, column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: PARCEL_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
