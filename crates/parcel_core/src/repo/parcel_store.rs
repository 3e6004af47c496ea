//! Parcel store contract and SQLite implementation.
//!
//! # Responsibility
//! - Map `Parcel` records to rows of the `parcel` table.
//! - Assign parcel numbers on insert and answer point/client lookups.
//!
//! # Invariants
//! - Every operation is one SQL statement; no transactions span calls.
//! - Only the targeted row is ever written.
//! - `created_at` and `client` are written on insert only.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber};
use log::{debug, error};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_TABLE: &str = "parcel";
const PARCEL_COLUMNS: &[&str] = &["number", "client", "status", "address", "created_at"];

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by parcel store operations.
#[derive(Debug)]
pub enum StoreError {
    /// No parcel row matches the requested number.
    NotFound(ParcelNumber),
    /// Underlying database failure, passed through as-is.
    Db(DbError),
    /// A stored row could not be decoded into a `Parcel`.
    InvalidData(String),
    /// The connection was not bootstrapped through `open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// The bootstrapped schema lacks the named table.
    MissingRequiredTable(&'static str),
    /// The table exists but lacks one of the columns the store reads.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted parcel data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Record-level operations over persisted parcels.
///
/// Implementations must keep "does not exist" (`StoreError::NotFound`)
/// distinct from storage failures so callers can branch on it.
pub trait ParcelStore {
    /// Persists `parcel` and returns its newly assigned number.
    ///
    /// `parcel.number` is ignored.
    fn add(&self, parcel: &Parcel) -> StoreResult<ParcelNumber>;
    /// Loads one parcel exactly as stored.
    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel>;
    /// Lists every parcel of `client`, in no particular order.
    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>>;
    /// Replaces the address only. Unknown numbers yield `NotFound`.
    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()>;
    /// Replaces the status only, with no vocabulary check. Unknown numbers
    /// yield `NotFound`.
    fn set_status(&self, number: ParcelNumber, status: &str) -> StoreResult<()>;
    /// Removes the parcel. Removing an unknown number is a no-op.
    fn delete(&self, number: ParcelNumber) -> StoreResult<()>;
}

impl<S: ParcelStore + ?Sized> ParcelStore for &S {
    fn add(&self, parcel: &Parcel) -> StoreResult<ParcelNumber> {
        (**self).add(parcel)
    }

    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel> {
        (**self).get(number)
    }

    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>> {
        (**self).get_by_client(client)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()> {
        (**self).set_address(number, address)
    }

    fn set_status(&self, number: ParcelNumber, status: &str) -> StoreResult<()> {
        (**self).set_status(number, status)
    }

    fn delete(&self, number: ParcelNumber) -> StoreResult<()> {
        (**self).delete(number)
    }
}

/// SQLite-backed parcel store borrowing a bootstrapped connection.
pub struct SqliteParcelStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelStore for SqliteParcelStore<'_> {
    fn add(&self, parcel: &Parcel) -> StoreResult<ParcelNumber> {
        let result = self
            .conn
            .execute(
                "INSERT INTO parcel (client, status, address, created_at)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    parcel.client,
                    parcel.status.as_str(),
                    parcel.address.as_str(),
                    parcel.created_at.as_str(),
                ],
            )
            .map(|_| self.conn.last_insert_rowid())
            .map_err(StoreError::from);
        let number = log_failure("parcel_add", result)?;

        debug!(
            "event=parcel_add module=store status=ok number={number} client={}",
            parcel.client
        );
        Ok(number)
    }

    fn get(&self, number: ParcelNumber) -> StoreResult<Parcel> {
        log_failure("parcel_get", self.select_one(number))
    }

    fn get_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>> {
        log_failure("parcel_get_by_client", self.select_by_client(client))
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE parcel SET address = ?1 WHERE number = ?2;",
                params![address, number],
            )
            .map_err(StoreError::from);
        finish_update("parcel_set_address", number, changed)
    }

    fn set_status(&self, number: ParcelNumber, status: &str) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE parcel SET status = ?1 WHERE number = ?2;",
                params![status, number],
            )
            .map_err(StoreError::from);
        finish_update("parcel_set_status", number, changed)
    }

    fn delete(&self, number: ParcelNumber) -> StoreResult<()> {
        let result = self
            .conn
            .execute("DELETE FROM parcel WHERE number = ?1;", [number])
            .map_err(StoreError::from);
        let removed = log_failure("parcel_delete", result)?;
        debug!("event=parcel_delete module=store status=ok number={number} removed={removed}");
        Ok(())
    }
}

impl SqliteParcelStore<'_> {
    fn select_one(&self, number: ParcelNumber) -> StoreResult<Parcel> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"))?;
        let mut rows = stmt.query([number])?;
        match rows.next()? {
            Some(row) => parse_parcel_row(row),
            None => Err(StoreError::NotFound(number)),
        }
    }

    fn select_by_client(&self, client: ClientId) -> StoreResult<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{PARCEL_SELECT_SQL} WHERE client = ?1;"))?;
        let mut rows = stmt.query([client])?;
        let mut parcels = Vec::new();
        while let Some(row) = rows.next()? {
            parcels.push(parse_parcel_row(row)?);
        }
        Ok(parcels)
    }
}

/// Logs storage and decode failures; `NotFound` is an answer, not a failure.
fn log_failure<T>(event: &str, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(err) = &result {
        if !err.is_not_found() {
            error!("event={event} module=store status=error error={err}");
        }
    }
    result
}

fn finish_update(
    event: &str,
    number: ParcelNumber,
    changed: StoreResult<usize>,
) -> StoreResult<()> {
    if log_failure(event, changed)? == 0 {
        debug!("event={event} module=store status=not_found number={number}");
        return Err(StoreError::NotFound(number));
    }
    debug!("event={event} module=store status=ok number={number}");
    Ok(())
}

fn parse_parcel_row(row: &Row<'_>) -> StoreResult<Parcel> {
    Ok(Parcel {
        number: column(row, "number")?,
        client: column(row, "client")?,
        status: column(row, "status")?,
        address: column(row, "address")?,
        created_at: column(row, "created_at")?,
    })
}

/// Reads one column, reporting values of the wrong shape as `InvalidData`.
fn column<T: FromSql>(row: &Row<'_>, name: &str) -> StoreResult<T> {
    row.get(name).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(_, _, actual) => StoreError::InvalidData(format!(
            "unexpected {actual} value in parcel.{name}"
        )),
        rusqlite::Error::FromSqlConversionFailure(_, actual, source) => StoreError::InvalidData(
            format!("unreadable {actual} value in parcel.{name}: {source}"),
        ),
        rusqlite::Error::IntegralValueOutOfRange(_, value) => {
            StoreError::InvalidData(format!("out-of-range value `{value}` in parcel.{name}"))
        }
        other => other.into(),
    })
}

fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [PARCEL_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(StoreError::MissingRequiredTable(PARCEL_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({PARCEL_TABLE});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if let Some(column) = PARCEL_COLUMNS
        .iter()
        .copied()
        .find(|column| !present.iter().any(|name| name.as_str() == *column))
    {
        return Err(StoreError::MissingRequiredColumn {
            table: PARCEL_TABLE,
            column,
        });
    }

    Ok(())
}
