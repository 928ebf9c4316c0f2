//! Backing store contract and the SQLite adapter.
//!
//! # Responsibility
//! - Define the table-level CRUD surface the dispatcher delegates to.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - Store errors are returned unmodified to dispatcher callers.
//! - Table names arrive already resolved by the router; stores do not route.

use crate::db::DbError;
use crate::model::values::{ContentValues, ResultSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure surfaced by a backing store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    EmptyValues { table: String },
    InvalidColumn(String),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyValues { table } => write!(f, "empty values for update on `{table}`"),
            Self::InvalidColumn(name) => write!(f, "invalid column name: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptyValues { .. } | Self::InvalidColumn(_) | Self::InvalidData(_) => None,
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

/// Read options forwarded to [`BackingStore::query`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreQuery<'a> {
    /// Columns to return; `None` returns every column.
    pub projection: Option<&'a [&'a str]>,
    /// Raw filter expression with `?` placeholders.
    pub selection: Option<&'a str>,
    pub selection_args: &'a [&'a str],
    pub group_by: Option<&'a str>,
    pub having: Option<&'a str>,
    pub sort_order: Option<&'a str>,
}

/// Table-level CRUD surface of the storage collaborator.
pub trait BackingStore {
    /// Inserts one row and returns the generated row id, if any.
    fn insert(&self, table: &str, values: &ContentValues) -> StoreResult<Option<i64>>;

    /// Updates rows matching `selection`; returns the affected count.
    fn update(
        &self,
        table: &str,
        values: &ContentValues,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> StoreResult<usize>;

    /// Deletes rows matching `selection`; returns the affected count.
    fn delete(
        &self,
        table: &str,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> StoreResult<usize>;

    fn query(&self, table: &str, query: &StoreQuery<'_>) -> StoreResult<ResultSet>;
}

impl<T: BackingStore + ?Sized> BackingStore for &T {
    fn insert(&self, table: &str, values: &ContentValues) -> StoreResult<Option<i64>> {
        (**self).insert(table, values)
    }

    fn update(
        &self,
        table: &str,
        values: &ContentValues,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> StoreResult<usize> {
        (**self).update(table, values, selection, selection_args)
    }

    fn delete(
        &self,
        table: &str,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> StoreResult<usize> {
        (**self).delete(table, selection, selection_args)
    }

    fn query(&self, table: &str, query: &StoreQuery<'_>) -> StoreResult<ResultSet> {
        (**self).query(table, query)
    }
}
