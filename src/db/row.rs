//! Result rows.
//!
//! Rows are handed back as the backend's own sqlx row type; decoding stays
//! with sqlx's [`Row`] trait.

use crate::error::DbResult;
use crate::models::DatabaseType;
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, MySql, Postgres, Row, Sqlite, Type};

/// A row returned by any backend.
pub enum DbRow {
    MySql(MySqlRow),
    Postgres(PgRow),
    SQLite(SqliteRow),
}

impl std::fmt::Debug for DbRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbRow")
            .field("db_type", &self.db_type())
            .field("columns", &self.column_names())
            .finish()
    }
}

impl DbRow {
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbRow::MySql(_) => DatabaseType::MySQL,
            DbRow::Postgres(_) => DatabaseType::PostgreSQL,
            DbRow::SQLite(_) => DatabaseType::SQLite,
        }
    }

    pub fn len(&self) -> usize {
        crate::db_dispatch!(DbRow, self, row => row.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        crate::db_dispatch!(DbRow, self, row => row
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect())
    }

    /// Decode column `index` as a type every backend understands
    /// (`i64`, `String`, `bool`, `Option<_>` of those, ...).
    pub fn try_get<'r, T>(&'r self, index: usize) -> DbResult<T>
    where
        T: Decode<'r, MySql>
            + Type<MySql>
            + Decode<'r, Postgres>
            + Type<Postgres>
            + Decode<'r, Sqlite>
            + Type<Sqlite>,
    {
        let value = match self {
            DbRow::MySql(row) => row.try_get(index)?,
            DbRow::Postgres(row) => row.try_get(index)?,
            DbRow::SQLite(row) => row.try_get(index)?,
        };
        Ok(value)
    }

    pub fn as_mysql(&self) -> Option<&MySqlRow> {
        match self {
            DbRow::MySql(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_postgres(&self) -> Option<&PgRow> {
        match self {
            DbRow::Postgres(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_sqlite(&self) -> Option<&SqliteRow> {
        match self {
            DbRow::SQLite(row) => Some(row),
            _ => None,
        }
    }
}
