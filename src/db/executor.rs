//! Statement execution on a single connection.
//!
//! Every operation runs on a borrowed connection: a pooled connection, or the
//! connection owned by an open transaction. Pool-level calls check out a
//! connection first.
//!
//! # Architecture
//!
//! The backend modules below are generated from one template and differ only
//! in their sqlx types and parameter binder. [`ConnectionRef`] picks the
//! module for the backend it borrows.

use crate::db::params::{bind_mysql_param, bind_postgres_param, bind_sqlite_param};
use crate::db::row::DbRow;
use crate::error::DbResult;
use crate::models::{DatabaseType, ExecResult, PreparedStatement, SqlValue};
use sqlx::{MySqlConnection, PgConnection, SqliteConnection};
use tracing::trace;

/// Generates a backend module with the same interface for each database.
macro_rules! backend_ops {
    ($module:ident, $conn:ty, $row:ty, $bind:ident) => {
        pub(crate) mod $module {
            use super::*;
            use sqlx::{Column, Executor, Statement};

            pub async fn execute(
                conn: &mut $conn,
                sql: &str,
                params: &[SqlValue],
            ) -> DbResult<ExecResult> {
                // Without params, run raw SQL: some statements (savepoints,
                // SET TRANSACTION) can't be prepared on every backend
                let result = if params.is_empty() {
                    conn.execute(sql).await?
                } else {
                    let mut query = sqlx::query(sql);
                    for param in params {
                        query = $bind(query, param);
                    }
                    query.execute(&mut *conn).await?
                };
                Ok(ExecResult {
                    rows_affected: result.rows_affected(),
                })
            }

            pub async fn fetch_all(
                conn: &mut $conn,
                sql: &str,
                params: &[SqlValue],
            ) -> DbResult<Vec<$row>> {
                let rows = if params.is_empty() {
                    conn.fetch_all(sql).await?
                } else {
                    let mut query = sqlx::query(sql);
                    for param in params {
                        query = $bind(query, param);
                    }
                    query.fetch_all(&mut *conn).await?
                };
                Ok(rows)
            }

            pub async fn fetch_optional(
                conn: &mut $conn,
                sql: &str,
                params: &[SqlValue],
            ) -> DbResult<Option<$row>> {
                let row = if params.is_empty() {
                    conn.fetch_optional(sql).await?
                } else {
                    let mut query = sqlx::query(sql);
                    for param in params {
                        query = $bind(query, param);
                    }
                    query.fetch_optional(&mut *conn).await?
                };
                Ok(row)
            }

            pub async fn prepare(conn: &mut $conn, sql: &str) -> DbResult<PreparedStatement> {
                let statement = conn.prepare(sql).await?;
                Ok(PreparedStatement {
                    sql: statement.sql().to_string(),
                    columns: statement
                        .columns()
                        .iter()
                        .map(|c| c.name().to_string())
                        .collect(),
                })
            }

            pub async fn ping(conn: &mut $conn) -> DbResult<()> {
                sqlx::Connection::ping(conn).await?;
                Ok(())
            }
        }
    };
}

backend_ops!(mysql, MySqlConnection, sqlx::mysql::MySqlRow, bind_mysql_param);
backend_ops!(postgres, PgConnection, sqlx::postgres::PgRow, bind_postgres_param);
backend_ops!(sqlite, SqliteConnection, sqlx::sqlite::SqliteRow, bind_sqlite_param);

/// Mutable borrow of a live connection of any backend.
pub enum ConnectionRef<'a> {
    MySql(&'a mut MySqlConnection),
    Postgres(&'a mut PgConnection),
    SQLite(&'a mut SqliteConnection),
}

impl ConnectionRef<'_> {
    pub fn db_type(&self) -> DatabaseType {
        match self {
            ConnectionRef::MySql(_) => DatabaseType::MySQL,
            ConnectionRef::Postgres(_) => DatabaseType::PostgreSQL,
            ConnectionRef::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// Execute a statement that returns no rows.
    pub async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> DbResult<ExecResult> {
        trace!(sql = %sql, params = params.len(), "Executing statement");
        match self {
            ConnectionRef::MySql(c) => mysql::execute(c, sql, params).await,
            ConnectionRef::Postgres(c) => postgres::execute(c, sql, params).await,
            ConnectionRef::SQLite(c) => sqlite::execute(c, sql, params).await,
        }
    }

    /// Run a query and collect every row.
    pub async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<DbRow>> {
        trace!(sql = %sql, params = params.len(), "Executing query");
        let rows = match self {
            ConnectionRef::MySql(c) => mysql::fetch_all(c, sql, params)
                .await?
                .into_iter()
                .map(DbRow::MySql)
                .collect(),
            ConnectionRef::Postgres(c) => postgres::fetch_all(c, sql, params)
                .await?
                .into_iter()
                .map(DbRow::Postgres)
                .collect(),
            ConnectionRef::SQLite(c) => sqlite::fetch_all(c, sql, params)
                .await?
                .into_iter()
                .map(DbRow::SQLite)
                .collect(),
        };
        Ok(rows)
    }

    /// Run a query and return its first row, if any.
    pub async fn fetch_optional(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Option<DbRow>> {
        trace!(sql = %sql, params = params.len(), "Executing single-row query");
        let row = match self {
            ConnectionRef::MySql(c) => mysql::fetch_optional(c, sql, params)
                .await?
                .map(DbRow::MySql),
            ConnectionRef::Postgres(c) => postgres::fetch_optional(c, sql, params)
                .await?
                .map(DbRow::Postgres),
            ConnectionRef::SQLite(c) => sqlite::fetch_optional(c, sql, params)
                .await?
                .map(DbRow::SQLite),
        };
        Ok(row)
    }

    pub async fn prepare(&mut self, sql: &str) -> DbResult<PreparedStatement> {
        match self {
            ConnectionRef::MySql(c) => mysql::prepare(c, sql).await,
            ConnectionRef::Postgres(c) => postgres::prepare(c, sql).await,
            ConnectionRef::SQLite(c) => sqlite::prepare(c, sql).await,
        }
    }

    pub async fn ping(&mut self) -> DbResult<()> {
        match self {
            ConnectionRef::MySql(c) => mysql::ping(c).await,
            ConnectionRef::Postgres(c) => postgres::ping(c).await,
            ConnectionRef::SQLite(c) => sqlite::ping(c).await,
        }
    }
}
