//! Native (top-level) database transactions.

use crate::db::executor::ConnectionRef;
use crate::error::{DbError, DbResult};
use crate::models::DatabaseType;
use sqlx::{MySql, Postgres, Sqlite, Transaction};

/// Database-specific transaction wrapper.
///
/// `'c` is the lifetime of the connection the transaction runs on; it is
/// `'static` when the transaction owns a connection checked out of a pool.
/// Dropping an unfinished transaction rolls it back.
pub enum DbTransaction<'c> {
    /// MySQL transaction
    MySql(Transaction<'c, MySql>),
    /// PostgreSQL transaction
    Postgres(Transaction<'c, Postgres>),
    /// SQLite transaction
    SQLite(Transaction<'c, Sqlite>),
}

impl std::fmt::Debug for DbTransaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DbTransaction").field(&self.db_type()).finish()
    }
}

impl<'c> DbTransaction<'c> {
    /// Get the database type for this transaction.
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbTransaction::MySql(_) => DatabaseType::MySQL,
            DbTransaction::Postgres(_) => DatabaseType::PostgreSQL,
            DbTransaction::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// Borrow the connection the transaction runs on.
    pub fn connection(&mut self) -> ConnectionRef<'_> {
        match self {
            DbTransaction::MySql(tx) => ConnectionRef::MySql(&mut **tx),
            DbTransaction::Postgres(tx) => ConnectionRef::Postgres(&mut **tx),
            DbTransaction::SQLite(tx) => ConnectionRef::SQLite(&mut **tx),
        }
    }

    /// Commit the transaction.
    pub async fn commit(self) -> DbResult<()> {
        crate::db_dispatch!(DbTransaction, self, tx => tx.commit().await.map_err(DbError::from))
    }

    /// Rollback the transaction.
    pub async fn rollback(self) -> DbResult<()> {
        crate::db_dispatch!(DbTransaction, self, tx => tx.rollback().await.map_err(DbError::from))
    }
}
