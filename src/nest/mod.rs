//! Nested transactions emulated with savepoints.
//!
//! [`Db`] wraps a pool, [`Conn`] a pooled connection and [`Tx`] a transaction
//! at any nesting depth. All three implement [`Querier`], so code that only
//! issues statements can take any of them.
//!
//! `begin_tx` on `Db` or `Conn` opens a real transaction. `begin_tx` on a
//! `Tx` creates a savepoint on the same native transaction and returns a
//! child that borrows its parent; the parent is unusable until the child is
//! committed, rolled back or dropped.
//!
//! ```ignore
//! let db = Db::connect("sqlite::memory:", &PoolOptions::default()).await?;
//! let ctx = Context::background();
//! let mut tx = db.begin_tx(&ctx, TxOptions::default()).await?;
//! let mut inner = tx.begin_tx(&ctx, TxOptions::default()).await?; // SAVEPOINT savept1x
//! inner.execute(&ctx, "DELETE FROM t", &[]).await?;
//! inner.rollback().await?; // ROLLBACK TO SAVEPOINT savept1x
//! tx.commit().await?;
//! ```

mod conn;
mod db;
mod querier;
mod tx;

pub use conn::Conn;
pub use db::Db;
pub use querier::Querier;
pub use tx::{Tx, savepoint_name};

use crate::error::{DbError, DbResult};
use crate::models::DatabaseType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Options for a top-level transaction. Ignored when nesting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    /// Isolation level; `None` keeps the server default.
    pub isolation: Option<IsolationLevel>,
    pub read_only: bool,
}

impl TxOptions {
    pub fn isolation(mut self, level: IsolationLevel) -> Self {
        self.isolation = Some(level);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn is_default(&self) -> bool {
        self.isolation.is_none() && !self.read_only
    }

    /// `SET TRANSACTION` statement for these options, if any.
    pub(crate) fn set_transaction_sql(&self) -> Option<String> {
        let mut modes = Vec::with_capacity(2);
        if let Some(level) = self.isolation {
            modes.push(format!("ISOLATION LEVEL {}", level.as_sql()));
        }
        if self.read_only {
            modes.push("READ ONLY".to_string());
        }
        if modes.is_empty() {
            None
        } else {
            Some(format!("SET TRANSACTION {}", modes.join(", ")))
        }
    }

    /// Statements that give a just-begun transaction these options.
    ///
    /// PostgreSQL takes `SET TRANSACTION` as the first statement of the
    /// transaction. MySQL only applies it to the next transaction, so the
    /// empty one is committed and a new one started on the same connection;
    /// the native handle's COMMIT or ROLLBACK then finishes the new one.
    pub(crate) fn apply_statements(&self, db_type: DatabaseType) -> Vec<String> {
        let Some(set) = self.set_transaction_sql() else {
            return Vec::new();
        };
        match db_type {
            DatabaseType::PostgreSQL => vec![set],
            DatabaseType::MySQL => vec![
                "COMMIT".to_string(),
                set,
                "START TRANSACTION".to_string(),
            ],
            DatabaseType::SQLite => Vec::new(),
        }
    }

    /// Reject options the backend has no statement for.
    pub(crate) fn check_supported(&self, db_type: DatabaseType) -> DbResult<()> {
        if self.is_default() || db_type != DatabaseType::SQLite {
            return Ok(());
        }
        Err(DbError::invalid_input(format!(
            "{} does not support transaction options (isolation: {}, read_only: {})",
            db_type,
            self.isolation.map_or("default", |l| l.as_sql()),
            self.read_only
        )))
    }
}
