//! Savepoint SQL templates.
//!
//! A [`Savepointer`] only renders text; it never touches the network. An empty
//! string from [`Savepointer::release`] means the dialect has no release
//! statement and committing a savepoint is a no-op.

use crate::dialect::Dialect;
use std::sync::Arc;

/// SQL text for creating, releasing and rolling back to a named savepoint.
pub trait Savepointer: Send + Sync + std::fmt::Debug {
    /// Statement establishing a savepoint.
    fn create(&self, name: &str) -> String;

    /// Statement discarding a savepoint on nested commit, or empty if the
    /// dialect has none.
    fn release(&self, name: &str) -> String;

    /// Statement undoing work back to the savepoint while keeping the
    /// enclosing transaction open.
    fn rollback_to(&self, name: &str) -> String;
}

/// `SAVEPOINT` / `RELEASE SAVEPOINT` / `ROLLBACK TO SAVEPOINT`
/// (PostgreSQL, MySQL, SQLite).
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSavepointer;

impl Savepointer for StandardSavepointer {
    fn create(&self, name: &str) -> String {
        format!("SAVEPOINT {name}")
    }

    fn release(&self, name: &str) -> String {
        format!("RELEASE SAVEPOINT {name}")
    }

    fn rollback_to(&self, name: &str) -> String {
        format!("ROLLBACK TO SAVEPOINT {name}")
    }
}

/// SQL Server savepoints. There is no release statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsqlSavepointer;

impl Savepointer for TsqlSavepointer {
    fn create(&self, name: &str) -> String {
        format!("SAVE TRANSACTION {name}")
    }

    fn release(&self, _name: &str) -> String {
        String::new()
    }

    fn rollback_to(&self, name: &str) -> String {
        format!("ROLLBACK TRANSACTION {name}")
    }
}

/// Oracle savepoints. There is no release statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleSavepointer;

impl Savepointer for OracleSavepointer {
    fn create(&self, name: &str) -> String {
        format!("SAVEPOINT {name}")
    }

    fn release(&self, _name: &str) -> String {
        String::new()
    }

    fn rollback_to(&self, name: &str) -> String {
        format!("ROLLBACK TO SAVEPOINT {name}")
    }
}

/// Built-in savepointer for a dialect.
pub fn for_dialect(dialect: Dialect) -> Arc<dyn Savepointer> {
    match dialect {
        Dialect::Postgres | Dialect::MySql | Dialect::Sqlite => Arc::new(StandardSavepointer),
        Dialect::Tsql => Arc::new(TsqlSavepointer),
        Dialect::Oracle => Arc::new(OracleSavepointer),
    }
}
