//! sqlexp - capability detection and savepoint-based nested transactions
//! for sqlx.
//!
//! This library adds what a plain driver handle does not tell you: which
//! database product and SQL dialect it speaks, how to quote identifiers and
//! literals for it, and whether (and how) it supports savepoints. On top of
//! that, [`nest`] offers a [`Querier`] interface shared by pools, connections
//! and transactions at any nesting depth.

pub mod config;
pub mod context;
pub mod db;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod models;
pub mod namer;
pub mod nest;
pub mod probe;
pub mod quoter;
pub mod savepoint;

pub use config::{Config, DatabaseConfig, PoolOptions};
pub use context::Context;
pub use dialect::Dialect;
pub use driver::{Capabilities, Driver};
pub use error::{DbError, DbResult};
pub use models::SqlValue;
pub use namer::Namer;
pub use nest::{Conn, Db, IsolationLevel, Querier, Tx, TxOptions};
pub use quoter::Quoter;
pub use savepoint::Savepointer;
