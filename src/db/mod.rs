//! Database abstraction layer.
//!
//! This module provides the backend plumbing the nesting layer sits on:
//! - Connection pools and pooled connections
//! - Native transactions
//! - Statement execution on a borrowed connection
//! - Parameter binding and result rows
//! - Dispatch macros for reducing code duplication

pub mod executor;
#[macro_use]
pub mod macros;
pub mod params;
pub mod pool;
pub mod row;
pub mod transaction;

pub use executor::ConnectionRef;
pub use pool::{DbConnection, DbPool};
pub use row::DbRow;
pub use transaction::DbTransaction;
