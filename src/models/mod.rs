//! Data models shared by the capability and nesting layers.

pub mod connection;
pub mod query;

pub use connection::{DatabaseType, masked_connection_string};
pub use query::{ExecResult, PreparedStatement, SqlValue};
