//! Backend dispatch macros.
//!
//! Every backend enum in [`crate::db`] has the variants `MySql`, `Postgres`
//! and `SQLite`. When the same expression works for all three payload types,
//! `db_dispatch!` writes the match for us.

/// Evaluate `$body` with `$inner` bound to the payload of whichever backend
/// variant `$value` holds.
///
/// # Example
///
/// ```ignore
/// db_dispatch!(DbPool, self, pool => pool.close().await)
/// ```
#[macro_export]
macro_rules! db_dispatch {
    ($enum:ident, $value:expr, $inner:ident => $body:expr) => {
        match $value {
            $crate::db::$enum::MySql($inner) => $body,
            $crate::db::$enum::Postgres($inner) => $body,
            $crate::db::$enum::SQLite($inner) => $body,
        }
    };
}
