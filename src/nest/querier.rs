use crate::context::Context;
use crate::db::DbRow;
use crate::error::DbResult;
use crate::models::{ExecResult, PreparedStatement, SqlValue};
use async_trait::async_trait;

/// Statement-issuing operations shared by [`Db`](super::Db),
/// [`Conn`](super::Conn) and [`Tx`](super::Tx).
///
/// The trait is object safe apart from `commit` and `rollback`, so
/// `&mut dyn Querier` can be passed to code that only runs statements.
#[async_trait]
pub trait Querier: Send {
    /// Execute a statement that returns no rows.
    async fn execute(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<ExecResult>;

    /// Run a query and collect every row.
    async fn query(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Vec<DbRow>>;

    /// Run a query and return its first row, if any.
    async fn query_row(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Option<DbRow>>;

    async fn prepare(&mut self, ctx: &Context, sql: &str) -> DbResult<PreparedStatement>;

    async fn ping(&mut self, ctx: &Context) -> DbResult<()>;

    /// Finish the unit of work. Handles that are not transactions fail with
    /// [`DbError::NotInTransaction`](crate::DbError::NotInTransaction).
    async fn commit(self) -> DbResult<()>
    where
        Self: Sized;

    /// Abandon the unit of work. Handles that are not transactions fail with
    /// [`DbError::NotInTransaction`](crate::DbError::NotInTransaction).
    async fn rollback(self) -> DbResult<()>
    where
        Self: Sized;
}
