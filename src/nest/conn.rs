use super::{Querier, Tx, TxOptions};
use crate::context::Context;
use crate::db::{DbConnection, DbRow};
use crate::driver::Capabilities;
use crate::error::{DbError, DbResult};
use crate::models::{ExecResult, PreparedStatement, SqlValue};
use async_trait::async_trait;

/// A single pooled connection with its negotiated capabilities.
///
/// Returned to the pool when dropped.
#[derive(Debug)]
pub struct Conn {
    conn: DbConnection,
    caps: Capabilities,
}

impl Conn {
    /// Wrap `conn`, negotiating its capabilities.
    pub fn wrap(conn: DbConnection) -> Self {
        let caps = Capabilities::negotiate(&conn);
        Self { conn, caps }
    }

    pub fn with_capabilities(conn: DbConnection, caps: Capabilities) -> Self {
        Self { conn, caps }
    }

    pub fn connection(&mut self) -> &mut DbConnection {
        &mut self.conn
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn into_inner(self) -> DbConnection {
        self.conn
    }

    /// Begin a top-level transaction on this connection.
    pub async fn begin_tx(&mut self, ctx: &Context, opts: TxOptions) -> DbResult<Tx<'_, '_>> {
        opts.check_supported(self.conn.db_type())?;
        let savepointer = self.caps.savepointer().cloned();
        let native = ctx.run("begin", self.conn.begin()).await?;
        Tx::root(ctx, native, &opts, savepointer).await
    }
}

#[async_trait]
impl Querier for Conn {
    async fn execute(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<ExecResult> {
        let mut conn = self.conn.connection();
        ctx.run("execute", conn.execute(sql, params)).await
    }

    async fn query(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Vec<DbRow>> {
        let mut conn = self.conn.connection();
        ctx.run("query", conn.fetch_all(sql, params)).await
    }

    async fn query_row(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Option<DbRow>> {
        let mut conn = self.conn.connection();
        ctx.run("query_row", conn.fetch_optional(sql, params)).await
    }

    async fn prepare(&mut self, ctx: &Context, sql: &str) -> DbResult<PreparedStatement> {
        let mut conn = self.conn.connection();
        ctx.run("prepare", conn.prepare(sql)).await
    }

    async fn ping(&mut self, ctx: &Context) -> DbResult<()> {
        let mut conn = self.conn.connection();
        ctx.run("ping", conn.ping()).await
    }

    async fn commit(self) -> DbResult<()> {
        Err(DbError::NotInTransaction)
    }

    async fn rollback(self) -> DbResult<()> {
        Err(DbError::NotInTransaction)
    }
}
