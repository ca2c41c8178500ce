use super::{Conn, Querier, Tx, TxOptions};
use crate::config::PoolOptions;
use crate::context::Context;
use crate::db::{DbPool, DbRow};
use crate::driver::Capabilities;
use crate::error::{DbError, DbResult};
use crate::models::{ExecResult, PreparedStatement, SqlValue};
use async_trait::async_trait;
use tracing::debug;

/// A pool with its negotiated capabilities.
///
/// Cloning is cheap and shares the pool. Statements issued directly on a
/// `Db` run on a connection checked out for that one call.
#[derive(Debug, Clone)]
pub struct Db {
    pool: DbPool,
    caps: Capabilities,
}

impl Db {
    /// Wrap `pool`, negotiating its capabilities once.
    pub fn wrap(pool: DbPool) -> Self {
        let caps = Capabilities::negotiate(&pool);
        debug!(
            db_type = %pool.db_type(),
            dialect = ?caps.dialect(),
            savepoints = caps.supports_savepoints(),
            "Negotiated capabilities"
        );
        Self { pool, caps }
    }

    /// Wrap `pool` with capabilities chosen by the caller.
    pub fn with_capabilities(pool: DbPool, caps: Capabilities) -> Self {
        Self { pool, caps }
    }

    /// Connect a pool and wrap it.
    pub async fn connect(connection_string: &str, pool_opts: &PoolOptions) -> DbResult<Self> {
        let pool = DbPool::connect(connection_string, pool_opts).await?;
        Ok(Self::wrap(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Check a connection out of the pool. It shares this handle's
    /// capabilities.
    pub async fn acquire(&self, ctx: &Context) -> DbResult<Conn> {
        let conn = ctx.run("acquire", self.pool.acquire()).await?;
        Ok(Conn::with_capabilities(conn, self.caps.clone()))
    }

    /// Begin a top-level transaction on its own pooled connection.
    pub async fn begin_tx(&self, ctx: &Context, opts: TxOptions) -> DbResult<Tx<'static, 'static>> {
        opts.check_supported(self.pool.db_type())?;
        let native = ctx.run("begin", self.pool.begin()).await?;
        Tx::root(ctx, native, &opts, self.caps.savepointer().cloned()).await
    }

    pub async fn server_version(&self, ctx: &Context) -> DbResult<String> {
        ctx.run("server_version", self.pool.server_version()).await
    }

    pub async fn close(&self) {
        self.pool.close().await
    }
}

#[async_trait]
impl Querier for Db {
    async fn execute(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<ExecResult> {
        ctx.run("execute", async {
            let mut conn = self.pool.acquire().await?;
            conn.connection().execute(sql, params).await
        })
        .await
    }

    async fn query(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Vec<DbRow>> {
        ctx.run("query", async {
            let mut conn = self.pool.acquire().await?;
            conn.connection().fetch_all(sql, params).await
        })
        .await
    }

    async fn query_row(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Option<DbRow>> {
        ctx.run("query_row", async {
            let mut conn = self.pool.acquire().await?;
            conn.connection().fetch_optional(sql, params).await
        })
        .await
    }

    async fn prepare(&mut self, ctx: &Context, sql: &str) -> DbResult<PreparedStatement> {
        ctx.run("prepare", async {
            let mut conn = self.pool.acquire().await?;
            conn.connection().prepare(sql).await
        })
        .await
    }

    async fn ping(&mut self, ctx: &Context) -> DbResult<()> {
        ctx.run("ping", async {
            let mut conn = self.pool.acquire().await?;
            conn.connection().ping().await
        })
        .await
    }

    async fn commit(self) -> DbResult<()> {
        Err(DbError::NotInTransaction)
    }

    async fn rollback(self) -> DbResult<()> {
        Err(DbError::NotInTransaction)
    }
}
