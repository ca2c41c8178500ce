use super::{Querier, TxOptions};
use crate::context::Context;
use crate::db::{DbRow, DbTransaction};
use crate::error::{DbError, DbResult};
use crate::models::{ExecResult, PreparedStatement, SqlValue};
use crate::savepoint::Savepointer;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Savepoint name for nesting depth `depth`.
pub fn savepoint_name(depth: u32) -> String {
    format!("savept{depth}x")
}

enum Layer<'a, 'c> {
    /// The real transaction, finished with COMMIT/ROLLBACK.
    Root(DbTransaction<'c>),
    /// A savepoint on a real transaction owned further up the chain.
    Savepoint {
        native: &'a mut DbTransaction<'c>,
        name: String,
        savepointer: Arc<dyn Savepointer>,
    },
}

/// A transaction at any nesting depth.
///
/// Depth 0 owns the native transaction; dropping it unfinished rolls back.
/// Deeper levels borrow it from their parent; dropping one unfinished runs
/// nothing and leaves the savepoint to the parent.
pub struct Tx<'a, 'c> {
    ctx: Context,
    layer: Layer<'a, 'c>,
    depth: u32,
    savepointer: Option<Arc<dyn Savepointer>>,
}

impl std::fmt::Debug for Tx<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tx")
            .field("depth", &self.depth)
            .field("savepoint", &self.savepoint_name())
            .field("savepointer", &self.savepointer)
            .finish()
    }
}

impl<'a, 'c> Tx<'a, 'c> {
    /// Wrap a freshly begun native transaction, applying `opts` first.
    pub(crate) async fn root(
        ctx: &Context,
        mut native: DbTransaction<'c>,
        opts: &TxOptions,
        savepointer: Option<Arc<dyn Savepointer>>,
    ) -> DbResult<Self> {
        for sql in opts.apply_statements(native.db_type()) {
            let mut conn = native.connection();
            ctx.run("set transaction", conn.execute(&sql, &[])).await?;
        }
        debug!(
            db_type = %native.db_type(),
            savepoints = savepointer.is_some(),
            "Began transaction"
        );
        Ok(Self {
            ctx: ctx.clone(),
            layer: Layer::Root(native),
            depth: 0,
            savepointer,
        })
    }

    /// Nesting depth; 0 for the real transaction.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_nested(&self) -> bool {
        self.depth > 0
    }

    /// Name of the savepoint this level committed or rolled back to, if nested.
    pub fn savepoint_name(&self) -> Option<&str> {
        match &self.layer {
            Layer::Root(_) => None,
            Layer::Savepoint { name, .. } => Some(name),
        }
    }

    /// Context used for this level's own savepoint, commit and rollback
    /// statements.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn supports_nesting(&self) -> bool {
        self.savepointer.is_some()
    }

    fn native(&mut self) -> &mut DbTransaction<'c> {
        match &mut self.layer {
            Layer::Root(tx) => tx,
            Layer::Savepoint { native, .. } => &mut **native,
        }
    }

    /// Begin a nested transaction on a new savepoint.
    ///
    /// Fails with [`DbError::NestedTransactionsUnsupported`] when the driver
    /// has no savepoint support. `opts` only applies to top-level
    /// transactions and is ignored here.
    pub async fn begin_tx(&mut self, ctx: &Context, _opts: TxOptions) -> DbResult<Tx<'_, 'c>> {
        let Some(savepointer) = self.savepointer.clone() else {
            return Err(DbError::NestedTransactionsUnsupported);
        };

        let depth = self.depth + 1;
        let name = savepoint_name(depth);
        let sql = savepointer.create(&name);

        let native = self.native();
        {
            let mut conn = native.connection();
            ctx.run("savepoint", conn.execute(&sql, &[])).await?;
        }
        debug!(depth = depth, savepoint = %name, "Created savepoint");

        Ok(Tx {
            ctx: ctx.clone(),
            layer: Layer::Savepoint {
                native,
                name,
                savepointer: Arc::clone(&savepointer),
            },
            depth,
            savepointer: Some(savepointer),
        })
    }
}

#[async_trait]
impl<'a, 'c> Querier for Tx<'a, 'c> {
    async fn execute(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<ExecResult> {
        let mut conn = self.native().connection();
        ctx.run("execute", conn.execute(sql, params)).await
    }

    async fn query(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Vec<DbRow>> {
        let mut conn = self.native().connection();
        ctx.run("query", conn.fetch_all(sql, params)).await
    }

    async fn query_row(
        &mut self,
        ctx: &Context,
        sql: &str,
        params: &[SqlValue],
    ) -> DbResult<Option<DbRow>> {
        let mut conn = self.native().connection();
        ctx.run("query_row", conn.fetch_optional(sql, params)).await
    }

    async fn prepare(&mut self, ctx: &Context, sql: &str) -> DbResult<PreparedStatement> {
        let mut conn = self.native().connection();
        ctx.run("prepare", conn.prepare(sql)).await
    }

    async fn ping(&mut self, ctx: &Context) -> DbResult<()> {
        let mut conn = self.native().connection();
        ctx.run("ping", conn.ping()).await
    }

    async fn commit(self) -> DbResult<()> {
        let Tx {
            ctx, layer, depth, ..
        } = self;
        match layer {
            Layer::Root(tx) => {
                ctx.run("commit", tx.commit()).await?;
                debug!("Committed transaction");
            }
            Layer::Savepoint {
                native,
                name,
                savepointer,
            } => {
                let sql = savepointer.release(&name);
                if sql.is_empty() {
                    debug!(
                        depth = depth,
                        savepoint = %name,
                        "Savepoint release not supported, skipping"
                    );
                    return Ok(());
                }
                let mut conn = native.connection();
                ctx.run("release savepoint", conn.execute(&sql, &[])).await?;
                debug!(depth = depth, savepoint = %name, "Released savepoint");
            }
        }
        Ok(())
    }

    async fn rollback(self) -> DbResult<()> {
        let Tx {
            ctx, layer, depth, ..
        } = self;
        match layer {
            Layer::Root(tx) => {
                ctx.run("rollback", tx.rollback()).await?;
                debug!("Rolled back transaction");
            }
            Layer::Savepoint {
                native,
                name,
                savepointer,
            } => {
                let sql = savepointer.rollback_to(&name);
                let mut conn = native.connection();
                ctx.run("rollback to savepoint", conn.execute(&sql, &[])).await?;
                debug!(depth = depth, savepoint = %name, "Rolled back to savepoint");
            }
        }
        Ok(())
    }
}
