//! Capability report for a configured database.

use crate::config::DatabaseConfig;
use crate::context::Context;
use crate::dialect::Dialect;
use crate::error::DbResult;
use crate::models::DatabaseType;
use crate::namer::version_number;
use crate::nest::{Db, Querier, TxOptions};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Nesting depth exercised by [`check_nesting`].
pub const NESTING_CHECK_DEPTH: u32 = 2;

/// What was negotiated for one database.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub id: String,
    pub db_type: DatabaseType,
    /// Driver name the capabilities were looked up by.
    pub driver: String,
    /// Product name with server version, when the product is known.
    pub name: Option<String>,
    pub dialect: Option<Dialect>,
    pub quoting: bool,
    /// The probe table name as the dialect quotes it.
    pub quoted_identifier: Option<String>,
    pub savepoints: bool,
    pub server_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nesting: Option<NestingCheck>,
}

/// Outcome of a nested-transaction smoke check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestingCheck {
    /// Savepoints created, outermost first.
    pub savepoints: Vec<String>,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Connect to `config`, negotiate capabilities and optionally run the
/// nesting check. The whole probe shares one `timeout`.
pub async fn probe(
    config: &DatabaseConfig,
    check_nesting_enabled: bool,
    timeout: Duration,
) -> DbResult<CapabilityReport> {
    let ctx = Context::with_timeout(timeout);
    info!(id = %config.id, db_type = %config.db_type, "Probing database");

    let db = ctx
        .run(
            "connect",
            Db::connect(&config.connection_string, &config.pool_options),
        )
        .await?;
    let result = report(&ctx, config, &db, check_nesting_enabled).await;
    db.close().await;
    result
}

async fn report(
    ctx: &Context,
    config: &DatabaseConfig,
    db: &Db,
    check_nesting_enabled: bool,
) -> DbResult<CapabilityReport> {
    let caps = db.capabilities();
    let server_version = db.server_version(ctx).await?;

    let name = caps.namer().map(|namer| match version_number(&server_version) {
        Some(version) => format!("{}-{}", namer.name(), version),
        None => namer.name(),
    });

    let nesting = if check_nesting_enabled {
        Some(check_nesting(ctx, db).await)
    } else {
        None
    };

    Ok(CapabilityReport {
        id: config.id.clone(),
        db_type: config.db_type,
        driver: crate::driver::Driver::driver_name(db.pool()).to_string(),
        name,
        dialect: caps.dialect(),
        quoting: caps.quoter().is_some(),
        quoted_identifier: caps.quoter().map(|q| q.qualified(&["sqlexp", "probe"])),
        savepoints: caps.supports_savepoints(),
        server_version,
        nesting,
    })
}

/// Open a transaction, nest [`NESTING_CHECK_DEPTH`] savepoint levels and roll
/// everything back. Nothing is written.
pub async fn check_nesting(ctx: &Context, db: &Db) -> NestingCheck {
    let mut savepoints = Vec::new();
    let outcome = nest_and_roll_back(ctx, db, &mut savepoints).await;
    debug!(savepoints = ?savepoints, passed = outcome.is_ok(), "Nesting check finished");
    NestingCheck {
        savepoints,
        passed: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
    }
}

async fn nest_and_roll_back(
    ctx: &Context,
    db: &Db,
    savepoints: &mut Vec<String>,
) -> DbResult<()> {
    let mut tx = db.begin_tx(ctx, TxOptions::default()).await?;
    {
        let mut outer = tx.begin_tx(ctx, TxOptions::default()).await?;
        savepoints.extend(outer.savepoint_name().map(str::to_string));
        outer.ping(ctx).await?;

        let inner = outer.begin_tx(ctx, TxOptions::default()).await?;
        savepoints.extend(inner.savepoint_name().map(str::to_string));
        inner.rollback().await?;
        outer.rollback().await?;
    }
    tx.rollback().await
}
