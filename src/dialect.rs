//! SQL dialects.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Dialect of SQL spoken by a database product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    /// Microsoft SQL Server / Sybase
    Tsql,
    /// Includes MariaDB
    MySql,
    Sqlite,
    Oracle,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Self::Postgres,
        Self::Tsql,
        Self::MySql,
        Self::Sqlite,
        Self::Oracle,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Tsql => "tsql",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Oracle => "oracle",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown SQL dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}
