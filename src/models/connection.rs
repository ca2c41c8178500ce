//! Connection-related data models.

use crate::dialect::Dialect;
use serde::{Deserialize, Serialize};

/// Supported sqlx backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    PostgreSQL,
    /// Includes MariaDB
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Parse database type from a connection string.
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let lower = connection_string.to_lowercase();
        if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if lower.starts_with("mysql://") || lower.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if lower.starts_with("sqlite://") || lower.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }

    /// Get the display name for this database type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "PostgreSQL",
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }

    /// SQL dialect spoken by this backend.
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::PostgreSQL => Dialect::Postgres,
            Self::MySQL => Dialect::MySql,
            Self::SQLite => Dialect::Sqlite,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Mask the password of a connection URL for display.
pub fn masked_connection_string(connection_string: &str) -> String {
    if let Some(at_pos) = connection_string.find('@') {
        if let Some(colon_pos) = connection_string[..at_pos].rfind(':') {
            // "scheme://user@host" has no password; the colon belongs to the scheme
            if !connection_string[colon_pos + 1..].starts_with("//") {
                let prefix = &connection_string[..colon_pos + 1];
                let suffix = &connection_string[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
    }
    connection_string.to_string()
}
