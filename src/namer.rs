//! Database product and dialect naming.

use crate::dialect::Dialect;

/// Name of the database and the SQL dialect it uses.
pub trait Namer: Send + Sync + std::fmt::Debug {
    /// Name of the database management system.
    ///
    /// Examples: `"postgresql-9.6"`, `"sqlserver-10.54.32"`, `"cockroachdb-1.0"`.
    fn name(&self) -> String;

    /// Dialect of SQL used in the database.
    fn dialect(&self) -> Dialect;
}

/// Namer for a known product, optionally carrying a server version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductNamer {
    product: &'static str,
    version: Option<String>,
    dialect: Dialect,
}

impl ProductNamer {
    pub const fn new(product: &'static str, dialect: Dialect) -> Self {
        Self {
            product,
            version: None,
            dialect,
        }
    }

    /// Attach a server version, e.g. the first token of `SELECT version()`.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = (!version.trim().is_empty()).then(|| version.trim().to_string());
        self
    }

    pub fn product(&self) -> &'static str {
        self.product
    }
}

impl Namer for ProductNamer {
    fn name(&self) -> String {
        match &self.version {
            Some(v) => format!("{}-{}", self.product, v),
            None => self.product.to_string(),
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// Extract a bare version number from a `SELECT version()` banner.
///
/// `"PostgreSQL 16.2 on x86_64-pc-linux-gnu"` yields `"16.2"`,
/// `"8.0.36-0ubuntu0.22.04.1"` yields `"8.0.36"`.
pub fn version_number(banner: &str) -> Option<&str> {
    banner
        .split(|c: char| c.is_whitespace() || c == '-' || c == ',')
        .find(|tok| tok.starts_with(|c: char| c.is_ascii_digit()))
}
