//! Capability registry.
//!
//! A driver handle may provide naming, quoting and savepoint capabilities
//! itself. Handles that do not (such as the sqlx backends) are matched by
//! their reported driver name against a small table of known products.
//! Absence of a capability is reported as `None`, never as an error.

use crate::dialect::Dialect;
use crate::namer::{Namer, ProductNamer};
use crate::quoter::{self, Quoter};
use crate::savepoint::{self, Savepointer};
use std::sync::Arc;

/// An opaque database driver handle.
///
/// Only [`Driver::driver_name`] is required. Drivers that know their own
/// dialect details override the capability methods; the defaults defer to
/// the built-in table.
pub trait Driver: Send + Sync {
    /// Concrete driver identity, e.g. `sqlx::Database::NAME`.
    fn driver_name(&self) -> &str;

    fn namer(&self) -> Option<Arc<dyn Namer>> {
        None
    }

    fn quoter(&self) -> Option<Arc<dyn Quoter>> {
        None
    }

    fn savepointer(&self) -> Option<Arc<dyn Savepointer>> {
        None
    }
}

/// Look up a known product by driver name: `(product, dialect)`.
fn known_driver(driver_name: &str) -> Option<(&'static str, Dialect)> {
    const KNOWN: &[(&str, &str, Dialect)] = &[
        ("postgresql", "postgresql", Dialect::Postgres),
        ("postgres", "postgresql", Dialect::Postgres),
        ("mysql", "mysql", Dialect::MySql),
        ("mariadb", "mysql", Dialect::MySql),
        ("sqlite", "sqlite", Dialect::Sqlite),
        ("mssql", "sqlserver", Dialect::Tsql),
        ("sqlserver", "sqlserver", Dialect::Tsql),
        ("oracle", "oracle", Dialect::Oracle),
    ];
    let name = driver_name.trim();
    KNOWN
        .iter()
        .find(|(key, _, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, product, dialect)| (*product, *dialect))
}

/// Namer of the driver, if it provides one or is a known product.
pub fn namer_from(driver: &dyn Driver) -> Option<Arc<dyn Namer>> {
    driver.namer().or_else(|| {
        known_driver(driver.driver_name())
            .map(|(product, dialect)| Arc::new(ProductNamer::new(product, dialect)) as Arc<dyn Namer>)
    })
}

/// Quoter of the driver, if it provides one or is a known product.
pub fn quoter_from(driver: &dyn Driver) -> Option<Arc<dyn Quoter>> {
    driver
        .quoter()
        .or_else(|| known_driver(driver.driver_name()).map(|(_, d)| quoter::for_dialect(d)))
}

/// Savepointer of the driver, if it provides one or is a known product.
pub fn savepointer_from(driver: &dyn Driver) -> Option<Arc<dyn Savepointer>> {
    driver
        .savepointer()
        .or_else(|| known_driver(driver.driver_name()).map(|(_, d)| savepoint::for_dialect(d)))
}

/// Capabilities negotiated once for a handle, absences included.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    namer: Option<Arc<dyn Namer>>,
    quoter: Option<Arc<dyn Quoter>>,
    savepointer: Option<Arc<dyn Savepointer>>,
}

impl Capabilities {
    /// Query every capability of `driver`.
    pub fn negotiate(driver: &dyn Driver) -> Self {
        Self {
            namer: namer_from(driver),
            quoter: quoter_from(driver),
            savepointer: savepointer_from(driver),
        }
    }

    /// No capabilities at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_namer(mut self, namer: Option<Arc<dyn Namer>>) -> Self {
        self.namer = namer;
        self
    }

    pub fn with_quoter(mut self, quoter: Option<Arc<dyn Quoter>>) -> Self {
        self.quoter = quoter;
        self
    }

    pub fn with_savepointer(mut self, savepointer: Option<Arc<dyn Savepointer>>) -> Self {
        self.savepointer = savepointer;
        self
    }

    pub fn namer(&self) -> Option<&Arc<dyn Namer>> {
        self.namer.as_ref()
    }

    pub fn quoter(&self) -> Option<&Arc<dyn Quoter>> {
        self.quoter.as_ref()
    }

    pub fn savepointer(&self) -> Option<&Arc<dyn Savepointer>> {
        self.savepointer.as_ref()
    }

    pub fn dialect(&self) -> Option<Dialect> {
        self.namer.as_ref().map(|n| n.dialect())
    }

    pub fn supports_savepoints(&self) -> bool {
        self.savepointer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::savepoint::TsqlSavepointer;

    struct Named(&'static str);

    impl Driver for Named {
        fn driver_name(&self) -> &str {
            self.0
        }
    }

    /// Unknown product that brings its own savepoint support.
    struct Custom;

    impl Driver for Custom {
        fn driver_name(&self) -> &str {
            "custom"
        }

        fn savepointer(&self) -> Option<Arc<dyn Savepointer>> {
            Some(Arc::new(TsqlSavepointer))
        }
    }

    #[test]
    fn test_unknown_driver_has_no_capabilities() {
        let driver = Named("acme-db");
        assert!(namer_from(&driver).is_none());
        assert!(quoter_from(&driver).is_none());
        assert!(savepointer_from(&driver).is_none());

        let caps = Capabilities::negotiate(&driver);
        assert!(caps.dialect().is_none());
        assert!(!caps.supports_savepoints());
    }

    #[test]
    fn test_sqlx_backend_names_are_known() {
        for (name, dialect) in [
            ("PostgreSQL", Dialect::Postgres),
            ("MySQL", Dialect::MySql),
            ("SQLite", Dialect::Sqlite),
        ] {
            let caps = Capabilities::negotiate(&Named(name));
            assert_eq!(caps.dialect(), Some(dialect));
            assert_eq!(caps.quoter().map(|q| q.dialect()), Some(dialect));
            assert!(caps.supports_savepoints());
        }
    }

    #[test]
    fn test_legacy_mssql_name_gets_tsql_quoter() {
        let q = quoter_from(&Named("mssql")).unwrap();
        assert_eq!(q.dialect(), Dialect::Tsql);
        assert_eq!(q.id("a]b"), "[a]]b]");
        let sp = savepointer_from(&Named("mssql")).unwrap();
        assert!(sp.release("savept1x").is_empty());
    }

    #[test]
    fn test_explicit_capability_wins() {
        let driver = Custom;
        let sp = savepointer_from(&driver).unwrap();
        assert_eq!(sp.create("x"), "SAVE TRANSACTION x");
        assert!(namer_from(&driver).is_none());
    }

    #[test]
    fn test_capability_overrides() {
        let caps = Capabilities::negotiate(&Named("SQLite")).with_savepointer(None);
        assert!(!caps.supports_savepoints());
        assert!(caps.quoter().is_some());
        assert!(Capabilities::none().namer().is_none());
    }
}
