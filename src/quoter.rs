//! Identifier and literal quoting for textual SQL construction.

use crate::dialect::Dialect;
use crate::error::{DbError, DbResult};
use crate::models::SqlValue;
use std::fmt::Write;
use std::sync::Arc;

/// Returns safe and valid SQL strings to use when building SQL text.
pub trait Quoter: Send + Sync + std::fmt::Debug {
    /// Dialect the produced fragments are valid in.
    fn dialect(&self) -> Dialect;

    /// Quote a single identifier segment such as a schema, table or column
    /// name. Multi-part names like `public.Table` must be split by the caller;
    /// see [`Quoter::qualified`].
    fn id(&self, name: &str) -> String;

    /// Render a value as a literal that is safe to embed in SQL text,
    /// including any surrounding quotes.
    ///
    /// Only an explicit allow-list of value kinds is accepted; anything else
    /// fails with [`DbError::UnsupportedValueType`].
    fn value(&self, value: &SqlValue) -> DbResult<String>;

    /// Quote each segment and join them with `.`.
    fn qualified(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .map(|part| self.id(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Built-in quoter for one of the known dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectQuoter {
    dialect: Dialect,
}

impl DialectQuoter {
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    fn delimiters(&self) -> (char, char) {
        match self.dialect {
            Dialect::Tsql => ('[', ']'),
            Dialect::MySql => ('`', '`'),
            Dialect::Postgres | Dialect::Sqlite | Dialect::Oracle => ('"', '"'),
        }
    }

    fn text(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        for c in s.chars() {
            match c {
                '\'' => out.push_str("''"),
                // MySQL treats backslash as an escape character by default
                '\\' if self.dialect == Dialect::MySql => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    fn bytes(&self, bytes: &[u8]) -> String {
        let mut hex = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            let _ = write!(hex, "{b:02X}");
        }
        match self.dialect {
            Dialect::Postgres => format!("'\\x{hex}'::bytea"),
            Dialect::MySql | Dialect::Sqlite => format!("X'{hex}'"),
            Dialect::Tsql => format!("0x{hex}"),
            Dialect::Oracle => format!("HEXTORAW('{hex}')"),
        }
    }

    fn boolean(&self, v: bool) -> &'static str {
        match (self.dialect, v) {
            (Dialect::Tsql | Dialect::Oracle, true) => "1",
            (Dialect::Tsql | Dialect::Oracle, false) => "0",
            (_, true) => "TRUE",
            (_, false) => "FALSE",
        }
    }
}

impl Quoter for DialectQuoter {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn id(&self, name: &str) -> String {
        let (open, close) = self.delimiters();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(open);
        for c in name.chars() {
            if c == close {
                out.push(close);
            }
            out.push(c);
        }
        out.push(close);
        out
    }

    fn value(&self, value: &SqlValue) -> DbResult<String> {
        match value {
            SqlValue::Null => Ok("NULL".to_string()),
            SqlValue::Bool(v) => Ok(self.boolean(*v).to_string()),
            SqlValue::Int(v) => Ok(v.to_string()),
            SqlValue::Text(s) => Ok(self.text(s)),
            SqlValue::Bytes(b) => Ok(self.bytes(b)),
            SqlValue::Timestamp(ts) => {
                // SQL Server `datetime` parses at most three fractional digits
                let format = match self.dialect {
                    Dialect::Tsql => "%Y-%m-%d %H:%M:%S%.3f",
                    _ => "%Y-%m-%d %H:%M:%S%.6f",
                };
                let text = self.text(&ts.format(format).to_string());
                Ok(match self.dialect {
                    Dialect::Oracle => format!("TIMESTAMP {text}"),
                    _ => text,
                })
            }
            SqlValue::Float(_) | SqlValue::Json(_) => {
                Err(DbError::unsupported_value(self.dialect, value.type_name()))
            }
        }
    }
}

/// Built-in quoter for a dialect.
pub fn for_dialect(dialect: Dialect) -> Arc<dyn Quoter> {
    Arc::new(DialectQuoter::new(dialect))
}
