//! Fuzzing tests for identifier and literal quoting.
//!
//! Random and edge-case strings are quoted for every dialect and parsed back;
//! on SQLite the quoted text is also executed for real.

use rand::Rng;
use rand::distributions::Alphanumeric;
use sqlexp::config::PoolOptions;
use sqlexp::context::Context;
use sqlexp::dialect::Dialect;
use sqlexp::models::SqlValue;
use sqlexp::nest::{Db, Querier};
use sqlexp::quoter::{self, Quoter};
use tempfile::TempDir;

/// Generate random string of given length
fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Random string drawn mostly from characters that need escaping somewhere.
fn random_hostile_string(len: usize) -> String {
    const ALPHABET: &[char] = &[
        '"', '\'', '`', '[', ']', '\\', '.', ';', ' ', '-', '/', '*', 'a', 'Z', '0', 'é', '🚀',
        '\n', '\t',
    ];
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

/// Generate various edge-case strings
fn edge_case_strings() -> Vec<String> {
    vec![
        String::new(),
        " ".to_string(),
        "\n\r\t".to_string(),
        "'OR 1=1--".to_string(),
        "'; DROP TABLE users--".to_string(),
        "\"; DROP TABLE users--".to_string(),
        "`; DROP TABLE users--".to_string(),
        "]; DROP TABLE users--".to_string(),
        "\\'; DROP TABLE users--".to_string(),
        "public.Table".to_string(),
        "[already]".to_string(),
        "\"already\"".to_string(),
        "üöÄ".repeat(100),
        "a".repeat(10000),
        random_string(100),
        random_hostile_string(64),
    ]
}

/// Undo `Quoter::id`: strip the delimiters and collapse doubled closers.
/// Panics if a closing delimiter appears unescaped inside.
fn unquote_id(dialect: Dialect, quoted: &str) -> String {
    let (open, close) = match dialect {
        Dialect::Tsql => ('[', ']'),
        Dialect::MySql => ('`', '`'),
        _ => ('"', '"'),
    };
    let inner = quoted
        .strip_prefix(open)
        .and_then(|s| s.strip_suffix(close))
        .unwrap_or_else(|| panic!("{quoted:?} is not delimited"));

    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == close {
            assert_eq!(chars.next(), Some(close), "lone delimiter in {quoted:?}");
        }
        out.push(c);
    }
    out
}

#[test]
fn test_fuzz_identifiers_round_trip() {
    let mut inputs = edge_case_strings();
    inputs.extend((0..200).map(|i| random_hostile_string(i % 40)));

    for dialect in Dialect::ALL {
        let q = quoter::for_dialect(dialect);
        for input in &inputs {
            let quoted = q.id(input);
            assert_eq!(&unquote_id(dialect, &quoted), input, "{dialect}: {quoted:?}");
        }
    }
}

#[test]
fn test_fuzz_text_values_stay_inside_quotes() {
    let mut inputs = edge_case_strings();
    inputs.extend((0..200).map(|i| random_hostile_string(i % 40)));

    for dialect in Dialect::ALL {
        let q = quoter::for_dialect(dialect);
        for input in &inputs {
            let literal = q.value(&SqlValue::from(input.as_str())).unwrap();
            let inner = &literal[1..literal.len() - 1];
            assert!(literal.starts_with('\'') && literal.ends_with('\''));
            // Every quote inside the literal comes in an escaped pair
            assert_eq!(inner.replace("''", "").find('\''), None, "{dialect}: {literal:?}");
        }
    }
}

#[test]
fn test_unsupported_values_for_every_dialect() {
    for dialect in Dialect::ALL {
        let q = quoter::for_dialect(dialect);
        assert!(q.value(&SqlValue::Float(1.5)).is_err());
        assert!(q.value(&SqlValue::Json(serde_json::json!({"a": 1}))).is_err());
        assert!(q.value(&SqlValue::Int(i64::MIN)).is_ok());
    }
}

#[tokio::test]
async fn test_quoted_sql_runs_on_sqlite() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("quote.db").display());
    let mut db = Db::connect(&url, &PoolOptions::default()).await.unwrap();
    let ctx = Context::background();
    let q = db.capabilities().quoter().cloned().unwrap();
    assert_eq!(q.dialect(), Dialect::Sqlite);

    let table = q.id("we\"ird table; --");
    let column = q.id("col\"umn");
    db.execute(&ctx, &format!("CREATE TABLE {table} ({column} TEXT)"), &[])
        .await
        .unwrap();

    let mut values: Vec<String> = edge_case_strings()
        .into_iter()
        .filter(|s| !s.contains('\0'))
        .collect();
    values.extend((0..50).map(|i| random_hostile_string(i % 30)));

    for value in &values {
        let literal = q.value(&SqlValue::from(value.as_str())).unwrap();
        db.execute(&ctx, &format!("DELETE FROM {table}"), &[])
            .await
            .unwrap();
        db.execute(
            &ctx,
            &format!("INSERT INTO {table} ({column}) VALUES ({literal})"),
            &[],
        )
        .await
        .unwrap();

        let row = db
            .query_row(&ctx, &format!("SELECT {column} FROM {table}"), &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&row.try_get::<String>(0).unwrap(), value);
    }

    let bytes = q.value(&SqlValue::Bytes(vec![0, 1, 254, 255])).unwrap();
    let row = db
        .query_row(&ctx, &format!("SELECT {bytes}"), &[])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<Vec<u8>>(0).unwrap(), vec![0, 1, 254, 255]);
}
