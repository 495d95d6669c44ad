//! Uniform execute/query surface over a SQLite connection.
//!
//! Statements are written with bare positional `?` placeholders. The gateway
//! numbers them (`?1`, `?2`, ...) before handing them to SQLite and, for
//! inserts, appends `RETURNING id` so the caller always learns the new key.

use anyhow::Result;
use rusqlite::types::ToSql;
use rusqlite::{Connection, Row};

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Execution {
    /// Primary key produced by an insert.
    pub generated_id: Option<i64>,
    pub affected_rows: usize,
}

/// Borrowed view of a connection (or of an open transaction, which derefs
/// to one). Handed out by [`crate::Database::with_gateway`] and
/// [`crate::Database::with_tx`].
pub struct Gateway<'c> {
    conn: &'c Connection,
}

impl<'c> Gateway<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Run an INSERT/UPDATE/DELETE.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Execution> {
        if is_insert(sql) {
            let text = number_placeholders(&with_returning_id(sql));
            let mut stmt = self.conn.prepare(&text)?;
            let ids = stmt
                .query_map(params, |row| row.get::<_, i64>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            return Ok(Execution {
                generated_id: ids.first().copied(),
                affected_rows: ids.len(),
            });
        }

        let text = number_placeholders(sql);
        let affected_rows = self.conn.execute(&text, params)?;
        Ok(Execution {
            generated_id: None,
            affected_rows,
        })
    }

    /// First row of the result set, if any.
    pub fn query_one<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let text = number_placeholders(sql);
        let mut stmt = self.conn.prepare(&text)?;
        let mut rows = stmt.query(params)?;

        let value = match rows.next()? {
            Some(row) => Some(map(row)?),
            None => None,
        };
        Ok(value)
    }

    /// Every row, in the order the statement produced them.
    pub fn query_all<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let text = number_placeholders(sql);
        let mut stmt = self.conn.prepare(&text)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Where the scanner in [`number_placeholders`] currently is.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    /// Inside `'...'` or `"..."`; the char is the closing quote.
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Rewrites bare `?` into `?1`, `?2`, ... in order of appearance.
/// Question marks inside string literals, quoted identifiers, comments and
/// already-numbered placeholders are left alone.
pub fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 16);
    let mut index = 0usize;
    let mut state = Scan::Code;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        state = match (state, c) {
            (Scan::Code, '\'' | '"') => Scan::Quoted(c),
            (Scan::Code, '-') if chars.peek() == Some(&'-') => Scan::LineComment,
            (Scan::Code, '/') if chars.peek() == Some(&'*') => {
                out.extend(chars.next());
                Scan::BlockComment
            }
            (Scan::Code, '?') => {
                if !chars.peek().is_some_and(|next| next.is_ascii_digit()) {
                    index += 1;
                    out.push_str(&index.to_string());
                }
                Scan::Code
            }
            // A doubled quote is an escaped quote; leaving and re-entering
            // the quoted state handles it.
            (Scan::Quoted(close), _) if c == close => Scan::Code,
            (Scan::LineComment, '\n') => Scan::Code,
            (Scan::BlockComment, '*') if chars.peek() == Some(&'/') => {
                out.extend(chars.next());
                Scan::Code
            }
            (state, _) => state,
        };
    }

    out
}

/// Appends `RETURNING id` to an insert that does not already ask for it.
pub fn with_returning_id(sql: &str) -> String {
    let trimmed = sql.trim().trim_end_matches(';').trim_end();
    if !is_insert(trimmed) || has_returning_id(trimmed) {
        return trimmed.to_string();
    }
    format!("{trimmed} RETURNING id")
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("insert"))
}

fn has_returning_id(sql: &str) -> bool {
    let lower = sql.to_ascii_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();
    words.windows(2).any(|pair| pair == ["returning", "id"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    #[test]
    fn numbers_placeholders_in_order() {
        assert_eq!(
            number_placeholders("UPDATE t SET a = ?, b = ? WHERE id = ?"),
            "UPDATE t SET a = ?1, b = ?2 WHERE id = ?3"
        );
    }

    #[test]
    fn leaves_literals_and_numbered_placeholders_alone() {
        assert_eq!(
            number_placeholders("SELECT '?', 'it''s ?' FROM t WHERE a = ? AND b = ?7"),
            "SELECT '?', 'it''s ?' FROM t WHERE a = ?1 AND b = ?7"
        );
    }

    #[test]
    fn skips_quoted_identifiers_and_comments() {
        assert_eq!(
            number_placeholders(
                "SELECT \"odd?name\" FROM t -- filter on ?\nWHERE a = ? /* ? */ AND b = ?"
            ),
            "SELECT \"odd?name\" FROM t -- filter on ?\nWHERE a = ?1 /* ? */ AND b = ?2"
        );
        assert_eq!(number_placeholders("SELECT 1 - ?"), "SELECT 1 - ?1");
        assert_eq!(number_placeholders("SELECT 4 / ?"), "SELECT 4 / ?1");
    }

    #[test]
    fn appends_returning_only_to_inserts() {
        assert_eq!(
            with_returning_id("INSERT INTO t (a) VALUES (?);"),
            "INSERT INTO t (a) VALUES (?) RETURNING id"
        );
        assert_eq!(
            with_returning_id("insert into t (a) values (?) returning id"),
            "insert into t (a) values (?) returning id"
        );
        assert_eq!(
            with_returning_id("UPDATE t SET a = ?"),
            "UPDATE t SET a = ?"
        );
        assert!(!has_returning_id("INSERT INTO t (returning_identity) VALUES (1)"));
    }

    #[test]
    fn execute_reports_generated_id_and_affected_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, a TEXT)")
            .unwrap();
        let gw = Gateway::new(&conn);

        let first = gw.execute("INSERT INTO t (a) VALUES (?)", params!["x"]).unwrap();
        let second = gw.execute("INSERT INTO t (a) VALUES (?)", params!["y"]).unwrap();
        assert_eq!(first, Execution { generated_id: Some(1), affected_rows: 1 });
        assert_eq!(second.generated_id, Some(2));

        let update = gw.execute("UPDATE t SET a = ?", params!["z"]).unwrap();
        assert_eq!(update, Execution { generated_id: None, affected_rows: 2 });

        let missing = gw.execute("UPDATE t SET a = ? WHERE id = ?", params!["z", 99]).unwrap();
        assert_eq!(missing.affected_rows, 0);
    }

    #[test]
    fn query_one_and_all() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT);
             INSERT INTO t (id, a) VALUES (1, 'x'), (2, 'y'), (3, 'z');",
        )
        .unwrap();
        let gw = Gateway::new(&conn);

        let found: Option<String> = gw
            .query_one("SELECT a FROM t WHERE id = ?", params![2], |row| row.get(0))
            .unwrap();
        assert_eq!(found.as_deref(), Some("y"));

        let absent: Option<String> = gw
            .query_one("SELECT a FROM t WHERE id = ?", params![9], |row| row.get(0))
            .unwrap();
        assert!(absent.is_none());

        let all: Vec<String> = gw
            .query_all("SELECT a FROM t WHERE id > ? ORDER BY id DESC", params![1], |row| row.get(0))
            .unwrap();
        assert_eq!(all, vec!["z", "y"]);
    }
}
