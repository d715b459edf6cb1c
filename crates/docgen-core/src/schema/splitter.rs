//! Line-oriented SQL statement splitter
//!
//! Turns a schema file into complete, comment-free statements. Only the
//! statement kinds the interpreters care about are kept.

use serde::Serialize;

/// Statement kinds retained by the splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    CreateTable,
    CommentOn,
    AlterTable,
}

impl StatementKind {
    /// Classify a statement by its two leading keywords
    pub fn classify(stmt: &str) -> Option<Self> {
        let mut words = stmt.split_whitespace();
        let first = words.next()?;
        let second = words.next()?;

        if first.eq_ignore_ascii_case("CREATE") && starts_with_keyword(second, "TABLE") {
            Some(StatementKind::CreateTable)
        } else if first.eq_ignore_ascii_case("COMMENT") && starts_with_keyword(second, "ON") {
            Some(StatementKind::CommentOn)
        } else if first.eq_ignore_ascii_case("ALTER") && starts_with_keyword(second, "TABLE") {
            Some(StatementKind::AlterTable)
        } else {
            None
        }
    }
}

/// `TABLE"t"(` starts with TABLE, `TABLESPACE` does not
fn starts_with_keyword(word: &str, keyword: &str) -> bool {
    let Some(head) = word.get(..keyword.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(keyword)
        && !word[keyword.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// A single statement, whitespace-joined and terminated by `;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub text: String,
    /// Line the statement starts on (1-indexed)
    pub line: usize,
}

/// Split SQL text into the relevant statements it contains.
///
/// Lines are trimmed and joined with a single space until one ends with
/// `;`. Whole-line `--` comments and blank lines are skipped. A line that
/// opens a `/*` block comment without closing it is dropped entirely; block
/// comments are not tracked across lines.
pub fn split_statements(sql: &str) -> Vec<Statement> {
    let sql = sql.replace("\r\n", "\n");
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut start_line = 0;

    for (idx, line) in sql.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        let Some(stripped) = strip_comments(trimmed) else {
            // Unclosed block comment
            continue;
        };
        let fragment = stripped.trim();
        if fragment.is_empty() {
            continue;
        }

        if current.is_empty() {
            start_line = idx + 1;
        } else {
            current.push(' ');
        }
        current.push_str(fragment);

        if fragment.ends_with(';') {
            push_statement(&mut statements, std::mem::take(&mut current), start_line);
        }
    }

    // Handle last statement (without trailing semicolon)
    let last = current.trim();
    if !last.is_empty() {
        let mut last = last.to_string();
        if !last.ends_with(';') {
            last.push(';');
        }
        push_statement(&mut statements, last, start_line);
    }

    statements
}

fn push_statement(statements: &mut Vec<Statement>, text: String, line: usize) {
    match StatementKind::classify(&text) {
        Some(kind) => statements.push(Statement { kind, text, line }),
        None => tracing::trace!(line, "skipping irrelevant statement"),
    }
}

/// Remove `--` line comments and same-line `/* */` comments outside of
/// quotes. Returns `None` when a block comment opens without closing.
fn strip_comments(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut copy_from = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if let Some(q) = quote {
            // A doubled quote closes and immediately reopens, which is fine here
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'\'' | b'"' | b'`' => {
                quote = Some(b);
                i += 1;
            }
            b'-' if i + 1 < len && bytes[i + 1] == b'-' => {
                out.push_str(&line[copy_from..i]);
                copy_from = len;
                break;
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                let close = line[i + 2..].find("*/")?;
                out.push_str(&line[copy_from..i]);
                out.push(' ');
                i += 2 + close + 2;
                copy_from = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&line[copy_from..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sql: &str) -> Vec<String> {
        split_statements(sql).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_joins_multiline_statement() {
        let sql = "CREATE TABLE users (\n    id bigint,\n    name text\n);\n";
        assert_eq!(texts(sql), vec!["CREATE TABLE users ( id bigint, name text );"]);
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let sql = r#"
-- users table
CREATE TABLE t (
    id int, -- primary id
    /* audit columns
    created_at timestamp
);
"#;
        assert_eq!(
            texts(sql),
            vec!["CREATE TABLE t ( id int, created_at timestamp );"]
        );
    }

    #[test]
    fn test_same_line_block_comment_removed() {
        let sql = "CREATE TABLE t (id int /* pk */, name text);";
        assert_eq!(texts(sql), vec!["CREATE TABLE t (id int  , name text);"]);
    }

    #[test]
    fn test_dashes_inside_string_are_kept() {
        let sql = "COMMENT ON TABLE t IS 'a--b'; -- trailing";
        assert_eq!(texts(sql), vec!["COMMENT ON TABLE t IS 'a--b';"]);
    }

    #[test]
    fn test_filters_irrelevant_statements() {
        let sql = r#"
SET client_encoding = 'UTF8';
CREATE SEQUENCE s;
CREATE TABLESPACE fast LOCATION '/ssd';
CREATE TABLE a (id int);
ALTER TABLE a OWNER TO postgres;
comment  on table a is 'x';
CREATE INDEX idx ON a (id);
"#;
        let stmts = split_statements(sql);
        let kinds: Vec<_> = stmts.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StatementKind::CreateTable,
                StatementKind::AlterTable,
                StatementKind::CommentOn
            ]
        );
    }

    #[test]
    fn test_final_statement_without_semicolon() {
        let sql = "CREATE TABLE a (id int);\nCOMMENT ON TABLE a IS 'x'";
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1].text, "COMMENT ON TABLE a IS 'x';");
    }

    #[test]
    fn test_records_start_line() {
        let sql = "-- header\n\nCREATE TABLE a (\n id int\n);\nCOMMENT ON TABLE a IS 'x';\n";
        let lines: Vec<_> = split_statements(sql).iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 6]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let sql = "CREATE TABLE a (\r\n id int\r\n);\r\n";
        assert_eq!(texts(sql), vec!["CREATE TABLE a ( id int );"]);
    }

    #[test]
    fn test_classify_quoted_name_after_keyword() {
        assert_eq!(
            StatementKind::classify("CREATE TABLE\"t\"(id int);"),
            Some(StatementKind::CreateTable)
        );
        assert_eq!(StatementKind::classify("CREATE TABLESPACE x;"), None);
        assert_eq!(StatementKind::classify("CREATE"), None);
    }
}
