//! SQL dialect support

use sqlparser::dialect::{Dialect, MySqlDialect, PostgreSqlDialect};
use std::str::FromStr;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    PostgreSQL,
    MySQL,
}

impl SqlDialect {
    /// Get the sqlparser dialect used for tokenizing identifiers and strings
    pub fn tokenizer_dialect(&self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
            SqlDialect::MySQL => Box::new(MySqlDialect {}),
        }
    }

    /// Characters that may quote an identifier in this dialect
    pub fn identifier_quotes(&self) -> &'static [char] {
        match self {
            SqlDialect::PostgreSQL => &['"'],
            SqlDialect::MySQL => &['`', '"'],
        }
    }

    /// Strip identifier quoting from a raw token, e.g. `"id"` -> `id`
    pub fn unquote<'a>(&self, ident: &'a str) -> &'a str {
        ident.trim_matches(self.identifier_quotes())
    }

    /// Whether MySQL-only index clauses (`KEY`, `INDEX`, ...) may appear in a column list
    pub fn has_inline_indexes(&self) -> bool {
        matches!(self, SqlDialect::MySQL)
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(SqlDialect::PostgreSQL),
            "mysql" | "mysql8" | "mariadb" => Ok(SqlDialect::MySQL),
            _ => Err(format!(
                "Unknown dialect: '{}'. Supported dialects: postgresql, mysql.",
                s
            )),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::PostgreSQL => write!(f, "postgresql"),
            SqlDialect::MySQL => write!(f, "mysql"),
        }
    }
}
