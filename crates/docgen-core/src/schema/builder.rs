//! Schema builder - interprets CREATE TABLE and COMMENT ON statements

use indexmap::IndexMap;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::dialect::SqlDialect;
use crate::encoding::decode_lines;
use crate::error::{Diagnostic, DiagnosticKind, Span};
use crate::schema::ddl::{
    column_type, find_open_paren, is_table_clause, parenthesized_body, split_top_level,
    top_level_tokens,
};
use crate::schema::splitter::{split_statements, Statement, StatementKind};
use crate::schema::{Catalog, ColumnDef, QualifiedName};

/// Object kind named after `COMMENT ON`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentTarget {
    Table,
    Column,
    Unspecified,
}

/// A parsed `COMMENT ON ... IS ...` statement
#[derive(Debug, Clone, PartialEq, Eq)]
struct CommentStatement {
    target: CommentTarget,
    segments: Vec<String>,
    /// `None` for `IS NULL`
    text: Option<String>,
}

/// Builder for constructing a Catalog from SQL schema files.
///
/// One builder is shared across every SQL file of a scan, so comments in
/// one file can land on tables created in another.
pub struct SchemaBuilder {
    dialect: SqlDialect,
    catalog: Catalog,
    /// Column comments whose table or column is not known yet
    pending: IndexMap<(String, String), String>,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::with_dialect(SqlDialect::default())
    }

    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            catalog: Catalog::new(),
            pending: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Decode raw file bytes and parse them
    pub fn parse_bytes(&mut self, file: &str, bytes: &[u8]) {
        let sql = decode_lines(bytes);
        self.parse(file, &sql);
    }

    /// Parse SQL schema text and fold it into the catalog
    pub fn parse(&mut self, file: &str, sql: &str) {
        let statements = split_statements(sql);
        tracing::debug!(file, count = statements.len(), "split SQL statements");

        for stmt in &statements {
            self.process_statement(file, stmt);
        }
    }

    /// Process a single statement; a statement that cannot be interpreted
    /// is reported as a warning and skipped
    pub fn process_statement(&mut self, file: &str, stmt: &Statement) {
        let result = match stmt.kind {
            StatementKind::CreateTable => self.process_create_table(&stmt.text),
            StatementKind::CommentOn => self.process_comment(&stmt.text),
            StatementKind::AlterTable => {
                tracing::debug!(file, line = stmt.line, "ignoring ALTER TABLE");
                Ok(())
            }
        };

        if let Err(diag) = result {
            self.diagnostics.push(
                diag.with_file(file)
                    .with_span(Span::statement(stmt.line, &stmt.text))
                    .with_statement(stmt.text.clone()),
            );
        }
    }

    /// Process CREATE TABLE statement
    fn process_create_table(&mut self, stmt: &str) -> Result<(), Diagnostic> {
        let header = match find_open_paren(stmt) {
            Some(open) => &stmt[..open],
            None => stmt.trim_end_matches(';'),
        };
        let name = self.table_name(header)?.ok_or_else(|| {
            Diagnostic::warning(
                DiagnosticKind::MissingTableName,
                "could not extract a table name from CREATE TABLE",
            )
        })?;

        let body = parenthesized_body(stmt).ok_or_else(|| {
            Diagnostic::warning(
                DiagnosticKind::MissingColumnList,
                format!("CREATE TABLE {} has no column list", name.name),
            )
        })?;

        let columns: Vec<ColumnDef> = split_top_level(body, b',')
            .into_iter()
            .filter_map(|clause| self.parse_column(clause))
            .collect();
        tracing::debug!(table = %name, columns = columns.len(), "parsed CREATE TABLE");

        let table = self.catalog.get_or_create_table(&name.name);
        table.replace_columns(columns);

        let waiting: Vec<(String, String)> = self
            .pending
            .keys()
            .filter(|(t, _)| *t == name.name)
            .cloned()
            .collect();
        for key in waiting {
            if let Some(col) = table.get_column_mut(&key.1) {
                col.comment = self.pending.shift_remove(&key);
            }
        }

        Ok(())
    }

    /// Parse one column clause; constraints and malformed clauses yield `None`
    fn parse_column(&self, clause: &str) -> Option<ColumnDef> {
        let clause = clause.trim();
        if clause.is_empty() || is_table_clause(clause, self.dialect.has_inline_indexes()) {
            return None;
        }

        let tokens = top_level_tokens(clause);
        if tokens.len() < 2 {
            return None;
        }

        let name = self.dialect.unquote(tokens[0]);
        Some(ColumnDef::new(name, column_type(&tokens[1..])))
    }

    /// Extract the table name from the text before the column list
    fn table_name(&self, header: &str) -> Result<Option<QualifiedName>, Diagnostic> {
        let tokens = self.tokenize(header)?;
        let mut pos = 0;

        for keyword in ["CREATE", "TABLE"] {
            if !is_keyword(tokens.get(pos), keyword) {
                return Ok(None);
            }
            pos += 1;
        }
        if is_keyword(tokens.get(pos), "IF")
            && is_keyword(tokens.get(pos + 1), "NOT")
            && is_keyword(tokens.get(pos + 2), "EXISTS")
        {
            pos += 3;
        }

        let (segments, _) = object_name(&tokens, pos);
        Ok(QualifiedName::from_segments(&segments))
    }

    /// Process COMMENT ON statement
    fn process_comment(&mut self, stmt: &str) -> Result<(), Diagnostic> {
        let comment = self.parse_comment(stmt)?;

        let (table_name, column_name) = match (comment.target, comment.segments.as_slice()) {
            (_, [name]) | (CommentTarget::Table, [.., name]) => (name.clone(), None),
            (_, [.., table, column]) => (table.clone(), Some(column.clone())),
            (_, []) => {
                return Err(Diagnostic::warning(
                    DiagnosticKind::MalformedComment,
                    "COMMENT ON has no target",
                ))
            }
        };

        let Some(column_name) = column_name else {
            self.catalog.get_or_create_table(&table_name).comment = comment.text;
            return Ok(());
        };

        // An unseen table gets an empty placeholder entry
        let column = self
            .catalog
            .get_or_create_table(&table_name)
            .get_column_mut(&column_name);
        match (column, comment.text) {
            (Some(col), text) => col.comment = text,
            (None, Some(text)) => {
                tracing::debug!(
                    table = %table_name,
                    column = %column_name,
                    "buffering comment for unknown column"
                );
                self.pending.insert((table_name, column_name), text);
            }
            (None, None) => {
                self.pending.shift_remove(&(table_name, column_name));
            }
        }
        Ok(())
    }

    fn parse_comment(&self, stmt: &str) -> Result<CommentStatement, Diagnostic> {
        let malformed = |message: &str| {
            Diagnostic::warning(DiagnosticKind::MalformedComment, message)
                .with_help("expected COMMENT ON [TABLE|COLUMN] <target> IS '<text>'")
        };

        let tokens = self.tokenize(stmt)?;
        if !is_keyword(tokens.first(), "COMMENT") || !is_keyword(tokens.get(1), "ON") {
            return Err(malformed("statement does not start with COMMENT ON"));
        }

        let mut pos = 2;
        let target = if is_keyword(tokens.get(pos), "TABLE") {
            CommentTarget::Table
        } else if is_keyword(tokens.get(pos), "COLUMN") {
            CommentTarget::Column
        } else {
            CommentTarget::Unspecified
        };
        if target != CommentTarget::Unspecified {
            pos += 1;
        }

        let (segments, next) = object_name(&tokens, pos);
        if segments.is_empty() {
            return Err(malformed("COMMENT ON has no target"));
        }
        if !is_keyword(tokens.get(next), "IS") {
            return Err(malformed("missing IS after comment target"));
        }

        let text = match tokens.get(next + 1) {
            Some(
                Token::SingleQuotedString(s)
                | Token::EscapedStringLiteral(s)
                | Token::NationalStringLiteral(s)
                | Token::DoubleQuotedString(s),
            ) => Some(s.clone()),
            Some(Token::Word(w)) if w.quote_style == Some('"') => Some(w.value.clone()),
            Some(token) if is_keyword(Some(token), "NULL") => None,
            _ => return Err(malformed("missing quoted comment text")),
        };

        Ok(CommentStatement {
            target,
            segments,
            text,
        })
    }

    /// Tokenize with the dialect's quoting rules, dropping whitespace
    fn tokenize(&self, sql: &str) -> Result<Vec<Token>, Diagnostic> {
        let dialect = self.dialect.tokenizer_dialect();
        let tokens = Tokenizer::new(dialect.as_ref(), sql)
            .tokenize()
            .map_err(|e| {
                Diagnostic::warning(DiagnosticKind::TokenizeError, format!("{}", e))
            })?;
        Ok(tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace(_)))
            .collect())
    }

    /// Consume the builder and return the catalog.
    ///
    /// Comments still waiting for their column are dropped here.
    pub fn build(self) -> (Catalog, Vec<Diagnostic>) {
        for (table, column) in self.pending.keys() {
            tracing::debug!(%table, %column, "dropping comment for unknown column");
        }
        (self.catalog, self.diagnostics)
    }

    /// Get a reference to the current catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Record a diagnostic produced outside the SQL path
    pub fn push_diagnostic(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the token is the given unquoted keyword
fn is_keyword(token: Option<&Token>, keyword: &str) -> bool {
    matches!(token, Some(Token::Word(w)) if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(keyword))
}

/// Read `ident(.ident)*` starting at `pos`; returns the unquoted segments
/// and the index of the first token after the name
fn object_name(tokens: &[Token], mut pos: usize) -> (Vec<String>, usize) {
    let mut segments = Vec::new();
    while let Some(Token::Word(w)) = tokens.get(pos) {
        segments.push(w.value.clone());
        pos += 1;
        if matches!(tokens.get(pos), Some(Token::Period)) {
            pos += 1;
        } else {
            break;
        }
    }
    (segments, pos)
}
