//! Error and diagnostic types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset from start of source
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl Span {
    /// Create a span with line and column information
    pub fn with_location(line: usize, column: usize, length: usize) -> Self {
        Self {
            offset: 0,
            length,
            line,
            column,
        }
    }

    /// Span covering a whole statement that starts on `line`
    pub fn statement(line: usize, text: &str) -> Self {
        Self::with_location(line, 1, text.len())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A recoverable problem found while scanning.
///
/// Diagnostics never stop a scan; the offending statement or file is
/// skipped and the rest of the input is still processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub span: Option<Span>,
    pub statement: Option<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            file: None,
            span: None,
            statement: None,
            help: None,
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            file: None,
            span: None,
            statement: None,
            help: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Get the diagnostic code string (e.g., "W0001")
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Types of diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// W0001: CREATE TABLE without a recognizable table name
    MissingTableName,
    /// W0002: CREATE TABLE without a parenthesized column list
    MissingColumnList,
    /// W0003: COMMENT ON that does not match `<target> IS '<text>'`
    MalformedComment,
    /// W0004: Statement could not be tokenized
    TokenizeError,
    /// E1000: Source file could not be parsed (only with keep-going)
    SourceParseError,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingTableName => "W0001",
            DiagnosticKind::MissingColumnList => "W0002",
            DiagnosticKind::MalformedComment => "W0003",
            DiagnosticKind::TokenizeError => "W0004",
            DiagnosticKind::SourceParseError => "E1000",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingTableName => "missing-table-name",
            DiagnosticKind::MissingColumnList => "missing-column-list",
            DiagnosticKind::MalformedComment => "malformed-comment",
            DiagnosticKind::TokenizeError => "tokenize-error",
            DiagnosticKind::SourceParseError => "source-parse-error",
        }
    }
}

/// Fatal scan errors. Any of these aborts the scan of the whole tree.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ScanError {
    #[error("failed to load the Go grammar")]
    #[diagnostic(code(docgen::grammar))]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("{} is not valid UTF-8", path.display())]
    #[diagnostic(
        code(docgen::invalid_utf8),
        help("Go sources must be UTF-8 encoded")
    )]
    InvalidUtf8 { path: PathBuf },

    #[error("syntax error in {} at line {line}, column {column}", path.display())]
    #[diagnostic(code(docgen::syntax))]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("parser produced no syntax tree for {}", path.display())]
    #[diagnostic(code(docgen::parse))]
    NoTree { path: PathBuf },
}

impl ScanError {
    /// Convert into a diagnostic so the scan can continue past this file
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(DiagnosticKind::SourceParseError, self.to_string());
        match self {
            ScanError::Syntax { path, line, column } => diag
                .with_file(path.display().to_string())
                .with_span(Span::with_location(*line, *column, 1)),
            ScanError::InvalidUtf8 { path } | ScanError::NoTree { path } => {
                diag.with_file(path.display().to_string())
            }
            ScanError::Grammar(_) => diag,
        }
    }
}
