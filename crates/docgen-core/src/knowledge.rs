//! Scan context tying the Go and SQL extractors to one document

use std::path::Path;

use crate::dialect::SqlDialect;
use crate::enums::{EnumRegistry, SourceScanner};
use crate::error::{Diagnostic, ScanError};
use crate::render::{render_json, render_markdown};
use crate::schema::{Catalog, SchemaBuilder};

/// Which extractor a file is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Go,
    Sql,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("go") => Some(SourceKind::Go),
            Some("sql") => Some(SourceKind::Sql),
            _ => None,
        }
    }
}

/// Accumulates enumeration groups and table definitions over one scan run
pub struct KnowledgeBase {
    scanner: SourceScanner,
    enums: EnumRegistry,
    schema: SchemaBuilder,
}

impl KnowledgeBase {
    pub fn new() -> Result<Self, ScanError> {
        Self::with_dialect(SqlDialect::default())
    }

    pub fn with_dialect(dialect: SqlDialect) -> Result<Self, ScanError> {
        Ok(Self {
            scanner: SourceScanner::new()?,
            enums: EnumRegistry::new(),
            schema: SchemaBuilder::with_dialect(dialect),
        })
    }

    /// Scan a Go file and register its annotated groups
    pub fn ingest_source(&mut self, path: &str, bytes: &[u8]) -> Result<usize, ScanError> {
        let groups = self.scanner.scan(path, bytes)?;
        let count = groups.len();
        for group in groups {
            self.enums.insert(group);
        }
        tracing::info!(file = path, groups = count, "scanned Go source");
        Ok(count)
    }

    /// Parse a SQL file into the table catalog
    pub fn ingest_sql(&mut self, path: &str, bytes: &[u8]) {
        let before = self.schema.catalog().len();
        self.schema.parse_bytes(path, bytes);
        tracing::info!(
            file = path,
            new_tables = self.schema.catalog().len().saturating_sub(before),
            "scanned SQL schema"
        );
    }

    /// Route a file by extension. Returns `false` for files that are
    /// neither Go nor SQL.
    pub fn ingest_file(&mut self, path: &str, bytes: &[u8]) -> Result<bool, ScanError> {
        match SourceKind::from_path(Path::new(path)) {
            Some(SourceKind::Go) => {
                self.ingest_source(path, bytes)?;
                Ok(true)
            }
            Some(SourceKind::Sql) => {
                self.ingest_sql(path, bytes);
                Ok(true)
            }
            None => {
                tracing::trace!(file = path, "ignoring file");
                Ok(false)
            }
        }
    }

    /// Record a per-file failure instead of aborting the scan
    pub fn record_error(&mut self, error: &ScanError) {
        tracing::warn!(%error, "skipping file");
        self.schema.push_diagnostic(error.to_diagnostic());
    }

    pub fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    pub fn catalog(&self) -> &Catalog {
        self.schema.catalog()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.schema.diagnostics()
    }

    pub fn render(&self) -> String {
        render_markdown(&self.enums, self.schema.catalog())
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        render_json(&self.enums, self.schema.catalog())
    }

    /// End the run, dropping comments that never found their column
    pub fn finish(self) -> (EnumRegistry, Catalog, Vec<Diagnostic>) {
        let (catalog, diagnostics) = self.schema.build();
        tracing::debug!(
            groups = self.enums.len(),
            tables = catalog.len(),
            "knowledge base complete"
        );
        (self.enums, catalog, diagnostics)
    }
}
