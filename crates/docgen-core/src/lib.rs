//! docgen-core: knowledge document extraction library
//!
//! Collects `@ai`-annotated enumeration groups from Go sources and table
//! and column comments from SQL schema files, then renders them into a
//! single Markdown or JSON document.

pub mod dialect;
pub mod encoding;
pub mod enums;
pub mod error;
pub mod knowledge;
pub mod render;
pub mod schema;

pub use dialect::SqlDialect;
pub use enums::{Category, DeclKind, EnumGroup, EnumMember, EnumRegistry, EnumValue};
pub use error::{Diagnostic, DiagnosticKind, ScanError, Severity, Span};
pub use knowledge::{KnowledgeBase, SourceKind};
pub use schema::{Catalog, ColumnDef, QualifiedName, SchemaBuilder, TableDef};
