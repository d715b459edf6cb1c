//! Schema management module

mod builder;
mod catalog;
mod ddl;
mod splitter;

pub use builder::SchemaBuilder;
pub use catalog::{Catalog, ColumnDef, QualifiedName, TableDef};
pub use splitter::{split_statements, Statement, StatementKind};
