//! Schema catalog - stores table and column definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Table catalog keyed by bare table name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Table name -> table, in discovery order
    pub tables: IndexMap<String, TableDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a table, creating an empty placeholder if unseen
    pub fn get_or_create_table(&mut self, name: &str) -> &mut TableDef {
        self.tables
            .entry(name.to_string())
            .or_insert_with(|| TableDef::new(name))
    }

    /// Look up a table by name
    pub fn get_table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Tables sorted ascending by name
    pub fn sorted_tables(&self) -> Vec<&TableDef> {
        let mut tables: Vec<&TableDef> = self.tables.values().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        tables
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

/// Qualified name (schema.table or just table)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub schema: Option<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Build from already unquoted name segments; anything before the last
    /// two segments (a database or catalog prefix) is dropped
    pub fn from_segments(segments: &[String]) -> Option<Self> {
        match segments {
            [] => None,
            [name] => Some(Self::new(name)),
            [.., schema, name] => Some(Self::with_schema(schema, name)),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.{}", schema, self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Table definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub comment: Option<String>,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            columns: Vec::new(),
        }
    }

    /// Get a column by name, exact match first, then ASCII case-insensitive
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Get a column by name (mutable)
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut ColumnDef> {
        self.column_index(name).map(move |i| &mut self.columns[i])
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(name))
            })
    }

    /// Check if a column exists
    pub fn column_exists(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Get all column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Replace the column list, keeping comments already attached to
    /// columns of the same name
    pub fn replace_columns(&mut self, columns: Vec<ColumnDef>) {
        let previous = std::mem::replace(&mut self.columns, columns);
        for old in previous {
            if let Some(comment) = old.comment {
                if let Some(col) = self.get_column_mut(&old.name) {
                    col.comment.get_or_insert(comment);
                }
            }
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Raw type text as declared, e.g. `numeric(10,2)`
    pub data_type: String,
    pub comment: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
