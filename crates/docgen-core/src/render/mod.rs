//! Knowledge document rendering

use std::fmt::Write;

use serde::Serialize;

use crate::enums::{EnumGroup, EnumRegistry};
use crate::schema::{Catalog, TableDef};

/// Render groups (discovery order) and tables (sorted by name) as Markdown.
///
/// Sections with nothing to show are omitted, so an empty scan renders an
/// empty string.
pub fn render_markdown(enums: &EnumRegistry, catalog: &Catalog) -> String {
    let mut md = String::new();

    if !enums.is_empty() {
        md.push_str("# Enumerations\n\n");
        for group in enums.groups() {
            write_group(&mut md, group);
        }
    }

    if !catalog.is_empty() {
        md.push_str("# Database Tables\n\n");
        for table in catalog.sorted_tables() {
            write_table(&mut md, table);
        }
    }

    md
}

fn write_group(md: &mut String, group: &EnumGroup) {
    let _ = writeln!(md, "## {}\n", group.name);

    if !group.tags.is_empty() {
        let tags: Vec<String> = group.tags.iter().map(|t| format!("`{}`", t)).collect();
        let _ = writeln!(md, "**Tags:** {}\n", tags.join(" · "));
    }

    md.push_str("| Name | Value | Description |\n|---|---|---|\n");
    for member in &group.members {
        let _ = writeln!(
            md,
            "| {} | {} | {} |",
            escape_cell(&member.name),
            escape_cell(&member.value.to_string()),
            escape_cell(&member.comment)
        );
    }
    md.push('\n');
}

fn write_table(md: &mut String, table: &TableDef) {
    match table.comment.as_deref().filter(|c| !c.is_empty()) {
        Some(comment) => {
            let _ = writeln!(md, "## {}（{}）\n", table.name, flatten(comment));
        }
        None => {
            let _ = writeln!(md, "## {}\n", table.name);
        }
    }

    md.push_str("| Column | Type | Description |\n|---|---|---|\n");
    for column in &table.columns {
        let comment = column
            .comment
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("-");
        let _ = writeln!(
            md,
            "| {} | {} | {} |",
            escape_cell(&column.name),
            escape_cell(&column.data_type),
            escape_cell(comment)
        );
    }
    md.push('\n');
}

/// Keep a value on one table row: `|` is escaped, newlines become spaces
fn escape_cell(text: &str) -> String {
    flatten(text).replace('|', "\\|")
}

fn flatten(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[derive(Serialize)]
struct KnowledgeDocument<'a> {
    enums: Vec<&'a EnumGroup>,
    tables: Vec<&'a TableDef>,
}

/// Render the same content as pretty-printed JSON
pub fn render_json(enums: &EnumRegistry, catalog: &Catalog) -> serde_json::Result<String> {
    let document = KnowledgeDocument {
        enums: enums.groups().collect(),
        tables: catalog.sorted_tables(),
    };
    serde_json::to_string_pretty(&document)
}
