//! Go source scanner for `@ai`-annotated const/var groups

use std::collections::BTreeSet;
use std::path::PathBuf;

use tree_sitter::{Node, Parser};

use super::metadata::{derive_base_name, generate_tags};
use super::{Category, DeclKind, EnumGroup, EnumMember, EnumValue};
use crate::error::ScanError;

/// Tag that opts a declaration into the knowledge document
pub const ANNOTATION_MARKER: &str = "@ai";

/// Reusable Go parser producing enumeration groups
pub struct SourceScanner {
    parser: Parser,
}

impl SourceScanner {
    pub fn new() -> Result<Self, ScanError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    /// Scan one Go file. `path` is recorded on every group as given.
    pub fn scan(&mut self, path: &str, bytes: &[u8]) -> Result<Vec<EnumGroup>, ScanError> {
        let source = std::str::from_utf8(bytes).map_err(|_| ScanError::InvalidUtf8 {
            path: PathBuf::from(path),
        })?;

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ScanError::NoTree {
                path: PathBuf::from(path),
            })?;
        let root = tree.root_node();

        if let Some(error) = first_error(root) {
            let position = error.start_position();
            return Err(ScanError::Syntax {
                path: PathBuf::from(path),
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        let package = package_name(root, source);
        let mut groups = Vec::new();
        let mut cursor = root.walk();

        for decl in root.named_children(&mut cursor) {
            let kind = match decl.kind() {
                "const_declaration" => DeclKind::Const,
                "var_declaration" => DeclKind::Var,
                _ => continue,
            };

            let Some(description) = annotation(decl, source) else {
                continue;
            };

            match build_group(decl, kind, description, &package, path, source) {
                Some(group) => groups.push(group),
                None => tracing::debug!(file = path, "annotated declaration has no members"),
            }
        }

        Ok(groups)
    }
}

fn build_group(
    decl: Node<'_>,
    kind: DeclKind,
    description: String,
    package: &str,
    file: &str,
    source: &str,
) -> Option<EnumGroup> {
    let specs = value_specs(decl);

    let mut members = Vec::new();
    for spec in &specs {
        members.extend(spec_members(*spec, &description, source));
    }
    if members.is_empty() {
        return None;
    }

    let name = format!("{} {}", group_base_name(&specs, source), description);
    let mut group = EnumGroup {
        category: Category::infer(&name),
        name,
        description,
        package: package.to_string(),
        file: file.to_string(),
        kind,
        members,
        tags: BTreeSet::new(),
    };
    group.tags = generate_tags(&group);
    Some(group)
}

/// `const_spec`/`var_spec` children in declaration order
fn value_specs<'t>(decl: Node<'t>) -> Vec<Node<'t>> {
    let mut specs = Vec::new();
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "const_spec" | "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(value_specs(child)),
            _ => {}
        }
    }
    specs
}

/// Explicit type of a lone spec, else the first name cut at its last
/// uppercase letter
fn group_base_name(specs: &[Node<'_>], source: &str) -> String {
    if let [spec] = specs {
        if let Some(ty) = spec.child_by_field_name("type") {
            if ty.kind() == "type_identifier" {
                return text(ty, source).to_string();
            }
        }
    }

    specs
        .first()
        .and_then(|spec| spec.child_by_field_name("name"))
        .map(|name| derive_base_name(text(name, source)).to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn spec_members(spec: Node<'_>, description: &str, source: &str) -> Vec<EnumMember> {
    let mut cursor = spec.walk();
    // The grammar also tags the separating commas with the `name` field
    let names: Vec<Node<'_>> = spec
        .children_by_field_name("name", &mut cursor)
        .filter(|n| n.kind() == "identifier")
        .collect();

    let values: Vec<Node<'_>> = match spec.child_by_field_name("value") {
        Some(list) => {
            let mut cursor = list.walk();
            let values = list
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .collect();
            values
        }
        None => Vec::new(),
    };

    let comment = match trailing_comment(spec) {
        Some(comment) => comment_text(&[comment], source),
        None => {
            let doc = leading_comments(spec);
            if doc.is_empty() {
                description.to_string()
            } else {
                comment_text(&doc, source)
            }
        }
    };

    names
        .iter()
        .enumerate()
        .map(|(i, name)| EnumMember {
            name: text(*name, source).to_string(),
            value: values
                .get(i)
                .map(|v| render_value(*v, source))
                .unwrap_or(EnumValue::Absent),
            comment: comment.clone(),
        })
        .collect()
}

fn render_value(node: Node<'_>, source: &str) -> EnumValue {
    match node.kind() {
        "int_literal"
        | "float_literal"
        | "imaginary_literal"
        | "rune_literal"
        | "interpreted_string_literal"
        | "raw_string_literal" => EnumValue::Literal(text(node, source).to_string()),
        "identifier" | "true" | "false" | "nil" | "iota" => {
            EnumValue::Identifier(text(node, source).to_string())
        }
        "selector_expression" => {
            let operand = node.child_by_field_name("operand");
            let field = node.child_by_field_name("field");
            match (operand, field) {
                (Some(operand), Some(field)) if operand.kind() == "identifier" => {
                    EnumValue::Qualified {
                        qualifier: text(operand, source).to_string(),
                        selector: text(field, source).to_string(),
                    }
                }
                _ => EnumValue::Absent,
            }
        }
        _ => EnumValue::Absent,
    }
}

/// Description from the first marked line of the declaration's doc comment
fn annotation(decl: Node<'_>, source: &str) -> Option<String> {
    leading_comments(decl).into_iter().find_map(|comment| {
        let raw = text(comment, source);
        if !raw.contains(ANNOTATION_MARKER) {
            return None;
        }
        let body = comment_body(raw).join("\n");
        Some(body.replacen(ANNOTATION_MARKER, "", 1).trim().to_string())
    })
}

fn package_name(root: Node<'_>, source: &str) -> String {
    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_clause");

    clause
        .and_then(|clause| {
            let mut cursor = clause.walk();
            let name = clause
                .named_children(&mut cursor)
                .find(|n| n.kind() == "package_identifier");
            name
        })
        .map(|name| text(name, source).to_string())
        .unwrap_or_default()
}

/// Contiguous own-line comments ending on the line right above `node`
fn leading_comments<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut comments = Vec::new();
    let mut next_row = node.start_position().row;
    let mut current = prev_token(node);

    while let Some(prev) = current {
        if prev.kind() != "comment" || prev.end_position().row + 1 != next_row {
            break;
        }
        let before = prev_token(prev);
        if before.is_some_and(|b| b.end_position().row == prev.start_position().row) {
            // Trailing comment of the previous statement
            break;
        }
        comments.push(prev);
        next_row = prev.start_position().row;
        current = before;
    }

    comments.reverse();
    comments
}

/// Comment starting on the row where `node` ends
fn trailing_comment<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let row = node.end_position().row;

    if let Some(last) = node.named_child(node.named_child_count().saturating_sub(1)) {
        if last.kind() == "comment" && last.start_position().row == row {
            return Some(last);
        }
    }

    let mut current = node;
    loop {
        if let Some(next) = current.next_named_sibling() {
            return (next.kind() == "comment" && next.start_position().row == row).then_some(next);
        }
        current = current.parent()?;
        if current.kind() == "source_file" {
            return None;
        }
    }
}

/// Previous sibling, skipping newline terminators
fn prev_token<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let mut prev = node.prev_sibling();
    while let Some(p) = prev {
        if p.is_named() || p.kind() != "\n" {
            return Some(p);
        }
        prev = p.prev_sibling();
    }
    None
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    Some(node)
}

/// Lines of a single comment with its markers removed
fn comment_body(raw: &str) -> Vec<String> {
    if let Some(rest) = raw.strip_prefix("//") {
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        return vec![rest.trim_end().to_string()];
    }
    if let Some(inner) = raw.strip_prefix("/*").and_then(|r| r.strip_suffix("*/")) {
        return inner.lines().map(|l| l.trim_end().to_string()).collect();
    }
    vec![raw.trim_end().to_string()]
}

/// Text of a comment group: markers removed, surrounding blank lines
/// dropped, lines joined with `\n`
fn comment_text(comments: &[Node<'_>], source: &str) -> String {
    let lines: Vec<String> = comments
        .iter()
        .flat_map(|c| comment_body(text(*c, source)))
        .collect();
    lines.join("\n").trim().to_string()
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}
