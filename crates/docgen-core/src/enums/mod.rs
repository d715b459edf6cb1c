//! Annotated enumeration groups extracted from Go sources

mod metadata;
mod registry;
mod scanner;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

pub use metadata::{derive_base_name, extract_keywords, generate_tags, split_camel_case};
pub use registry::EnumRegistry;
pub use scanner::{SourceScanner, ANNOTATION_MARKER};

/// Declaration keyword of an enumeration group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Const,
    Var,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Const => write!(f, "const"),
            DeclKind::Var => write!(f, "var"),
        }
    }
}

/// Semantic category inferred from a group name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Status,
    Type,
    Flag,
    Mode,
    Level,
    Other,
}

impl Category {
    /// Case-insensitive substring match, first match wins:
    /// status/state, type, flag, mode, level
    pub fn infer(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("status") || name.contains("state") {
            Category::Status
        } else if name.contains("type") {
            Category::Type
        } else if name.contains("flag") {
            Category::Flag
        } else if name.contains("mode") {
            Category::Mode
        } else if name.contains("level") {
            Category::Level
        } else {
            Category::Other
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Status => "status",
            Category::Type => "type",
            Category::Flag => "flag",
            Category::Mode => "mode",
            Category::Level => "level",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

/// Initializer of an enumeration member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValue {
    /// Basic literal, rendered with its source quoting (`1`, `"a"`, `'x'`)
    Literal(String),
    /// Bare identifier such as `iota` or another constant
    Identifier(String),
    /// `qualifier.selector`, e.g. `http.StatusOK`
    Qualified { qualifier: String, selector: String },
    /// No initializer, or one that is not a literal or name
    Absent,
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Literal(text) | EnumValue::Identifier(text) => f.write_str(text),
            EnumValue::Qualified {
                qualifier,
                selector,
            } => write!(f, "{}.{}", qualifier, selector),
            EnumValue::Absent => Ok(()),
        }
    }
}

impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single named member of an enumeration group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumValue,
    pub comment: String,
}

/// A named cluster of annotated constants or variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumGroup {
    /// `<base name> <description>`
    pub name: String,
    pub description: String,
    pub package: String,
    pub file: String,
    pub kind: DeclKind,
    pub members: Vec<EnumMember>,
    pub tags: BTreeSet<String>,
    pub category: Category,
}

impl EnumGroup {
    /// Fold a later sighting of the same group into this one.
    ///
    /// Descriptions are newline-joined when they differ, members are
    /// unioned by name with existing members winning, tags are unioned.
    pub fn merge(&mut self, other: EnumGroup) {
        if !other.description.is_empty() && other.description != self.description {
            self.description.push('\n');
            self.description.push_str(&other.description);
        }

        for member in other.members {
            if !self.members.iter().any(|m| m.name == member.name) {
                self.members.push(member);
            }
        }

        self.tags.extend(other.tags);
    }

    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}
