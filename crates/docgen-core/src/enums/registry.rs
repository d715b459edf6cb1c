//! Registry of enumeration groups, merging same-named groups across files

use indexmap::IndexMap;

use super::EnumGroup;

/// Enumeration groups keyed by full group name, in discovery order
#[derive(Debug, Default)]
pub struct EnumRegistry {
    groups: IndexMap<String, EnumGroup>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group, merging it into an existing group of the same name
    pub fn insert(&mut self, group: EnumGroup) {
        match self.groups.get_mut(&group.name) {
            Some(existing) => {
                tracing::debug!(group = %group.name, file = %group.file, "merging enum group");
                existing.merge(group);
            }
            None => {
                self.groups.insert(group.name.clone(), group);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&EnumGroup> {
        self.groups.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = &EnumGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{Category, DeclKind, EnumMember, EnumValue};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn group(name: &str, members: &[&str]) -> EnumGroup {
        EnumGroup {
            name: name.to_string(),
            description: String::new(),
            package: "p".to_string(),
            file: "p/a.go".to_string(),
            kind: DeclKind::Const,
            members: members
                .iter()
                .map(|m| EnumMember {
                    name: m.to_string(),
                    value: EnumValue::Absent,
                    comment: String::new(),
                })
                .collect(),
            tags: BTreeSet::new(),
            category: Category::Other,
        }
    }

    #[test]
    fn test_insertion_order_and_merge() {
        let mut registry = EnumRegistry::new();
        registry.insert(group("Color 颜色", &["Red"]));
        registry.insert(group("Size 尺寸", &["Small"]));
        registry.insert(group("Color 颜色", &["Red", "Blue"]));

        let names: Vec<_> = registry.groups().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Color 颜色", "Size 尺寸"]);
        assert_eq!(registry.len(), 2);

        let color = registry.get("Color 颜色").unwrap();
        let members: Vec<_> = color.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, vec!["Red", "Blue"]);
    }
}
