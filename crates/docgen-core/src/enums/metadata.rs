//! Tag and naming heuristics for enumeration groups

use std::collections::BTreeSet;

use super::EnumGroup;

const STOP_WORDS: &[&str] = &["the", "a", "an", "and", "or", "in", "on", "at", "to", "for"];

const KEYWORD_TRIM: &[char] = &[',', '.', '(', ')', '[', ']', '{', '}', '"', '\''];

/// Split at every uppercase letter: `MailStatus` -> `["Mail", "Status"]`
pub fn split_camel_case(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for c in s.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Lowercased whitespace-separated words, stripped of surrounding
/// punctuation, without stop words, longer than two bytes
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(KEYWORD_TRIM))
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Tags for a group: camel-case pieces of the group name and member names,
/// plus keywords from the description and member comments
pub fn generate_tags(group: &EnumGroup) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let mut add_words = |name: &str| {
        tags.extend(split_camel_case(name).iter().map(|w| w.to_lowercase()));
    };

    add_words(&group.name);
    for member in &group.members {
        add_words(&member.name);
    }

    tags.extend(extract_keywords(&group.description));
    for member in &group.members {
        tags.extend(extract_keywords(&member.comment));
    }

    tags
}

/// Prefix of a member name up to its last ASCII uppercase letter.
///
/// `MailStatusSending` -> `MailStatus`. A name with no uppercase letter past
/// its first character is returned whole.
pub fn derive_base_name(name: &str) -> &str {
    match name.rfind(|c: char| c.is_ascii_uppercase()) {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{Category, DeclKind, EnumMember, EnumValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("MailStatus"), vec!["Mail", "Status"]);
        assert_eq!(split_camel_case("HTTPCode"), vec!["H", "T", "T", "P", "Code"]);
        assert_eq!(split_camel_case("lower"), vec!["lower"]);
        assert!(split_camel_case("").is_empty());
    }

    #[test]
    fn test_extract_keywords() {
        assert_eq!(
            extract_keywords("The order (paid) for an account, ok"),
            vec!["order", "paid", "account"]
        );
        // CJK words are measured in bytes
        assert_eq!(extract_keywords("邮件 发送中"), vec!["邮件", "发送中"]);
    }

    #[test]
    fn test_derive_base_name() {
        assert_eq!(derive_base_name("MailStatusSending"), "MailStatus");
        assert_eq!(derive_base_name("OrderPaid"), "Order");
        assert_eq!(derive_base_name("Pending"), "Pending");
        assert_eq!(derive_base_name("pending"), "pending");
        assert_eq!(derive_base_name("statusOK"), "statusO");
    }

    #[test]
    fn test_generate_tags() {
        let group = EnumGroup {
            name: "MailStatus 邮件状态".to_string(),
            description: "邮件状态".to_string(),
            package: "mail".to_string(),
            file: "mail/status.go".to_string(),
            kind: DeclKind::Const,
            members: vec![EnumMember {
                name: "MailStatusSent".to_string(),
                value: EnumValue::Literal("1".to_string()),
                comment: "sent to the user".to_string(),
            }],
            tags: BTreeSet::new(),
            category: Category::Status,
        };

        let tags: Vec<_> = generate_tags(&group).into_iter().collect();
        assert_eq!(
            tags,
            vec![
                "mail",
                "sent",
                "status",
                "status 邮件状态",
                "user",
                "邮件状态"
            ]
        );
    }
}
