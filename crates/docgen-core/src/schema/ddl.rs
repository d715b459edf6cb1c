//! Quote- and paren-aware helpers for picking apart column lists

/// Words that continue a multi-word type name, e.g. `character varying`
const TYPE_CONTINUATIONS: &[&str] = &[
    "VARYING",
    "PRECISION",
    "WITH",
    "WITHOUT",
    "TIME",
    "ZONE",
    "UNSIGNED",
    "ZEROFILL",
];

/// Leading words of table-level clauses that are not columns
const TABLE_CLAUSES: &[&str] = &[
    "PRIMARY",
    "CONSTRAINT",
    "FOREIGN",
    "UNIQUE",
    "CHECK",
    "EXCLUDE",
    "LIKE",
];

/// MySQL index clauses that may appear inline in a column list
const INLINE_INDEX_CLAUSES: &[&str] = &["KEY", "INDEX", "FULLTEXT", "SPATIAL"];

/// Walks a string tracking quote state, yielding `(index, byte, depth)`
/// for every byte outside of quotes.
fn for_each_unquoted(text: &str, mut f: impl FnMut(usize, u8, usize) -> bool) {
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' | b'`' => quote = Some(b),
            b'(' => {
                if !f(i, b, depth) {
                    return;
                }
                depth += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                if !f(i, b, depth) {
                    return;
                }
            }
            _ => {
                if !f(i, b, depth) {
                    return;
                }
            }
        }
    }
}

/// Byte index of the first unquoted `(`
pub fn find_open_paren(text: &str) -> Option<usize> {
    let mut found = None;
    for_each_unquoted(text, |i, b, _| {
        if b == b'(' {
            found = Some(i);
            false
        } else {
            true
        }
    });
    found
}

/// Content between the first `(` and its matching `)`.
///
/// When the parentheses never balance, the body runs to the last `)`.
pub fn parenthesized_body(text: &str) -> Option<&str> {
    let open = find_open_paren(text)?;
    let mut close = None;
    for_each_unquoted(&text[open..], |i, b, depth| {
        if b == b')' && depth == 0 {
            close = Some(open + i);
            false
        } else {
            true
        }
    });

    let close = match close {
        Some(close) => close,
        None => text.rfind(')').filter(|&c| c > open)?,
    };
    Some(&text[open + 1..close])
}

/// Split on `sep` at paren depth zero, outside quotes
pub fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for_each_unquoted(text, |i, b, depth| {
        if b == sep && depth == 0 {
            parts.push(&text[start..i]);
            start = i + 1;
        }
        true
    });
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

/// Whitespace-separated tokens at paren depth zero, outside quotes
pub fn top_level_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' | b'`' => {
                quote = Some(b);
                start.get_or_insert(i);
            }
            b'(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            b')' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(i);
            }
            b if b.is_ascii_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&text[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

/// Keyword part of a token, e.g. `VARCHAR` for `varchar(10)`
fn keyword_of(token: &str) -> String {
    token
        .split(['(', '['])
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase()
}

/// Whether a column-list clause is a table-level constraint or index
pub fn is_table_clause(clause: &str, inline_indexes: bool) -> bool {
    let Some(first) = top_level_tokens(clause).first().copied() else {
        return false;
    };
    if first.starts_with(['"', '`']) {
        return false;
    }
    let keyword = keyword_of(first);
    TABLE_CLAUSES.contains(&keyword.as_str())
        || (inline_indexes && INLINE_INDEX_CLAUSES.contains(&keyword.as_str()))
}

/// Raw type text from the tokens following the column name.
///
/// The first token is always part of the type. Later tokens are included
/// while they continue a multi-word type name or are a separated
/// parenthesized/array suffix.
pub fn column_type(tokens: &[&str]) -> String {
    let Some((first, rest)) = tokens.split_first() else {
        return String::new();
    };

    let mut parts = vec![*first];
    for token in rest {
        let continues = token.starts_with(['(', '['])
            || TYPE_CONTINUATIONS.contains(&keyword_of(token).as_str());
        if !continues {
            break;
        }
        parts.push(*token);
    }
    parts.join(" ")
}
