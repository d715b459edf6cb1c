//! Text encoding resolution for legacy Chinese encodings

use std::borrow::Cow;

use encoding_rs::{Encoding, BIG5, GB18030, GBK};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Decode `bytes` into UTF-8 text.
///
/// Valid UTF-8 is returned borrowed. Otherwise each fallback encoding is
/// tried and the first one that decodes without malformed sequences wins.
/// If none does, invalid sequences are replaced with U+FFFD.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    for encoding in fallback_encodings() {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            tracing::trace!(encoding = encoding.name(), "decoded non-UTF-8 text");
            return Cow::Owned(text.into_owned());
        }
    }

    String::from_utf8_lossy(bytes)
}

/// Encodings tried, in order, when input is not valid UTF-8
pub fn fallback_encodings() -> [&'static Encoding; 3] {
    [GBK, BIG5, GB18030]
}

/// Decode a whole SQL file line by line.
///
/// Each line is resolved on its own so that files mixing UTF-8 with a
/// legacy encoding (typically in comment payloads) decode correctly.
/// A leading UTF-8 byte-order mark is dropped and `\r\n` becomes `\n`.
pub fn decode_lines(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.replace("\r\n", "\n");
    }

    let mut out = String::with_capacity(bytes.len());
    for (i, line) in bytes.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        out.push_str(&decode_text(line));
    }
    out
}
