use std::borrow::Cow;

use crate::constants::{is_null_token, BACKSLASH, LEFT_BRACE, QUOTE, RIGHT_BRACE};
use crate::QuoteEscape;

/// Decide whether a text element must be quoted, and whether quoting alone
/// is enough or characters inside also need escaping.
///
/// Returns `(needs_quote, needs_escape)`.
pub fn analyze_string(value: &str, delimiter: u8) -> (bool, bool) {
    if value.is_empty() || is_null_token(value) {
        return (true, false);
    }

    let bytes = value.as_bytes();
    let mut needs_quote =
        bytes[0].is_ascii_whitespace() || bytes[bytes.len() - 1].is_ascii_whitespace();
    let mut needs_escape = false;

    for &byte in bytes {
        match byte {
            QUOTE | BACKSLASH => {
                needs_quote = true;
                needs_escape = true;
            }
            LEFT_BRACE | RIGHT_BRACE => needs_quote = true,
            _ if byte == delimiter || byte.is_ascii_whitespace() => needs_quote = true,
            _ => {}
        }
    }

    (needs_quote, needs_escape)
}

pub fn escape_string_into(out: &mut String, value: &str, quote_escape: QuoteEscape) {
    let bytes = value.as_bytes();
    let mut start = 0;
    for (idx, &byte) in bytes.iter().enumerate() {
        let escaped = match (byte, quote_escape) {
            (QUOTE, QuoteEscape::Backslash) => "\\\"",
            (BACKSLASH, QuoteEscape::Backslash) => "\\\\",
            (QUOTE, QuoteEscape::Doubled) => "\"\"",
            _ => continue,
        };
        if start < idx {
            out.push_str(&value[start..idx]);
        }
        out.push_str(escaped);
        start = idx + 1;
    }
    if start < value.len() {
        out.push_str(&value[start..]);
    }
}

/// Write `value` as one array element, quoting and escaping only when needed.
pub fn write_text_element(out: &mut String, value: &str, delimiter: u8, quote_escape: QuoteEscape) {
    let (needs_quote, needs_escape) = analyze_string(value, delimiter);
    if !needs_quote {
        out.push_str(value);
        return;
    }
    write_quoted(out, value, needs_escape, quote_escape);
}

pub fn write_quoted(out: &mut String, value: &str, needs_escape: bool, quote_escape: QuoteEscape) {
    out.push('"');
    if needs_escape {
        escape_string_into(out, value, quote_escape);
    } else {
        out.push_str(value);
    }
    out.push('"');
}

/// Remove escapes from the body of a quoted element (quotes already stripped).
pub fn unescape(body: &str, quote_escape: QuoteEscape) -> Cow<'_, str> {
    let marker = match quote_escape {
        QuoteEscape::Backslash => BACKSLASH,
        QuoteEscape::Doubled => QUOTE,
    };
    if memchr::memchr(marker, body.as_bytes()).is_none() {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch as u32 == marker as u32 {
            // The pair collapses to its second character.
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}
