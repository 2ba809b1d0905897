use std::sync::OnceLock;

pub const LEFT_BRACE: u8 = b'{';
pub const RIGHT_BRACE: u8 = b'}';
pub const QUOTE: u8 = b'"';
pub const BACKSLASH: u8 = b'\\';
pub const COMMA: u8 = b',';
pub const SEMICOLON: u8 = b';';
pub const LEFT_BRACKET: u8 = b'[';
pub const RIGHT_BRACKET: u8 = b']';
pub const COLON: u8 = b':';
pub const EQUALS: u8 = b'=';

pub const NULL_TOKEN: &str = "null";

/// Deepest nesting the parser and serializer will follow.
pub const MAX_DIMENSION: usize = 64;

pub const PARALLEL_MIN_ITEMS: usize = 256;

#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    byte.is_ascii_whitespace()
}

/// `true` for the exact four-letter `null` token, in any case.
#[inline]
pub fn is_null_token(s: &str) -> bool {
    s.len() == NULL_TOKEN.len() && s.eq_ignore_ascii_case(NULL_TOKEN)
}

#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}

#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
pub(crate) fn parallel_min_items() -> usize {
    static VALUE: OnceLock<usize> = OnceLock::new();
    *VALUE.get_or_init(|| {
        env_usize("ARRAY_LITERAL_PARALLEL_MIN_ITEMS").unwrap_or(PARALLEL_MIN_ITEMS)
    })
}
