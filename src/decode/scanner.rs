//! Byte-level cursor helpers shared by the pre-scanner, the dimension
//! inspector and the parser. Everything here is pure index arithmetic.

use memchr::{memchr, memchr2};

use crate::constants::{is_whitespace, BACKSLASH, LEFT_BRACE, QUOTE, RIGHT_BRACE};
use crate::{Error, QuoteEscape, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    LeftBrace,
    RightBrace,
    Quote,
    Backslash,
    Delimiter,
    Other,
}

#[inline]
pub fn classify(byte: u8, delimiter: u8) -> CharClass {
    match byte {
        LEFT_BRACE => CharClass::LeftBrace,
        RIGHT_BRACE => CharClass::RightBrace,
        QUOTE => CharClass::Quote,
        BACKSLASH => CharClass::Backslash,
        _ if byte == delimiter => CharClass::Delimiter,
        _ => CharClass::Other,
    }
}

/// First position at or after `pos` that is not ASCII whitespace, or `end`.
#[inline]
pub fn skip_whitespace(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Skip a quoted span starting at the opening quote at `pos`.
///
/// Returns the position just past the closing quote.
pub fn skip_quoted(bytes: &[u8], pos: usize, end: usize, quote_escape: QuoteEscape) -> Result<usize> {
    let mut pos = pos + 1;
    loop {
        if pos >= end {
            return Err(Error::structural(end, "unterminated quoted element"));
        }
        let window = &bytes[pos..end];
        let found = match quote_escape {
            QuoteEscape::Backslash => memchr2(QUOTE, BACKSLASH, window),
            QuoteEscape::Doubled => memchr(QUOTE, window),
        };
        let at = match found {
            Some(rel) => pos + rel,
            None => return Err(Error::structural(end, "unterminated quoted element")),
        };
        if bytes[at] == BACKSLASH {
            pos = at + 2;
            continue;
        }
        if quote_escape == QuoteEscape::Doubled && at + 1 < end && bytes[at + 1] == QUOTE {
            pos = at + 2;
            continue;
        }
        return Ok(at + 1);
    }
}
