use crate::constants::{COLON, EQUALS, LEFT_BRACE, LEFT_BRACKET, RIGHT_BRACKET};
use crate::types::{Bound, Bounds};
use crate::{Error, Result};

use super::scanner::skip_whitespace;

/// Parse an optional `[lower:upper]...=` prefix.
///
/// Returns the bounds (if any) and the position right after the `=`, or the
/// first non-whitespace position when there is no decoration.
pub fn bound_decoration(text: &str, offset: usize, end: usize) -> Result<(Option<Bounds>, usize)> {
    let bytes = text.as_bytes();
    let end = end.min(bytes.len());
    let mut pos = skip_whitespace(bytes, offset, end);
    if pos >= end || bytes[pos] != LEFT_BRACKET {
        return Ok((None, pos));
    }

    let mut bounds = Bounds::new();
    while pos < end && bytes[pos] == LEFT_BRACKET {
        let (lower, next) = parse_bound_int(text, pos + 1, end)?;
        pos = expect_byte(bytes, next, end, COLON)?;
        let (upper, next) = parse_bound_int(text, pos, end)?;
        pos = expect_byte(bytes, next, end, RIGHT_BRACKET)?;
        if upper < lower {
            return Err(Error::structural(
                pos,
                format!("upper bound {upper} is below lower bound {lower}"),
            ));
        }
        bounds.push(Bound::new(lower, upper));
        pos = skip_whitespace(bytes, pos, end);
    }
    pos = expect_byte(bytes, pos, end, EQUALS)?;
    Ok((Some(bounds), pos))
}

fn parse_bound_int(text: &str, offset: usize, end: usize) -> Result<(i64, usize)> {
    let bytes = text.as_bytes();
    let start = skip_whitespace(bytes, offset, end);
    let mut pos = start;
    if pos < end && matches!(bytes[pos], b'+' | b'-') {
        pos += 1;
    }
    while pos < end && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let value = text[start..pos]
        .parse::<i64>()
        .map_err(|_| Error::structural(start, "invalid array bound"))?;
    Ok((value, skip_whitespace(bytes, pos, end)))
}

fn expect_byte(bytes: &[u8], pos: usize, end: usize, expected: u8) -> Result<usize> {
    let pos = skip_whitespace(bytes, pos, end);
    if pos < end && bytes[pos] == expected {
        Ok(pos + 1)
    } else {
        Err(Error::structural(
            pos,
            format!("expected '{}' in array bound decoration", expected as char),
        ))
    }
}

/// Count consecutive `{` starting at `offset`; whitespace between them is allowed.
pub(crate) fn leading_brace_depth(bytes: &[u8], offset: usize, end: usize) -> usize {
    let mut depth = 0;
    let mut pos = skip_whitespace(bytes, offset, end);
    while pos < end && bytes[pos] == LEFT_BRACE {
        depth += 1;
        pos = skip_whitespace(bytes, pos + 1, end);
    }
    depth
}

/// Nesting depth of the literal in `text[offset..end]`, bound decoration included.
pub fn dimension_of(text: &str, offset: usize, end: usize) -> Result<usize> {
    let end = end.min(text.len());
    let (bounds, body) = bound_decoration(text, offset, end)?;
    let depth = leading_brace_depth(text.as_bytes(), body, end);
    check_depth(bounds.as_ref(), depth, body)?;
    Ok(depth)
}

pub(crate) fn check_depth(bounds: Option<&Bounds>, depth: usize, body: usize) -> Result<()> {
    if depth == 0 {
        return Err(Error::structural(body, "dimension is zero"));
    }
    if let Some(bounds) = bounds {
        if bounds.len() != depth {
            return Err(Error::dimension(
                body,
                format!(
                    "bound decoration has {} dimensions but the array has {depth}",
                    bounds.len()
                ),
            ));
        }
    }
    Ok(())
}
