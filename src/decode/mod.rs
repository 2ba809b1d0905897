mod dimension;
mod parser;
mod scan;
pub mod scanner;

use log::{debug, trace};

use crate::codec::ElementCodec;
use crate::constants::{LEFT_BRACE, MAX_DIMENSION, RIGHT_BRACE};
use crate::encode::writer::Writer;
use crate::types::{ArrayValue, Decoded, Dimension};
use crate::{DecodeOptions, ElementError, Error, Result};

pub use dimension::{bound_decoration, dimension_of};
pub use scan::array_length;

use dimension::{check_depth, leading_brace_depth};
use parser::LevelParser;
use scanner::skip_whitespace;

pub fn from_str<C: ElementCodec>(
    input: &str,
    dimension: Dimension,
    codec: &C,
    options: &DecodeOptions,
) -> Result<ArrayValue<C::Element>> {
    decode_with_bounds(input, dimension, codec, options).map(|decoded| decoded.value)
}

pub fn from_slice<C: ElementCodec>(
    input: &[u8],
    dimension: Dimension,
    codec: &C,
    options: &DecodeOptions,
) -> Result<ArrayValue<C::Element>> {
    let text = std::str::from_utf8(input)
        .map_err(|err| Error::structural(err.valid_up_to(), format!("invalid utf-8: {err}")))?;
    from_str(text, dimension, codec, options)
}

/// Decode a literal and keep its bound decoration.
pub fn decode_with_bounds<C: ElementCodec>(
    input: &str,
    dimension: Dimension,
    codec: &C,
    options: &DecodeOptions,
) -> Result<Decoded<C::Element>> {
    trace!(
        "decoding array literal: {} bytes, dimension {dimension}",
        input.len()
    );
    let result = decode_document(input, dimension, codec, options);
    if let Err(err) = &result {
        debug!("array literal rejected: {err}");
    }
    result
}

fn decode_document<C: ElementCodec>(
    input: &str,
    dimension: Dimension,
    codec: &C,
    options: &DecodeOptions,
) -> Result<Decoded<C::Element>> {
    let bytes = input.as_bytes();
    let end = bytes.len();
    let (bounds, body) = bound_decoration(input, 0, end)?;
    let body = skip_whitespace(bytes, body, end);
    let depth = leading_brace_depth(bytes, body, end);
    check_depth(bounds.as_ref(), depth, body)?;

    let empty = innermost_is_empty(bytes, body, end);
    let dimension = resolve_dimension(dimension, depth, empty, body)?;
    let parser = LevelParser::new(input, end, dimension, codec, options)
        .with_bounds(bounds.as_ref().map(|bounds| bounds.as_slice()));
    let (value, next) = parser.parse_level(body, 1)?;

    let rest = skip_whitespace(bytes, next, end);
    if rest < end {
        return Err(Error::structural(rest, "unexpected content after array"));
    }
    Ok(Decoded { value, bounds })
}

/// Reconcile the declared dimension with the depth counted in the text.
///
/// When the innermost leading level is empty (`{}`, `{{}}`, `{{},{{1}}}`)
/// the text cannot show its full depth, so any deeper declaration is valid.
fn resolve_dimension(declared: Dimension, depth: usize, empty: bool, body: usize) -> Result<usize> {
    let dimension = match declared {
        Dimension::Fixed(0) => {
            return Err(Error::dimension(
                body,
                "declared dimension is zero, but the text is an array",
            ))
        }
        Dimension::Fixed(expected) if expected != depth && !(empty && depth < expected) => {
            return Err(Error::dimension(
                body,
                format!("declared dimension {expected} but the literal has {depth}"),
            ))
        }
        Dimension::Fixed(expected) => expected,
        Dimension::Unlimited => depth,
    };
    if dimension > MAX_DIMENSION {
        return Err(Error::dimension(
            body,
            format!("dimension {dimension} exceeds the maximum of {MAX_DIMENSION}"),
        ));
    }
    Ok(dimension)
}

/// Whether the last of the leading `{` is immediately closed.
fn innermost_is_empty(bytes: &[u8], body: usize, end: usize) -> bool {
    let mut pos = skip_whitespace(bytes, body, end);
    while pos < end && bytes[pos] == LEFT_BRACE {
        pos = skip_whitespace(bytes, pos + 1, end);
    }
    pos < end && bytes[pos] == RIGHT_BRACE
}

/// Structure-only codec used by [`validate_str`].
struct AnyElement;

impl ElementCodec for AnyElement {
    type Element = ();

    fn decode(&self, _text: &str) -> std::result::Result<(), ElementError> {
        Ok(())
    }

    fn encode(&self, _element: &(), _out: &mut Writer) -> Result<()> {
        Ok(())
    }
}

/// Check the literal's structure and dimension without decoding elements.
pub fn validate_str(input: &str, dimension: Dimension, options: &DecodeOptions) -> Result<()> {
    decode_document(input, dimension, &AnyElement, options).map(|_| ())
}
