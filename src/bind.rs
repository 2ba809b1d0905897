//! Choosing between the accepted representations of an array parameter on
//! the way out, and decoding a received column value on the way in.

use log::trace;

use crate::codec::ElementCodec;
use crate::constants::{LEFT_BRACE, RIGHT_BRACE};
use crate::decode::{bound_decoration, scanner::skip_whitespace};
use crate::registry::ShapeRegistry;
use crate::types::{ArrayValue, Element, Shape};
use crate::{decode, encode, DecodeOptions, Dialect, EncodeOptions, Error, Result};

/// An array parameter as handed over by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue<T> {
    /// Literal text, already in array syntax. Passed through unchanged.
    Literal(String),
    /// Ordered list forming the outer level.
    List(Vec<ArrayValue<T>>),
    /// Native nested value.
    Array(ArrayValue<T>),
}

/// Turn a bind value into literal text for `shape`.
pub fn prepare_bind<C: ElementCodec>(
    input: &BindValue<C::Element>,
    shape: Shape,
    codec: &C,
    options: &EncodeOptions,
) -> Result<String> {
    match input {
        BindValue::Literal(text) => {
            trace!("binding literal array text for {shape}");
            check_outer_braces(text)?;
            Ok(text.clone())
        }
        BindValue::List(items) => encode::list_to_string(items, shape.dimension, codec, options),
        BindValue::Array(value) => {
            let depth = value.depth();
            if depth == 0 {
                return Err(Error::encode(format!("value bound to {shape} is not an array")));
            }
            encode::to_string(value, shape.dimension, codec, options)
        }
    }
}

/// [`prepare_bind`] for the built-in element kinds, via the shared registry.
pub fn prepare_bind_element(
    input: &BindValue<Element>,
    shape: Shape,
    dialect: Dialect,
) -> Result<String> {
    let codec = ShapeRegistry::global().get_or_create(shape, dialect);
    prepare_bind(input, shape, codec.element(), codec.encode_options())
}

/// Decode a received column value for `shape` in `dialect`.
pub fn interpret_received(text: &str, shape: Shape, dialect: Dialect) -> Result<ArrayValue<Element>> {
    ShapeRegistry::global()
        .get_or_create(shape, dialect)
        .decode(text)
}

/// Decode a received column value with a caller-supplied element strategy.
pub fn interpret_received_with<C: ElementCodec>(
    text: &str,
    shape: Shape,
    dialect: Dialect,
    codec: &C,
) -> Result<ArrayValue<C::Element>> {
    let options = DecodeOptions::for_dialect(dialect, shape.kind);
    decode::from_str(text, shape.dimension, codec, &options)
}

/// Only the outer braces of literal text are checked; the body is the
/// caller's responsibility.
fn check_outer_braces(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let (_, body) = bound_decoration(text, 0, bytes.len())?;
    let start = skip_whitespace(bytes, body, bytes.len());
    if start >= bytes.len() || bytes[start] != LEFT_BRACE {
        return Err(Error::structural(start, "no left brace"));
    }
    let trimmed = text.trim_end_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.len() <= start || trimmed.as_bytes()[trimmed.len() - 1] != RIGHT_BRACE {
        return Err(Error::structural(trimmed.len(), "no right brace"));
    }
    Ok(())
}
