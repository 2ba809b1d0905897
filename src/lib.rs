//! Codec for relational array literal text.
//!
//! ```text
//! {1,2,3}            one dimension
//! {{1,2},{3,4}}      two dimensions
//! {"a,b",NULL}       quoted element, null element
//! [0:1]={x,y}        bound decoration
//! ```
//!
//! Parsing is driven by a declared [`Dimension`] and an [`ElementCodec`]
//! that turns each element's text into a value. The built-in [`KindCodec`]
//! covers the common [`ElementKind`]s; callers can plug in their own.

pub mod bind;
pub mod codec;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod registry;
pub mod text;
pub mod types;

pub use crate::bind::{interpret_received, prepare_bind, BindValue};
pub use crate::codec::{ElementCodec, EscapeMode, FnCodec, KindCodec};
pub use crate::decode::{array_length, dimension_of};
pub use crate::encode::writer::Writer;
pub use crate::error::{ElementError, Error, ErrorKind};
pub use crate::options::{DecodeOptions, Delimiter, Dialect, EncodeOptions, QuoteEscape};
pub use crate::registry::{ArrayCodec, ShapeRegistry};
pub use crate::types::{
    ArrayValue, Bound, Bounds, BoxValue, Decoded, Dimension, Element, ElementKind, Shape,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Parse `input` as an array of exactly `dimension` levels.
pub fn from_str<C: ElementCodec>(
    input: &str,
    dimension: usize,
    codec: &C,
) -> Result<ArrayValue<C::Element>> {
    from_str_with_options(input, Dimension::Fixed(dimension), codec, &DecodeOptions::default())
}

pub fn from_str_with_options<C: ElementCodec>(
    input: &str,
    dimension: Dimension,
    codec: &C,
    options: &DecodeOptions,
) -> Result<ArrayValue<C::Element>> {
    decode::from_str(input, dimension, codec, options)
}

pub fn from_slice<C: ElementCodec>(
    input: &[u8],
    dimension: usize,
    codec: &C,
) -> Result<ArrayValue<C::Element>> {
    decode::from_slice(input, Dimension::Fixed(dimension), codec, &DecodeOptions::default())
}

pub fn to_string<C: ElementCodec>(
    value: &ArrayValue<C::Element>,
    dimension: usize,
    codec: &C,
) -> Result<String> {
    to_string_with_options(value, Dimension::Fixed(dimension), codec, &EncodeOptions::default())
}

pub fn to_string_with_options<C: ElementCodec>(
    value: &ArrayValue<C::Element>,
    dimension: Dimension,
    codec: &C,
    options: &EncodeOptions,
) -> Result<String> {
    encode::to_string(value, dimension, codec, options)
}

/// Decode with the cached codec for `shape` in `dialect`.
pub fn decode_shape(input: &str, shape: Shape, dialect: Dialect) -> Result<ArrayValue<Element>> {
    ShapeRegistry::global()
        .get_or_create(shape, dialect)
        .decode(input)
}

/// Encode with the cached codec for `shape` in `dialect`.
pub fn encode_shape(value: &ArrayValue<Element>, shape: Shape, dialect: Dialect) -> Result<String> {
    ShapeRegistry::global()
        .get_or_create(shape, dialect)
        .encode(value)
}

pub fn validate_str(input: &str, dimension: Dimension) -> Result<()> {
    validate_str_with_options(input, dimension, &DecodeOptions::default())
}

pub fn validate_str_with_options(
    input: &str,
    dimension: Dimension,
    options: &DecodeOptions,
) -> Result<()> {
    decode::validate_str(input, dimension, options)
}
