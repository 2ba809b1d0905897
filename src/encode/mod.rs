pub mod writer;

use log::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::codec::ElementCodec;
use crate::constants::MAX_DIMENSION;
use crate::types::{ArrayValue, Bound, Decoded, Dimension};
use crate::{EncodeOptions, Error, Result};

use writer::Writer;

/// Encode a nested array value as literal text.
///
/// With [`Dimension::Unlimited`] the depth is taken from the value itself.
pub fn to_string<C: ElementCodec>(
    value: &ArrayValue<C::Element>,
    dimension: Dimension,
    codec: &C,
    options: &EncodeOptions,
) -> Result<String> {
    let dimension = resolve_dimension(dimension, value.depth())?;
    let mut writer = Writer::new(options.clone());
    encode_array(value, dimension, codec, &mut writer)?;
    Ok(writer.finish())
}

/// Encode an ordered list of sub-values as the outermost level.
///
/// The list form is only available for the outer level; inner levels are
/// always [`ArrayValue::Array`].
pub fn list_to_string<C: ElementCodec>(
    items: &[ArrayValue<C::Element>],
    dimension: Dimension,
    codec: &C,
    options: &EncodeOptions,
) -> Result<String> {
    let inner_depth = items
        .iter()
        .find(|item| !item.is_null())
        .map_or(0, ArrayValue::depth);
    let dimension = resolve_dimension(dimension, inner_depth + 1)?;
    let mut writer = Writer::new(options.clone());
    write_sequence(items, 1, dimension, codec, &mut writer)?;
    Ok(writer.finish())
}

/// Encode a decoded value, writing its bound decoration when
/// [`EncodeOptions::emit_bounds`] is set and the bounds are not the default.
pub fn decoded_to_string<C: ElementCodec>(
    decoded: &Decoded<C::Element>,
    dimension: Dimension,
    codec: &C,
    options: &EncodeOptions,
) -> Result<String> {
    let dimension = resolve_dimension(dimension, decoded.value.depth())?;
    let mut writer = Writer::new(options.clone());
    if let Some(bounds) = decoded.bounds.as_ref().filter(|_| options.emit_bounds) {
        if bounds.len() != dimension {
            return Err(Error::encode(format!(
                "{} bounds given for a {dimension}-dimensional array",
                bounds.len()
            )));
        }
        if !is_default_bounds(bounds, &decoded.value) {
            writer.write_bounds(bounds)?;
        }
    }
    encode_array(&decoded.value, dimension, codec, &mut writer)?;
    Ok(writer.finish())
}

fn is_default_bounds<T>(bounds: &[Bound], value: &ArrayValue<T>) -> bool {
    let mut current = value;
    for bound in bounds {
        let Some(items) = current.as_array() else {
            return false;
        };
        if *bound != Bound::one_based(items.len()) {
            return false;
        }
        match items.first() {
            Some(first) => current = first,
            None => return true,
        }
    }
    true
}

fn resolve_dimension(declared: Dimension, actual: usize) -> Result<usize> {
    let dimension = match declared {
        Dimension::Fixed(0) => return Err(Error::encode("declared dimension is zero")),
        Dimension::Fixed(n) => n,
        Dimension::Unlimited if actual >= 1 => actual,
        Dimension::Unlimited => return Err(Error::encode("value is not an array")),
    };
    if dimension > MAX_DIMENSION {
        return Err(Error::encode(format!(
            "dimension {dimension} exceeds the maximum of {MAX_DIMENSION}"
        )));
    }
    Ok(dimension)
}

/// Write `value` as an array of exactly `dimension` levels into `out`.
pub fn encode_array<C: ElementCodec>(
    value: &ArrayValue<C::Element>,
    dimension: usize,
    codec: &C,
    out: &mut Writer,
) -> Result<()> {
    trace!("encoding array literal, dimension {dimension}");
    match value {
        ArrayValue::Array(items) => write_sequence(items, 1, dimension, codec, out),
        ArrayValue::Null => Err(Error::encode("the array itself is null")),
        ArrayValue::Element(_) => Err(Error::encode("expected an array, found an element")),
    }
}

fn write_sequence<C: ElementCodec>(
    items: &[ArrayValue<C::Element>],
    index: usize,
    dimension: usize,
    codec: &C,
    out: &mut Writer,
) -> Result<()> {
    #[cfg(feature = "parallel")]
    {
        if index == 1 && items.len() >= crate::constants::parallel_min_items() {
            return write_sequence_parallel(items, dimension, codec, out);
        }
    }

    out.write_open()?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_delimiter()?;
        }
        write_item(item, index, dimension, codec, out)?;
    }
    out.write_close()
}

#[cfg(feature = "parallel")]
fn write_sequence_parallel<C: ElementCodec>(
    items: &[ArrayValue<C::Element>],
    dimension: usize,
    codec: &C,
    out: &mut Writer,
) -> Result<()> {
    let options = out.options().clone();
    let parts: Vec<String> = items
        .par_iter()
        .map(|item| -> Result<String> {
            let mut part = Writer::new(options.clone());
            write_item(item, 1, dimension, codec, &mut part)?;
            Ok(part.finish())
        })
        .collect::<Result<_>>()?;

    out.write_open()?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.write_delimiter()?;
        }
        out.write_str(part)?;
    }
    out.write_close()
}

/// Write one child of a level numbered `index`.
fn write_item<C: ElementCodec>(
    item: &ArrayValue<C::Element>,
    index: usize,
    dimension: usize,
    codec: &C,
    out: &mut Writer,
) -> Result<()> {
    if index < dimension {
        return match item {
            ArrayValue::Array(children) => {
                write_sequence(children, index + 1, dimension, codec, out)
            }
            ArrayValue::Null => Err(Error::encode(format!(
                "null sub-array at dimension {}; only elements may be null",
                index + 1
            ))),
            ArrayValue::Element(_) => Err(Error::encode(format!(
                "expected a sub-array at dimension {}, found an element",
                index + 1
            ))),
        };
    }
    match item {
        ArrayValue::Null => out.write_null(),
        ArrayValue::Element(element) => codec.encode(element, out),
        ArrayValue::Array(_) => Err(Error::encode(format!(
            "array is nested deeper than its dimension {dimension}"
        ))),
    }
}
