use std::fmt;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use smallvec::SmallVec;
use smol_str::SmolStr;

/// Nested array value.
///
/// Every level is an ordered sequence; siblings may differ in length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayValue<T> {
    Null,
    Element(T),
    Array(Vec<ArrayValue<T>>),
}

impl<T> ArrayValue<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, ArrayValue::Null)
    }

    pub fn as_array(&self) -> Option<&[ArrayValue<T>]> {
        match self {
            ArrayValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&T> {
        match self {
            ArrayValue::Element(value) => Some(value),
            _ => None,
        }
    }

    /// Nesting depth along the first path that reaches an element.
    ///
    /// Nulls and empty arrays stop the walk, so `{}` and `{NULL}` are one
    /// level deep.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let ArrayValue::Array(items) = current {
            depth += 1;
            match items.iter().find(|item| !item.is_null()) {
                Some(next) => current = next,
                None => break,
            }
        }
        depth
    }

    /// Build a one-dimensional array from optional elements.
    pub fn from_elements<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
    {
        ArrayValue::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Some(value) => ArrayValue::Element(value),
                    None => ArrayValue::Null,
                })
                .collect(),
        )
    }
}

impl<T> From<Vec<ArrayValue<T>>> for ArrayValue<T> {
    fn from(items: Vec<ArrayValue<T>>) -> Self {
        ArrayValue::Array(items)
    }
}

/// One `[lower:upper]` pair of a bound decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bound {
    pub lower: i64,
    pub upper: i64,
}

impl Bound {
    pub fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// Default bound for a level of `len` elements.
    pub fn one_based(len: usize) -> Self {
        Self {
            lower: 1,
            upper: len as i64,
        }
    }

    /// Number of elements the bound spans; saturates at `usize::MAX`.
    pub fn len(&self) -> usize {
        let len = i128::from(self.upper) - i128::from(self.lower) + 1;
        usize::try_from(len.max(0)).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type Bounds = SmallVec<[Bound; 4]>;

/// A parsed literal together with its bound decoration, if it had one.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: ArrayValue<T>,
    pub bounds: Option<Bounds>,
}

/// Corner points of a box element, `(x1,y1),(x2,y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxValue {
    pub high: (f64, f64),
    pub low: (f64, f64),
}

impl Serialize for BoxValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&[self.high.0, self.high.1])?;
        seq.serialize_element(&[self.low.0, self.low.1])?;
        seq.end()
    }
}

/// Dynamically typed leaf used by the built-in per-kind strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Decimal text, kept verbatim so no precision is lost.
    Numeric(SmolStr),
    Text(String),
    Bytes(Vec<u8>),
    Enum(SmolStr),
    Box(BoxValue),
    /// Composite record text such as `(1,"a b")`.
    Record(String),
}

impl Element {
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Bool(_) => "bool",
            Element::Int(_) => "int",
            Element::Float(_) => "float",
            Element::Numeric(_) => "numeric",
            Element::Text(_) => "text",
            Element::Bytes(_) => "bytes",
            Element::Enum(_) => "enum",
            Element::Box(_) => "box",
            Element::Record(_) => "record",
        }
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Element::Bool(value) => serializer.serialize_bool(*value),
            Element::Int(value) => serializer.serialize_i64(*value),
            Element::Float(value) => serializer.serialize_f64(*value),
            Element::Numeric(value) | Element::Enum(value) => serializer.serialize_str(value),
            Element::Text(value) | Element::Record(value) => serializer.serialize_str(value),
            Element::Bytes(bytes) => {
                let mut text = String::with_capacity(2 + bytes.len() * 2);
                crate::text::hex::push_hex(&mut text, bytes);
                serializer.serialize_str(&text)
            }
            Element::Box(value) => value.serialize(serializer),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Bool(value) => write!(f, "{value}"),
            Element::Int(value) => write!(f, "{value}"),
            Element::Float(value) => write!(f, "{value}"),
            Element::Numeric(value) | Element::Enum(value) => f.write_str(value),
            Element::Text(value) | Element::Record(value) => f.write_str(value),
            Element::Bytes(bytes) => {
                let mut text = String::new();
                crate::text::hex::push_hex(&mut text, bytes);
                f.write_str(&text)
            }
            Element::Box(value) => write!(
                f,
                "({},{}),({},{})",
                value.high.0, value.high.1, value.low.0, value.low.1
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[rstest::rstest]
    fn test_depth() {
        let flat: ArrayValue<i64> = ArrayValue::from_elements([Some(1), None]);
        assert_eq!(flat.depth(), 1);

        let nested = ArrayValue::Array(vec![ArrayValue::Null, flat.clone()]);
        assert_eq!(nested.depth(), 2);

        let empty: ArrayValue<i64> = ArrayValue::Array(Vec::new());
        assert_eq!(empty.depth(), 1);
        assert_eq!(ArrayValue::<i64>::Null.depth(), 0);
    }

    #[rstest::rstest]
    fn test_bound_len() {
        assert_eq!(Bound::new(1, 3).len(), 3);
        assert_eq!(Bound::new(-2, 2).len(), 5);
        assert!(Bound::new(3, 2).is_empty());
        assert_eq!(Bound::one_based(4), Bound::new(1, 4));
        assert_eq!(Bound::new(i64::MIN, i64::MAX).len(), usize::MAX);
        assert!(!Bound::new(0, i64::MAX).is_empty());
    }

    #[rstest::rstest]
    fn test_serialize_to_json() {
        let value = ArrayValue::Array(vec![
            ArrayValue::Element(Element::Int(1)),
            ArrayValue::Null,
            ArrayValue::Element(Element::Bytes(vec![0xde, 0xad])),
            ArrayValue::Element(Element::Text("x".to_string())),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, json!([1, null, "0xDEAD", "x"]));
    }

    #[rstest::rstest]
    fn test_serialize_box() {
        let value = Element::Box(BoxValue {
            high: (2.0, 3.0),
            low: (0.0, 1.0),
        });
        assert_eq!(serde_json::to_value(&value).unwrap(), json!([[2.0, 3.0], [0.0, 1.0]]));
    }
}
