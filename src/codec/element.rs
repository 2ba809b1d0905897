use smol_str::SmolStr;

use crate::encode::writer::Writer;
use crate::types::{Element, ElementKind};
use crate::{ElementError, Error, Result};

use super::kinds::{
    BoolCodec, BoxCodec, ByteaCodec, EnumCodec, FloatCodec, IntCodec, NumericCodec, RecordCodec,
    TextCodec,
};
use super::{ElementCodec, EscapeMode};

/// Strategy for the dynamically typed [`Element`], dispatched on [`ElementKind`].
#[derive(Debug, Clone)]
pub struct KindCodec {
    kind: ElementKind,
    labels: EnumCodec,
}

impl KindCodec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            labels: EnumCodec::any(),
        }
    }

    /// Enum strategy restricted to `labels`.
    pub fn enumeration<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            kind: ElementKind::Enum,
            labels: EnumCodec::with_labels(labels),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    fn int_codec(&self) -> IntCodec {
        match self.kind {
            ElementKind::Int2 => IntCodec::int2(),
            ElementKind::Int4 => IntCodec::int4(),
            _ => IntCodec::int8(),
        }
    }

    fn mismatch(&self, element: &Element) -> Error {
        Error::encode(format!(
            "expected {} element, found {}",
            self.kind,
            element.type_name()
        ))
    }
}

impl ElementCodec for KindCodec {
    type Element = Element;

    fn decode(&self, text: &str) -> std::result::Result<Element, ElementError> {
        Ok(match self.kind {
            ElementKind::Bool => Element::Bool(BoolCodec.decode(text)?),
            ElementKind::Int2 | ElementKind::Int4 | ElementKind::Int8 => {
                Element::Int(self.int_codec().decode(text)?)
            }
            ElementKind::Float4 => Element::Float(FloatCodec::float4().decode(text)?),
            ElementKind::Float8 => Element::Float(FloatCodec::float8().decode(text)?),
            ElementKind::Numeric => Element::Numeric(NumericCodec.decode(text)?),
            ElementKind::Text => Element::Text(TextCodec.decode(text)?),
            ElementKind::Bytea => Element::Bytes(ByteaCodec.decode(text)?),
            ElementKind::Enum => Element::Enum(self.labels.decode(text)?),
            ElementKind::Box => Element::Box(BoxCodec.decode(text)?),
            ElementKind::Record => Element::Record(RecordCodec.decode(text)?),
        })
    }

    fn encode(&self, element: &Element, out: &mut Writer) -> Result<()> {
        match (self.kind, element) {
            (ElementKind::Bool, Element::Bool(value)) => BoolCodec.encode(value, out),
            (ElementKind::Int2 | ElementKind::Int4 | ElementKind::Int8, Element::Int(value)) => {
                self.int_codec().encode(value, out)
            }
            (ElementKind::Float4, Element::Float(value)) => {
                FloatCodec::float4().encode(value, out)
            }
            (ElementKind::Float8, Element::Float(value)) => {
                FloatCodec::float8().encode(value, out)
            }
            (ElementKind::Float4 | ElementKind::Float8, Element::Int(value)) => {
                out.write_int(*value)
            }
            (ElementKind::Numeric, Element::Numeric(value)) => NumericCodec.encode(value, out),
            (ElementKind::Numeric, Element::Int(value)) => out.write_int(*value),
            (ElementKind::Numeric, Element::Float(value)) if value.is_finite() => {
                out.write_float(*value)
            }
            (ElementKind::Text, Element::Text(value)) => TextCodec.encode(value, out),
            (ElementKind::Bytea, Element::Bytes(value)) => ByteaCodec.encode(value, out),
            (ElementKind::Enum, Element::Enum(value)) => self.labels.encode(value, out),
            (ElementKind::Enum, Element::Text(value)) => {
                self.labels.encode(&SmolStr::new(value), out)
            }
            (ElementKind::Box, Element::Box(value)) => BoxCodec.encode(value, out),
            (ElementKind::Record, Element::Record(value)) => RecordCodec.encode(value, out),
            _ => Err(self.mismatch(element)),
        }
    }

    fn escape_mode(&self) -> EscapeMode {
        match self.kind {
            ElementKind::Bytea => EscapeMode::Hex,
            _ => EscapeMode::Backslash,
        }
    }
}

impl Element {
    /// Convert a JSON value into an element of `kind`.
    ///
    /// Used by callers that carry array data as JSON (the CLI, tests).
    pub fn from_json(
        kind: ElementKind,
        value: &serde_json::Value,
    ) -> std::result::Result<Element, ElementError> {
        use serde_json::Value;

        match (kind, value) {
            (ElementKind::Bool, Value::Bool(b)) => Ok(Element::Bool(*b)),
            (ElementKind::Int2 | ElementKind::Int4 | ElementKind::Int8, Value::Number(n)) => n
                .as_i64()
                .map(Element::Int)
                .ok_or_else(|| ElementError::invalid(kind.name(), &n.to_string())),
            (ElementKind::Float4 | ElementKind::Float8, Value::Number(n)) => n
                .as_f64()
                .map(Element::Float)
                .ok_or_else(|| ElementError::invalid(kind.name(), &n.to_string())),
            (ElementKind::Numeric, Value::Number(n)) => {
                Ok(Element::Numeric(SmolStr::new(n.to_string())))
            }
            (ElementKind::Text, Value::String(s)) => Ok(Element::Text(s.clone())),
            (ElementKind::Record, Value::String(s)) => Ok(Element::Record(s.clone())),
            (ElementKind::Enum, Value::String(s)) => Ok(Element::Enum(SmolStr::new(s))),
            // Everything else arrives in its text form and goes through the strategy.
            (_, Value::String(s)) => KindCodec::new(kind).decode(s),
            (_, other) => Err(ElementError::new(format!(
                "cannot use JSON {other} as {kind} element"
            ))),
        }
    }
}
