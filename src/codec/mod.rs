//! Element strategies: how one leaf is read from and written to array text.

mod element;
mod kinds;

use std::marker::PhantomData;

use crate::encode::writer::Writer;
use crate::{ElementError, Result};

pub use element::KindCodec;
pub use kinds::{
    BoolCodec, BoxCodec, ByteaCodec, EnumCodec, FloatCodec, IntCodec, NumericCodec, RecordCodec,
    TextCodec,
};

/// How an element kind protects its special characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    /// Double quotes around the element, quote/backslash escaped inside.
    Backslash,
    /// `0x` + hex digits; no quoting and no backslash escapes.
    Hex,
}

/// Decode/encode pair for one element kind.
///
/// `decode` receives the element text with surrounding quotes and escapes
/// already removed (and surrounding whitespace trimmed when unquoted).
/// `encode` writes the final token, including any quoting it needs.
pub trait ElementCodec: Send + Sync {
    type Element: Send + Sync;

    fn decode(&self, text: &str) -> std::result::Result<Self::Element, ElementError>;

    fn encode(&self, element: &Self::Element, out: &mut Writer) -> Result<()>;

    fn escape_mode(&self) -> EscapeMode {
        EscapeMode::Backslash
    }
}

impl<C: ElementCodec + ?Sized> ElementCodec for &C {
    type Element = C::Element;

    fn decode(&self, text: &str) -> std::result::Result<Self::Element, ElementError> {
        (**self).decode(text)
    }

    fn encode(&self, element: &Self::Element, out: &mut Writer) -> Result<()> {
        (**self).encode(element, out)
    }

    fn escape_mode(&self) -> EscapeMode {
        (**self).escape_mode()
    }
}

/// Strategy built from a pair of closures.
pub struct FnCodec<T, D, E> {
    decode: D,
    encode: E,
    escape_mode: EscapeMode,
    _element: PhantomData<fn() -> T>,
}

impl<T, D, E> FnCodec<T, D, E>
where
    D: Fn(&str) -> std::result::Result<T, ElementError>,
    E: Fn(&T, &mut Writer) -> Result<()>,
{
    pub fn new(decode: D, encode: E) -> Self {
        Self {
            decode,
            encode,
            escape_mode: EscapeMode::Backslash,
            _element: PhantomData,
        }
    }

    pub fn with_escape_mode(mut self, escape_mode: EscapeMode) -> Self {
        self.escape_mode = escape_mode;
        self
    }
}

impl<T, D, E> ElementCodec for FnCodec<T, D, E>
where
    T: Send + Sync,
    D: Fn(&str) -> std::result::Result<T, ElementError> + Send + Sync,
    E: Fn(&T, &mut Writer) -> Result<()> + Send + Sync,
{
    type Element = T;

    fn decode(&self, text: &str) -> std::result::Result<T, ElementError> {
        (self.decode)(text)
    }

    fn encode(&self, element: &T, out: &mut Writer) -> Result<()> {
        (self.encode)(element, out)
    }

    fn escape_mode(&self) -> EscapeMode {
        self.escape_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncodeOptions;

    #[rstest::rstest]
    fn test_fn_codec() {
        let codec = FnCodec::new(
            |text: &str| {
                text.parse::<u8>()
                    .map_err(|_| ElementError::invalid("u8", text))
            },
            |value: &u8, out: &mut Writer| out.write_int(*value as i64),
        );
        assert_eq!(codec.decode("42").unwrap(), 42);
        assert!(codec.decode("300").is_err());

        let mut writer = Writer::new(EncodeOptions::default());
        codec.encode(&7, &mut writer).unwrap();
        assert_eq!(writer.finish(), "7");
        assert_eq!(codec.escape_mode(), EscapeMode::Backslash);
    }
}
