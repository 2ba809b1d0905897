use serde::{Deserialize, Serialize};

use crate::constants::{COMMA, SEMICOLON};
use crate::types::ElementKind;

/// Separator between elements of one array level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        self.as_byte() as char
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => COMMA,
            Delimiter::Semicolon => SEMICOLON,
        }
    }
}

/// How a double quote is escaped inside a quoted element.
///
/// This is fixed per dialect; both forms never mix inside one literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuoteEscape {
    /// `\"` and `\\`.
    #[default]
    Backslash,
    /// `""`, backslash is an ordinary character.
    Doubled,
}

/// Dialect presets for the options below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dialect {
    /// Backslash quoting, `;` between box elements.
    #[default]
    Postgres,
    /// Doubled-quote quoting, `,` everywhere.
    Standard,
}

impl Dialect {
    pub fn quote_escape(self) -> QuoteEscape {
        match self {
            Dialect::Postgres => QuoteEscape::Backslash,
            Dialect::Standard => QuoteEscape::Doubled,
        }
    }

    pub fn delimiter_for(self, kind: ElementKind) -> Delimiter {
        match (self, kind) {
            (Dialect::Postgres, ElementKind::Box) => Delimiter::Semicolon,
            _ => Delimiter::Comma,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub delimiter: Delimiter,
    pub quote_escape: QuoteEscape,
    /// Reject bare `null` elements.
    pub non_null: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_dialect(dialect: Dialect, kind: ElementKind) -> Self {
        Self {
            delimiter: dialect.delimiter_for(kind),
            quote_escape: dialect.quote_escape(),
            non_null: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote_escape(mut self, quote_escape: QuoteEscape) -> Self {
        self.quote_escape = quote_escape;
        self
    }

    pub fn with_non_null(mut self, non_null: bool) -> Self {
        self.non_null = non_null;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            quote_escape: QuoteEscape::Backslash,
            non_null: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub delimiter: Delimiter,
    pub quote_escape: QuoteEscape,
    /// Write a `[l:u]...=` prefix when the bounds are not the default `[1:n]`.
    pub emit_bounds: bool,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_dialect(dialect: Dialect, kind: ElementKind) -> Self {
        Self {
            delimiter: dialect.delimiter_for(kind),
            quote_escape: dialect.quote_escape(),
            emit_bounds: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote_escape(mut self, quote_escape: QuoteEscape) -> Self {
        self.quote_escape = quote_escape;
        self
    }

    pub fn with_emit_bounds(mut self, emit_bounds: bool) -> Self {
        self.emit_bounds = emit_bounds;
        self
    }
}
