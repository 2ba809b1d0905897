use crate::codec::ElementCodec;
use crate::constants::{is_null_token, is_whitespace, LEFT_BRACE, QUOTE, RIGHT_BRACE};
use crate::text::string::unescape;
use crate::types::{ArrayValue, Bound};
use crate::{DecodeOptions, Error, QuoteEscape, Result};

use super::scan::array_length;
use super::scanner::{skip_quoted, skip_whitespace};

/// Recursive-descent parser over one literal.
///
/// Levels are numbered from 1 (outermost) to `dimension`; elements of the
/// last level are leaves, elements of every other level are nested arrays.
pub(crate) struct LevelParser<'a, C> {
    text: &'a str,
    bytes: &'a [u8],
    end: usize,
    dimension: usize,
    delimiter: u8,
    quote_escape: QuoteEscape,
    non_null: bool,
    bounds: Option<&'a [Bound]>,
    codec: &'a C,
}

impl<'a, C: ElementCodec> LevelParser<'a, C> {
    pub(crate) fn new(
        text: &'a str,
        end: usize,
        dimension: usize,
        codec: &'a C,
        options: &DecodeOptions,
    ) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            end: end.min(text.len()),
            dimension,
            delimiter: options.delimiter.as_byte(),
            quote_escape: options.quote_escape,
            non_null: options.non_null,
            bounds: None,
            codec,
        }
    }

    pub(crate) fn with_bounds(mut self, bounds: Option<&'a [Bound]>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Parse the level whose `{` is at `offset` (after optional whitespace).
    ///
    /// Returns the value and the position just past the closing `}`.
    pub(crate) fn parse_level(
        &self,
        offset: usize,
        index: usize,
    ) -> Result<(ArrayValue<C::Element>, usize)> {
        let open = skip_whitespace(self.bytes, offset, self.end);
        if open >= self.end || self.bytes[open] != LEFT_BRACE {
            return Err(Error::structural(open, "no left brace"));
        }

        let len = array_length(self.text, open, self.end, self.delimiter, self.quote_escape)?;
        self.check_bound(index, len, open)?;
        let mut items = Vec::with_capacity(len);

        let mut pos = skip_whitespace(self.bytes, open + 1, self.end);
        if pos < self.end && self.bytes[pos] == RIGHT_BRACE {
            return self.finish_level(items, len, pos);
        }

        loop {
            pos = skip_whitespace(self.bytes, pos, self.end);
            if pos >= self.end {
                return Err(Error::structural(self.end, "no right brace"));
            }
            let (item, next) = if index < self.dimension {
                self.parse_nested(pos, index)?
            } else {
                self.parse_element(pos)?
            };
            items.push(item);

            pos = skip_whitespace(self.bytes, next, self.end);
            if pos >= self.end {
                return Err(Error::structural(self.end, "no right brace"));
            }
            match self.bytes[pos] {
                RIGHT_BRACE => break,
                byte if byte == self.delimiter => pos += 1,
                _ => {
                    return Err(Error::structural(
                        pos,
                        format!("expected '{}' or '}}'", self.delimiter as char),
                    ))
                }
            }
        }
        self.finish_level(items, len, pos)
    }

    fn finish_level(
        &self,
        items: Vec<ArrayValue<C::Element>>,
        expected: usize,
        close: usize,
    ) -> Result<(ArrayValue<C::Element>, usize)> {
        if items.len() != expected {
            return Err(Error::internal(format!(
                "pre-scan counted {expected} elements but {} were parsed at offset {close}",
                items.len()
            )));
        }
        Ok((ArrayValue::Array(items), close + 1))
    }

    fn check_bound(&self, index: usize, len: usize, offset: usize) -> Result<()> {
        let Some(bound) = self.bounds.and_then(|bounds| bounds.get(index - 1)) else {
            return Ok(());
        };
        if bound.len() != len {
            return Err(Error::dimension(
                offset,
                format!(
                    "bound [{}:{}] expects {} elements but the level has {len}",
                    bound.lower,
                    bound.upper,
                    bound.len()
                ),
            ));
        }
        Ok(())
    }

    fn parse_nested(&self, pos: usize, index: usize) -> Result<(ArrayValue<C::Element>, usize)> {
        if self.bytes[pos] != LEFT_BRACE {
            return Err(Error::dimension(pos, "not multi-dimension"));
        }
        self.parse_level(pos, index + 1)
    }

    fn parse_element(&self, pos: usize) -> Result<(ArrayValue<C::Element>, usize)> {
        match self.bytes[pos] {
            LEFT_BRACE => Err(Error::dimension(pos, "not one dimension")),
            QUOTE => {
                let after = skip_quoted(self.bytes, pos, self.end, self.quote_escape)?;
                let body = &self.text[pos + 1..after - 1];
                let unescaped = unescape(body, self.quote_escape);
                let value = self.decode(&unescaped, pos, after)?;
                Ok((value, after))
            }
            _ => self.parse_bare(pos),
        }
    }

    fn parse_bare(&self, start: usize) -> Result<(ArrayValue<C::Element>, usize)> {
        let mut pos = start;
        while pos < self.end {
            match self.bytes[pos] {
                RIGHT_BRACE => break,
                byte if byte == self.delimiter => break,
                LEFT_BRACE => return Err(Error::dimension(pos, "not one dimension")),
                QUOTE => {
                    return Err(Error::structural(pos, "unexpected quote in unquoted element"))
                }
                _ => pos += 1,
            }
        }

        let mut stop = pos;
        while stop > start && is_whitespace(self.bytes[stop - 1]) {
            stop -= 1;
        }
        if stop == start {
            return Err(Error::structural(start, "empty element"));
        }

        let token = &self.text[start..stop];
        if is_null_token(token) {
            if self.non_null {
                return Err(Error::NullNotAllowed { offset: start });
            }
            return Ok((ArrayValue::Null, pos));
        }
        let value = self.decode(token, start, stop)?;
        Ok((value, pos))
    }

    fn decode(&self, text: &str, start: usize, end: usize) -> Result<ArrayValue<C::Element>> {
        self.codec
            .decode(text)
            .map(ArrayValue::Element)
            .map_err(|source| Error::element(start, end, source))
    }
}
