use crate::constants::{LEFT_BRACE, NULL_TOKEN, RIGHT_BRACE};
use crate::text::{hex::push_hex, string::write_quoted, string::write_text_element};
use crate::types::Bound;
use crate::{EncodeOptions, Result};

/// Output sink handed to element strategies.
///
/// It carries the encode options so strategies can quote against the active
/// delimiter and quote style.
pub struct Writer {
    buffer: String,
    options: EncodeOptions,
}

impl Writer {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            buffer: String::new(),
            options,
        }
    }

    pub fn with_capacity(options: EncodeOptions, capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
            options,
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.buffer.push_str(s);
        Ok(())
    }

    pub fn write_char(&mut self, ch: char) -> Result<()> {
        self.buffer.push(ch);
        Ok(())
    }

    pub fn write_open(&mut self) -> Result<()> {
        self.write_char(LEFT_BRACE as char)
    }

    pub fn write_close(&mut self) -> Result<()> {
        self.write_char(RIGHT_BRACE as char)
    }

    pub fn write_delimiter(&mut self) -> Result<()> {
        let delimiter = self.options.delimiter.as_char();
        self.write_char(delimiter)
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.write_str(NULL_TOKEN)
    }

    pub fn write_int(&mut self, value: i64) -> Result<()> {
        let mut buffer = itoa::Buffer::new();
        self.write_str(buffer.format(value))
    }

    /// Shortest round-trip float text; non-finite values use the SQL spellings.
    pub fn write_float(&mut self, value: f64) -> Result<()> {
        if value.is_nan() {
            return self.write_str("NaN");
        }
        if value.is_infinite() {
            return self.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
        }
        let mut buffer = ryu::Buffer::new();
        let text = buffer.format_finite(value);
        self.write_str(text.strip_suffix(".0").unwrap_or(text))
    }

    pub fn write_float32(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() {
            return self.write_float(value as f64);
        }
        let mut buffer = ryu::Buffer::new();
        let text = buffer.format_finite(value);
        self.write_str(text.strip_suffix(".0").unwrap_or(text))
    }

    /// Text element, quoted only when the grammar requires it.
    pub fn write_text(&mut self, value: &str) -> Result<()> {
        let delimiter = self.options.delimiter.as_byte();
        write_text_element(&mut self.buffer, value, delimiter, self.options.quote_escape);
        Ok(())
    }

    /// Text element that is always quoted.
    pub fn write_quoted_text(&mut self, value: &str) -> Result<()> {
        let needs_escape = value.bytes().any(|b| b == b'"' || b == b'\\');
        write_quoted(&mut self.buffer, value, needs_escape, self.options.quote_escape);
        Ok(())
    }

    /// Binary element as `0x` + hex; never quoted or backslash-escaped.
    pub fn write_hex(&mut self, bytes: &[u8]) -> Result<()> {
        push_hex(&mut self.buffer, bytes);
        Ok(())
    }

    pub fn write_bounds(&mut self, bounds: &[Bound]) -> Result<()> {
        let mut buffer = itoa::Buffer::new();
        for bound in bounds {
            self.buffer.push('[');
            self.buffer.push_str(buffer.format(bound.lower));
            self.buffer.push(':');
            self.buffer.push_str(buffer.format(bound.upper));
            self.buffer.push(']');
        }
        self.write_char('=')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Delimiter, QuoteEscape};

    #[rstest::rstest]
    fn test_writer_basic() {
        let mut writer = Writer::new(EncodeOptions::default());
        writer.write_open().unwrap();
        writer.write_int(-12).unwrap();
        writer.write_delimiter().unwrap();
        writer.write_null().unwrap();
        writer.write_delimiter().unwrap();
        writer.write_text("a b").unwrap();
        writer.write_close().unwrap();
        assert_eq!(writer.finish(), r#"{-12,null,"a b"}"#);
    }

    #[rstest::rstest]
    fn test_write_delimiter_semicolon() {
        let options = EncodeOptions::new().with_delimiter(Delimiter::Semicolon);
        let mut writer = Writer::new(options);
        writer.write_text("a,b").unwrap();
        writer.write_delimiter().unwrap();
        writer.write_text("c;d").unwrap();
        assert_eq!(writer.finish(), r#"a,b;"c;d""#);
    }

    #[rstest::rstest]
    #[case(1.0, "1")]
    #[case(1.5, "1.5")]
    #[case(-0.25, "-0.25")]
    #[case(f64::NAN, "NaN")]
    #[case(f64::INFINITY, "Infinity")]
    #[case(f64::NEG_INFINITY, "-Infinity")]
    fn test_write_float(#[case] value: f64, #[case] expected: &str) {
        let mut writer = Writer::new(EncodeOptions::default());
        writer.write_float(value).unwrap();
        assert_eq!(writer.as_str(), expected);
    }

    #[rstest::rstest]
    fn test_write_quoted_text_doubled() {
        let options = EncodeOptions::new().with_quote_escape(QuoteEscape::Doubled);
        let mut writer = Writer::new(options);
        writer.write_quoted_text("(1,\"x\")").unwrap();
        assert_eq!(writer.finish(), r#""(1,""x"")""#);
    }

    #[rstest::rstest]
    fn test_write_hex_and_bounds() {
        let mut writer = Writer::new(EncodeOptions::default());
        writer
            .write_bounds(&[Bound::new(0, 1), Bound::new(-1, 1)])
            .unwrap();
        writer.write_hex(&[0xca, 0xfe]).unwrap();
        assert_eq!(writer.finish(), "[0:1][-1:1]=0xCAFE");
    }
}
