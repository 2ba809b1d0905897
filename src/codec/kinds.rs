use smol_str::SmolStr;

use crate::encode::writer::Writer;
use crate::text::hex::parse_hex;
use crate::types::BoxValue;
use crate::{ElementError, Error, Result};

use super::{ElementCodec, EscapeMode};

type DecodeResult<T> = std::result::Result<T, ElementError>;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl ElementCodec for BoolCodec {
    type Element = bool;

    fn decode(&self, text: &str) -> DecodeResult<bool> {
        const TRUE: &[&str] = &["t", "true", "y", "yes", "on", "1"];
        const FALSE: &[&str] = &["f", "false", "n", "no", "off", "0"];
        if TRUE.iter().any(|t| t.eq_ignore_ascii_case(text)) {
            Ok(true)
        } else if FALSE.iter().any(|f| f.eq_ignore_ascii_case(text)) {
            Ok(false)
        } else {
            Err(ElementError::invalid("bool", text))
        }
    }

    fn encode(&self, element: &bool, out: &mut Writer) -> Result<()> {
        out.write_char(if *element { 't' } else { 'f' })
    }
}

/// Signed integer of a fixed width.
#[derive(Debug, Clone, Copy)]
pub struct IntCodec {
    name: &'static str,
    min: i64,
    max: i64,
}

impl IntCodec {
    pub fn int2() -> Self {
        Self {
            name: "int2",
            min: i16::MIN as i64,
            max: i16::MAX as i64,
        }
    }

    pub fn int4() -> Self {
        Self {
            name: "int4",
            min: i32::MIN as i64,
            max: i32::MAX as i64,
        }
    }

    pub fn int8() -> Self {
        Self {
            name: "int8",
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    fn check(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl ElementCodec for IntCodec {
    type Element = i64;

    fn decode(&self, text: &str) -> DecodeResult<i64> {
        match text.parse::<i64>() {
            Ok(value) if self.check(value) => Ok(value),
            Ok(_) => Err(ElementError::new(format!(
                "value \"{text}\" is out of range for {}",
                self.name
            ))),
            Err(_) => Err(ElementError::invalid(self.name, text)),
        }
    }

    fn encode(&self, element: &i64, out: &mut Writer) -> Result<()> {
        if !self.check(*element) {
            return Err(Error::encode(format!(
                "{element} is out of range for {}",
                self.name
            )));
        }
        out.write_int(*element)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FloatCodec {
    single: bool,
}

impl FloatCodec {
    pub fn float4() -> Self {
        Self { single: true }
    }

    pub fn float8() -> Self {
        Self { single: false }
    }
}

impl ElementCodec for FloatCodec {
    type Element = f64;

    fn decode(&self, text: &str) -> DecodeResult<f64> {
        let name = if self.single { "float4" } else { "float8" };
        let value = if self.single {
            text.parse::<f32>().map(f64::from)
        } else {
            text.parse::<f64>()
        }
        .map_err(|_| ElementError::invalid(name, text))?;
        if !value.is_finite() && !is_non_finite_spelling(text) {
            return Err(ElementError::new(format!(
                "value \"{text}\" is out of range for {name}"
            )));
        }
        Ok(value)
    }

    fn encode(&self, element: &f64, out: &mut Writer) -> Result<()> {
        if self.single {
            out.write_float32(*element as f32)
        } else {
            out.write_float(*element)
        }
    }
}

/// `NaN`, `inf` or `infinity`, optionally signed, in any case.
fn is_non_finite_spelling(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    ["nan", "inf", "infinity"]
        .iter()
        .any(|spelling| spelling.eq_ignore_ascii_case(unsigned))
}

/// Arbitrary-precision decimal, carried as validated text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericCodec;

impl NumericCodec {
    pub fn is_numeric(text: &str) -> bool {
        if text.eq_ignore_ascii_case("nan") {
            return true;
        }
        let bytes = text.as_bytes();
        let mut pos = 0;
        if matches!(bytes.first(), Some(b'+' | b'-')) {
            pos += 1;
        }
        let int_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let mut digits = pos - int_start;
        if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            let frac_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            digits += pos - frac_start;
        }
        if digits == 0 {
            return false;
        }
        if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
            pos += 1;
            if matches!(bytes.get(pos), Some(b'+' | b'-')) {
                pos += 1;
            }
            let exp_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == exp_start {
                return false;
            }
        }
        pos == bytes.len()
    }
}

impl ElementCodec for NumericCodec {
    type Element = SmolStr;

    fn decode(&self, text: &str) -> DecodeResult<SmolStr> {
        if Self::is_numeric(text) {
            Ok(SmolStr::new(text))
        } else {
            Err(ElementError::invalid("numeric", text))
        }
    }

    fn encode(&self, element: &SmolStr, out: &mut Writer) -> Result<()> {
        if !Self::is_numeric(element) {
            return Err(Error::encode(format!("\"{element}\" is not a numeric value")));
        }
        out.write_str(element)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ElementCodec for TextCodec {
    type Element = String;

    fn decode(&self, text: &str) -> DecodeResult<String> {
        Ok(text.to_string())
    }

    fn encode(&self, element: &String, out: &mut Writer) -> Result<()> {
        out.write_text(element)
    }
}

/// Raw bytes written as `0x` hex. Reads `0x…` and `\x…`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteaCodec;

impl ElementCodec for ByteaCodec {
    type Element = Vec<u8>;

    fn decode(&self, text: &str) -> DecodeResult<Vec<u8>> {
        parse_hex(text).ok_or_else(|| ElementError::invalid("bytea", text))
    }

    fn encode(&self, element: &Vec<u8>, out: &mut Writer) -> Result<()> {
        out.write_hex(element)
    }

    fn escape_mode(&self) -> EscapeMode {
        EscapeMode::Hex
    }
}

/// Enum label, optionally restricted to a known label set.
#[derive(Debug, Clone, Default)]
pub struct EnumCodec {
    labels: Option<Vec<SmolStr>>,
}

impl EnumCodec {
    pub fn any() -> Self {
        Self { labels: None }
    }

    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            labels: Some(labels.into_iter().map(Into::into).collect()),
        }
    }

    fn allows(&self, label: &str) -> bool {
        match &self.labels {
            Some(labels) => labels.iter().any(|known| known == label),
            None => true,
        }
    }
}

impl ElementCodec for EnumCodec {
    type Element = SmolStr;

    fn decode(&self, text: &str) -> DecodeResult<SmolStr> {
        if self.allows(text) {
            Ok(SmolStr::new(text))
        } else {
            Err(ElementError::new(format!("unknown enum label \"{text}\"")))
        }
    }

    fn encode(&self, element: &SmolStr, out: &mut Writer) -> Result<()> {
        if !self.allows(element) {
            return Err(Error::encode(format!("unknown enum label \"{element}\"")));
        }
        out.write_text(element)
    }
}

/// `(x1,y1),(x2,y2)`; corners are normalized to high/low.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxCodec;

impl ElementCodec for BoxCodec {
    type Element = BoxValue;

    fn decode(&self, text: &str) -> DecodeResult<BoxValue> {
        let invalid = || ElementError::invalid("box", text);
        let (x1, y1, rest) = parse_point(text).ok_or_else(invalid)?;
        let rest = rest.trim_start().strip_prefix(',').ok_or_else(invalid)?;
        let (x2, y2, rest) = parse_point(rest).ok_or_else(invalid)?;
        if !rest.trim().is_empty() {
            return Err(invalid());
        }
        Ok(BoxValue {
            high: (x1.max(x2), y1.max(y2)),
            low: (x1.min(x2), y1.min(y2)),
        })
    }

    fn encode(&self, element: &BoxValue, out: &mut Writer) -> Result<()> {
        let mut text = Writer::new(out.options().clone());
        text.write_char('(')?;
        text.write_float(element.high.0)?;
        text.write_char(',')?;
        text.write_float(element.high.1)?;
        text.write_str("),(")?;
        text.write_float(element.low.0)?;
        text.write_char(',')?;
        text.write_float(element.low.1)?;
        text.write_char(')')?;
        out.write_text(text.as_str())
    }
}

/// One `(x,y)` point at the start of `text`, and what follows it.
fn parse_point(text: &str) -> Option<(f64, f64, &str)> {
    let body = text.trim_start().strip_prefix('(')?;
    let (inner, rest) = body.split_once(')')?;
    let (x, y) = inner.split_once(',')?;
    let x = x.trim().parse::<f64>().ok()?;
    let y = y.trim().parse::<f64>().ok()?;
    Some((x, y, rest))
}

/// Composite record text, always written quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCodec;

impl ElementCodec for RecordCodec {
    type Element = String;

    fn decode(&self, text: &str) -> DecodeResult<String> {
        if text.starts_with('(') && text.ends_with(')') && text.len() >= 2 {
            Ok(text.to_string())
        } else {
            Err(ElementError::invalid("record", text))
        }
    }

    fn encode(&self, element: &String, out: &mut Writer) -> Result<()> {
        out.write_quoted_text(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Delimiter, EncodeOptions};

    fn encode_with<C: ElementCodec>(codec: &C, value: &C::Element) -> String {
        let mut writer = Writer::new(EncodeOptions::default());
        codec.encode(value, &mut writer).unwrap();
        writer.finish()
    }

    #[rstest::rstest]
    #[case("t", true)]
    #[case("TRUE", true)]
    #[case("yes", true)]
    #[case("f", false)]
    #[case("Off", false)]
    fn test_bool_decode(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(BoolCodec.decode(input).unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_bool_encode() {
        assert_eq!(encode_with(&BoolCodec, &true), "t");
        assert!(BoolCodec.decode("maybe").is_err());
    }

    #[rstest::rstest]
    fn test_int_ranges() {
        assert_eq!(IntCodec::int2().decode("32767").unwrap(), 32767);
        assert!(IntCodec::int2().decode("32768").is_err());
        assert!(IntCodec::int4().decode("2147483648").is_err());
        assert_eq!(IntCodec::int8().decode("-9223372036854775808").unwrap(), i64::MIN);
        assert!(IntCodec::int4().decode("1.5").is_err());

        let mut writer = Writer::new(EncodeOptions::default());
        assert!(IntCodec::int2().encode(&70_000, &mut writer).is_err());
    }

    #[rstest::rstest]
    fn test_float_codec() {
        assert_eq!(FloatCodec::float8().decode("1.25").unwrap(), 1.25);
        assert!(FloatCodec::float8().decode("NaN").unwrap().is_nan());
        assert_eq!(FloatCodec::float8().decode("-Infinity").unwrap(), f64::NEG_INFINITY);
        assert_eq!(encode_with(&FloatCodec::float4(), &0.1f32.into()), "0.1");
        assert!(FloatCodec::float8().decode("abc").is_err());
    }

    #[rstest::rstest]
    #[case("1e40", false)]
    #[case("-1e39", false)]
    #[case("3.4e38", true)]
    #[case("Infinity", true)]
    #[case("-inf", true)]
    #[case("nan", true)]
    fn test_float4_range(#[case] input: &str, #[case] accepted: bool) {
        assert_eq!(FloatCodec::float4().decode(input).is_ok(), accepted, "{input}");
    }

    #[rstest::rstest]
    fn test_float8_range() {
        assert!(FloatCodec::float8().decode("1e400").is_err());
        assert_eq!(FloatCodec::float8().decode("1e40").unwrap(), 1e40);
    }

    #[rstest::rstest]
    #[case("0", true)]
    #[case("-12.50", true)]
    #[case(".5", true)]
    #[case("1e10", true)]
    #[case("1.5E-3", true)]
    #[case("NaN", true)]
    #[case("", false)]
    #[case("1e", false)]
    #[case("1.2.3", false)]
    #[case("abc", false)]
    fn test_numeric(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(NumericCodec::is_numeric(input), expected);
    }

    #[rstest::rstest]
    fn test_text_escaping_round_trip() {
        let original = "a\"b\\c".to_string();
        let encoded = encode_with(&TextCodec, &original);
        assert_eq!(encoded, r#""a\"b\\c""#);
        let body = &encoded[1..encoded.len() - 1];
        let unescaped =
            crate::text::string::unescape(body, crate::QuoteEscape::Backslash).into_owned();
        assert_eq!(TextCodec.decode(&unescaped).unwrap(), original);
    }

    #[rstest::rstest]
    fn test_bytea() {
        assert_eq!(ByteaCodec.decode("0xDEADBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(encode_with(&ByteaCodec, &vec![0x5c, 0x22]), "0x5C22");
        assert_eq!(ByteaCodec.escape_mode(), EscapeMode::Hex);
        assert!(ByteaCodec.decode("DEAD").is_err());
    }

    #[rstest::rstest]
    fn test_enum_labels() {
        let codec = EnumCodec::with_labels(["red", "green"]);
        assert_eq!(codec.decode("red").unwrap(), "red");
        assert!(codec.decode("blue").is_err());
        assert_eq!(EnumCodec::any().decode("blue").unwrap(), "blue");

        let mut writer = Writer::new(EncodeOptions::default());
        assert!(codec.encode(&SmolStr::new("blue"), &mut writer).is_err());
    }

    #[rstest::rstest]
    fn test_box() {
        let value = BoxCodec.decode("(0,1),(2,3)").unwrap();
        assert_eq!(value.high, (2.0, 3.0));
        assert_eq!(value.low, (0.0, 1.0));
        assert!(BoxCodec.decode("(0,1),(2)").is_err());
        assert!(BoxCodec.decode("(0,1),(2,3),(4,5)").is_err());
        assert_eq!(BoxCodec.decode(" ( 0 , 1 ) , ( 2 , 3 ) ").unwrap(), value);
    }

    #[rstest::rstest]
    #[case("1,1,0,0")]
    #[case("((1,1)),(0,0)")]
    #[case("(1,1),(0,0))")]
    #[case("(1,1)(0,0)")]
    #[case("(1,1,0),(0,0)")]
    #[case("(1,1),0,0")]
    #[case("")]
    fn test_box_rejects_malformed(#[case] input: &str) {
        assert!(BoxCodec.decode(input).is_err(), "{input}");
    }

    #[rstest::rstest]
    fn test_box_encode() {
        let value = BoxCodec.decode("(0,1),(2,3)").unwrap();

        let mut writer = Writer::new(EncodeOptions::new().with_delimiter(Delimiter::Semicolon));
        BoxCodec.encode(&value, &mut writer).unwrap();
        assert_eq!(writer.finish(), "(2,3),(0,1)");
        assert_eq!(encode_with(&BoxCodec, &value), "\"(2,3),(0,1)\"");
    }

    #[rstest::rstest]
    fn test_record() {
        assert_eq!(RecordCodec.decode("(1,x)").unwrap(), "(1,x)");
        assert!(RecordCodec.decode("1,x").is_err());
        assert_eq!(encode_with(&RecordCodec, &"(1,x)".to_string()), "\"(1,x)\"");
    }
}
