use crate::constants::is_whitespace;
use crate::{Error, QuoteEscape, Result};

use super::scanner::{classify, skip_quoted, skip_whitespace, CharClass};

/// Count the elements of the array level whose `{` is at (or after
/// whitespace following) `offset`, without decoding anything.
///
/// Nested levels and quoted elements are opaque: only delimiters at the
/// level's own depth are counted.
pub fn array_length(
    text: &str,
    offset: usize,
    end: usize,
    delimiter: u8,
    quote_escape: QuoteEscape,
) -> Result<usize> {
    let bytes = text.as_bytes();
    let end = end.min(bytes.len());
    let mut pos = skip_whitespace(bytes, offset, end);
    if pos >= end || classify(bytes[pos], delimiter) != CharClass::LeftBrace {
        return Err(Error::structural(pos, "no left brace"));
    }
    pos += 1;

    let mut depth = 0usize;
    let mut delimiters = 0usize;
    let mut has_content = false;
    while pos < end {
        let byte = bytes[pos];
        match classify(byte, delimiter) {
            CharClass::LeftBrace => {
                depth += 1;
                has_content = true;
            }
            CharClass::RightBrace => {
                if depth == 0 {
                    return Ok(if has_content || delimiters > 0 {
                        delimiters + 1
                    } else {
                        0
                    });
                }
                depth -= 1;
            }
            CharClass::Quote => {
                pos = skip_quoted(bytes, pos, end, quote_escape)?;
                has_content = true;
                continue;
            }
            CharClass::Delimiter => {
                if depth == 0 {
                    delimiters += 1;
                }
            }
            CharClass::Backslash | CharClass::Other => {
                if !is_whitespace(byte) {
                    has_content = true;
                }
            }
        }
        pos += 1;
    }
    Err(Error::structural(end, "no right brace"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn length(text: &str) -> Result<usize> {
        array_length(text, 0, text.len(), b',', QuoteEscape::Backslash)
    }

    #[rstest::rstest]
    #[case("{}", 0)]
    #[case("  { }", 0)]
    #[case("{1}", 1)]
    #[case("{1,2,3}", 3)]
    #[case("{{1,2,3},{4,5}}", 2)]
    #[case(r#"{"a,b","c\"d"}"#, 2)]
    #[case(r#"{"{",x}"#, 2)]
    #[case("{,}", 2)]
    #[case("{1,2}trailing", 2)]
    fn test_array_length(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(length(input).unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_array_length_semicolon() {
        let text = "{(1,2),(0,0);(3,4),(1,1)}";
        assert_eq!(
            array_length(text, 0, text.len(), b';', QuoteEscape::Backslash).unwrap(),
            2
        );
    }

    #[rstest::rstest]
    fn test_array_length_inner_level() {
        let text = "{{1,2,3},{4,5}}";
        assert_eq!(array_length(text, 9, text.len(), b',', QuoteEscape::Backslash).unwrap(), 2);
    }

    #[rstest::rstest]
    fn test_array_length_errors() {
        let err = length("1,2}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.offset(), Some(0));

        let err = length("{1,2,3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.offset(), Some(6));

        let err = length("{{1,2}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);

        let err = length("").unwrap_err();
        assert_eq!(err.offset(), Some(0));
    }

    #[rstest::rstest]
    fn test_array_length_respects_end() {
        let text = "{1,2}";
        assert!(array_length(text, 0, 4, b',', QuoteEscape::Backslash).is_err());
    }
}
