const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Append `0x` followed by upper-case hex digits.
pub fn push_hex(out: &mut String, bytes: &[u8]) {
    out.reserve(2 + bytes.len() * 2);
    out.push_str("0x");
    for &byte in bytes {
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
    }
}

/// Decode `0x…` or `\x…` hex text. `None` when the prefix or a digit is bad.
pub fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix("\\x"))?
        .as_bytes();
    if digits.len() % 2 != 0 {
        return None;
    }
    digits
        .chunks_exact(2)
        .map(|pair| Some(nibble(pair[0])? << 4 | nibble(pair[1])?))
        .collect()
}

fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_push_hex() {
        let mut out = String::new();
        push_hex(&mut out, &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(out, "0xDEADBEEF");

        let mut out = String::new();
        push_hex(&mut out, &[]);
        assert_eq!(out, "0x");
    }

    #[rstest::rstest]
    #[case("0xCAFEBABE", Some(vec![0xca, 0xfe, 0xba, 0xbe]))]
    #[case("\\xcafe", Some(vec![0xca, 0xfe]))]
    #[case("0x", Some(vec![]))]
    #[case("0xABC", None)]
    #[case("0xZZ", None)]
    #[case("CAFE", None)]
    fn test_parse_hex(#[case] input: &str, #[case] expected: Option<Vec<u8>>) {
        assert_eq!(parse_hex(input), expected);
    }
}
