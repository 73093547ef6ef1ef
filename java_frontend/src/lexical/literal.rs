//! Decoding of literal source text into values
//!
//! Runs when the lexer reduces a literal token. The lexer has already fixed
//! the token kind from prefix and suffix characters, so these functions only
//! check digit placement, ranges and escapes.

use crate::tokens::{LiteralValue, Radix, TokenKind};

/// Reason a literal failed to decode. The lexer adds text and offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralFault {
    InvalidNumber(&'static str),
    /// Byte offset of the bad escape within the literal
    InvalidEscape(usize),
    InvalidCharLiteral,
}

type Decoded<T> = Result<T, LiteralFault>;

const INT_BOUNDARY: u64 = 1 << 31;
const LONG_BOUNDARY: u64 = 1 << 63;

/// Decoded value for a literal kind; `None` for kinds without one
pub fn decode(kind: TokenKind, text: &str) -> Decoded<Option<LiteralValue>> {
    let value = match kind {
        TokenKind::IntLiteral => decode_integer(text, false)?,
        TokenKind::LongLiteral => decode_integer(text, true)?,
        TokenKind::FloatLiteral => LiteralValue::Floating(decode_floating(text, true)?),
        TokenKind::DoubleLiteral => LiteralValue::Floating(decode_floating(text, false)?),
        TokenKind::CharLiteral => LiteralValue::Char(decode_char(text)?),
        TokenKind::StringLiteral => LiteralValue::Str(decode_string(text)?),
        TokenKind::TextBlock => LiteralValue::Str(decode_text_block(text)?),
        TokenKind::True => LiteralValue::Bool(true),
        TokenKind::False => LiteralValue::Bool(false),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// True when a decoded integer is the decimal `2147483648` or
/// `9223372036854775808L`, legal only as the operand of unary minus
pub fn is_negation_only(value: &LiteralValue, long: bool) -> bool {
    match value {
        LiteralValue::Integer {
            value,
            radix: Radix::Decimal,
        } => {
            if long {
                *value == i64::MIN
            } else {
                *value == i32::MIN as i64
            }
        }
        _ => false,
    }
}

/// Remove underscores, which are only legal between two digits
fn strip_underscores(digits: &str, is_digit: impl Fn(char) -> bool) -> Decoded<String> {
    let chars: Vec<char> = digits.chars().collect();
    let mut cleaned = String::with_capacity(chars.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch != '_' {
            cleaned.push(ch);
            continue;
        }
        let before = chars[..i].iter().rev().find(|c| **c != '_');
        let after = chars[i + 1..].iter().find(|c| **c != '_');
        if !before.is_some_and(|c| is_digit(*c)) || !after.is_some_and(|c| is_digit(*c)) {
            return Err(LiteralFault::InvalidNumber("underscore must separate digits"));
        }
    }
    Ok(cleaned)
}

fn decode_integer(text: &str, long: bool) -> Decoded<LiteralValue> {
    let body = if long { &text[..text.len() - 1] } else { text };
    let lower = body.to_ascii_lowercase();

    let (radix, digits) = if lower.starts_with("0x") {
        (Radix::Hexadecimal, &body[2..])
    } else if lower.starts_with("0b") {
        (Radix::Binary, &body[2..])
    } else if body.len() > 1 && body.starts_with('0') {
        (Radix::Octal, body)
    } else {
        (Radix::Decimal, body)
    };

    let base = radix.base();
    let digits = strip_underscores(digits, |c| c.is_digit(base))?;
    if digits.is_empty() {
        return Err(LiteralFault::InvalidNumber("missing digits"));
    }

    let mut magnitude: u64 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(base).ok_or(match radix {
            Radix::Octal => LiteralFault::InvalidNumber("digit out of range for octal"),
            Radix::Binary => LiteralFault::InvalidNumber("digit out of range for binary"),
            _ => LiteralFault::InvalidNumber("invalid digit"),
        })?;
        magnitude = magnitude
            .checked_mul(base as u64)
            .and_then(|m| m.checked_add(digit as u64))
            .ok_or(LiteralFault::InvalidNumber("literal out of range"))?;
    }

    let value = match (radix, long) {
        (Radix::Decimal, false) if magnitude <= INT_BOUNDARY => {
            if magnitude == INT_BOUNDARY {
                i32::MIN as i64
            } else {
                magnitude as i64
            }
        }
        (Radix::Decimal, true) if magnitude <= LONG_BOUNDARY => magnitude as i64,
        (Radix::Decimal, _) => return Err(LiteralFault::InvalidNumber("literal out of range")),
        (_, false) if magnitude <= u32::MAX as u64 => magnitude as u32 as i32 as i64,
        (_, false) => return Err(LiteralFault::InvalidNumber("literal out of range")),
        (_, true) => magnitude as i64,
    };

    Ok(LiteralValue::Integer { value, radix })
}

fn decode_floating(text: &str, single: bool) -> Decoded<f64> {
    // hex floats always end in exponent digits, so a trailing letter is a suffix
    let body = match text.chars().last() {
        Some('f' | 'F' | 'd' | 'D') => &text[..text.len() - 1],
        _ => text,
    };

    let value = if is_hex_prefixed(body) {
        decode_hex_floating(&body[2..])?
    } else {
        let cleaned = strip_underscores(body, |c| c.is_ascii_digit())?;
        let parsed = if single {
            cleaned.parse::<f32>().map(|v| v as f64)
        } else {
            cleaned.parse::<f64>()
        };
        parsed.map_err(|_| LiteralFault::InvalidNumber("malformed floating-point literal"))?
    };

    let value = if single { value as f32 as f64 } else { value };
    if value.is_infinite() {
        return Err(LiteralFault::InvalidNumber("floating-point literal too large"));
    }
    if value == 0.0 && has_nonzero_mantissa(body) {
        return Err(LiteralFault::InvalidNumber("floating-point literal too small"));
    }
    Ok(value)
}

fn is_hex_prefixed(text: &str) -> bool {
    text.len() > 1 && text.starts_with('0') && matches!(text.as_bytes()[1], b'x' | b'X')
}

fn has_nonzero_mantissa(body: &str) -> bool {
    let (digits, hex) = if is_hex_prefixed(body) {
        (&body[2..], true)
    } else {
        (body, false)
    };
    let mantissa = digits
        .split(|c| if hex { c == 'p' || c == 'P' } else { c == 'e' || c == 'E' })
        .next()
        .unwrap_or("");
    mantissa
        .chars()
        .any(|c| c.is_ascii_hexdigit() && c != '0')
}

/// `digits` is everything after `0x`: hex mantissa, `p`, signed exponent
fn decode_hex_floating(digits: &str) -> Decoded<f64> {
    let (mantissa, exponent) = digits
        .split_once(['p', 'P'])
        .ok_or(LiteralFault::InvalidNumber("hex floating-point literal needs an exponent"))?;

    let mantissa = strip_underscores(mantissa, |c| c.is_ascii_hexdigit())?;
    let exponent = strip_underscores(exponent, |c| c.is_ascii_digit())?;

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa.as_str(), ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(LiteralFault::InvalidNumber("missing digits"));
    }

    let mut value = 0f64;
    for ch in whole.chars().chain(fraction.chars()) {
        let digit = ch
            .to_digit(16)
            .ok_or(LiteralFault::InvalidNumber("invalid digit"))?;
        value = value * 16.0 + digit as f64;
    }

    let exponent: i64 = exponent
        .parse()
        .map_err(|_| LiteralFault::InvalidNumber("malformed exponent"))?;
    let scale = exponent.saturating_sub(4 * fraction.len() as i64);
    let scale = scale.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    Ok(value * 2f64.powi(scale))
}

/// Code unit or scalar produced by one step of escape decoding
enum Unit {
    Scalar(char),
    /// UTF-16 code unit from a `\u` escape, possibly half a surrogate pair
    Utf16(u16),
    /// `\<line terminator>` inside a text block
    Continuation,
}

struct EscapeReader<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    text_block: bool,
}

impl<'a> EscapeReader<'a> {
    fn new(body: &'a str, text_block: bool) -> Self {
        Self {
            chars: body.char_indices().peekable(),
            text_block,
        }
    }

    fn next_unit(&mut self) -> Option<Decoded<Unit>> {
        let (offset, ch) = self.chars.next()?;
        if ch != '\\' {
            return Some(Ok(Unit::Scalar(ch)));
        }
        let invalid = LiteralFault::InvalidEscape(offset);
        let Some((_, escape)) = self.chars.next() else {
            return Some(Err(invalid));
        };
        let unit = match escape {
            'b' => Unit::Scalar('\u{8}'),
            't' => Unit::Scalar('\t'),
            'n' => Unit::Scalar('\n'),
            'f' => Unit::Scalar('\u{c}'),
            'r' => Unit::Scalar('\r'),
            's' => Unit::Scalar(' '),
            '"' => Unit::Scalar('"'),
            '\'' => Unit::Scalar('\''),
            '\\' => Unit::Scalar('\\'),
            '\n' if self.text_block => Unit::Continuation,
            '\r' if self.text_block => {
                self.chars.next_if(|(_, c)| *c == '\n');
                Unit::Continuation
            }
            'u' => {
                while self.chars.next_if(|(_, c)| *c == 'u').is_some() {}
                let mut code = 0u32;
                for _ in 0..4 {
                    match self.chars.next().and_then(|(_, c)| c.to_digit(16)) {
                        Some(digit) => code = code * 16 + digit,
                        None => return Some(Err(invalid)),
                    }
                }
                Unit::Utf16(code as u16)
            }
            '0'..='7' => {
                let max_len = if escape <= '3' { 3 } else { 2 };
                let mut code = escape as u32 - '0' as u32;
                for _ in 1..max_len {
                    match self.chars.next_if(|(_, c)| matches!(c, '0'..='7')) {
                        Some((_, digit)) => code = code * 8 + (digit as u32 - '0' as u32),
                        None => break,
                    }
                }
                Unit::Scalar(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            _ => return Some(Err(invalid)),
        };
        Some(Ok(unit))
    }
}

/// Decode escapes; surrogate pairs combine and lone surrogates become U+FFFD
fn decode_escapes(body: &str, text_block: bool) -> Decoded<String> {
    let mut reader = EscapeReader::new(body, text_block);
    let mut out = String::with_capacity(body.len());
    let mut pending: Vec<u16> = Vec::new();

    let flush = |pending: &mut Vec<u16>, out: &mut String| {
        out.extend(char::decode_utf16(pending.drain(..)).map(|r| {
            r.unwrap_or(char::REPLACEMENT_CHARACTER)
        }));
    };

    while let Some(unit) = reader.next_unit() {
        match unit? {
            Unit::Utf16(code) => pending.push(code),
            Unit::Scalar(ch) => {
                flush(&mut pending, &mut out);
                out.push(ch);
            }
            Unit::Continuation => flush(&mut pending, &mut out),
        }
    }
    flush(&mut pending, &mut out);
    Ok(out)
}

fn decode_string(text: &str) -> Decoded<String> {
    let body = &text[1..text.len() - 1];
    decode_escapes(body, false).map_err(|fault| shift_escape(fault, 1))
}

fn decode_char(text: &str) -> Decoded<char> {
    let body = &text[1..text.len() - 1];
    let decoded = decode_escapes(body, false).map_err(|fault| shift_escape(fault, 1))?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if (ch as u32) <= 0xFFFF => Ok(ch),
        _ => Err(LiteralFault::InvalidCharLiteral),
    }
}

fn shift_escape(fault: LiteralFault, by: usize) -> LiteralFault {
    match fault {
        LiteralFault::InvalidEscape(offset) => LiteralFault::InvalidEscape(offset + by),
        other => other,
    }
}

/// Strip incidental indentation and trailing spaces, then decode escapes
fn decode_text_block(text: &str) -> Decoded<String> {
    let inner = &text[3..text.len() - 3];
    let content_start = inner
        .find(['\n', '\r'])
        .map(|i| {
            if inner[i..].starts_with("\r\n") {
                i + 2
            } else {
                i + 1
            }
        })
        .unwrap_or(inner.len());
    let content = inner[content_start..].replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<&str> = content.split('\n').collect();
    let last = lines.len() - 1;
    let is_blank = |line: &str| line.chars().all(char::is_whitespace);
    let closing_line_blank = is_blank(lines[last]);

    let indent = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| *i == last || !is_blank(line))
        .map(|(_, line)| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut stripped: Vec<String> = lines
        .iter()
        .map(|line| {
            if is_blank(line) {
                String::new()
            } else {
                line.chars().skip(indent).collect::<String>().trim_end().to_string()
            }
        })
        .collect();
    if closing_line_blank {
        stripped[last] = String::new();
    }

    let offset = 3 + content_start;
    decode_escapes(&stripped.join("\n"), true).map_err(|fault| match fault {
        // positions inside the re-indented text; report the block start instead
        LiteralFault::InvalidEscape(_) => LiteralFault::InvalidEscape(offset),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn int(text: &str) -> (i64, Radix) {
        match decode(TokenKind::IntLiteral, text) {
            Ok(Some(LiteralValue::Integer { value, radix })) => (value, radix),
            other => panic!("unexpected {:?}", other),
        }
    }

    fn long(text: &str) -> (i64, Radix) {
        match decode(TokenKind::LongLiteral, text) {
            Ok(Some(LiteralValue::Integer { value, radix })) => (value, radix),
            other => panic!("unexpected {:?}", other),
        }
    }

    fn double(text: &str) -> f64 {
        match decode(TokenKind::DoubleLiteral, text) {
            Ok(Some(LiteralValue::Floating(v))) => v,
            other => panic!("unexpected {:?}", other),
        }
    }

    fn string(text: &str) -> String {
        match decode(TokenKind::StringLiteral, text) {
            Ok(Some(LiteralValue::Str(s))) => s,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_integer_radixes() {
        assert_eq!(int("010"), (8, Radix::Octal));
        assert_eq!(int("0xFF"), (255, Radix::Hexadecimal));
        assert_eq!(int("0b1010"), (10, Radix::Binary));
        assert_eq!(int("0"), (0, Radix::Decimal));
        assert_eq!(int("1_000_000"), (1_000_000, Radix::Decimal));
        assert_eq!(int("0_7"), (7, Radix::Octal));
        assert_eq!(long("1L"), (1, Radix::Decimal));
    }

    #[test]
    fn test_non_decimal_literals_fill_all_bits() {
        assert_eq!(int("0xFFFFFFFF").0, -1);
        assert_eq!(int("0x80000000").0, i32::MIN as i64);
        assert_eq!(int("037777777777").0, -1);
        assert_eq!(long("0xFFFFFFFFFFFFFFFFL").0, -1);
        assert_matches!(
            decode(TokenKind::IntLiteral, "0x1FFFFFFFF"),
            Err(LiteralFault::InvalidNumber(_))
        );
    }

    #[test]
    fn test_decimal_boundaries() {
        assert_eq!(int("2147483647").0, 2147483647);
        let boundary = decode(TokenKind::IntLiteral, "2147483648").unwrap().unwrap();
        assert!(is_negation_only(&boundary, false));
        assert_matches!(
            decode(TokenKind::IntLiteral, "2147483649"),
            Err(LiteralFault::InvalidNumber(_))
        );
        let boundary = decode(TokenKind::LongLiteral, "9223372036854775808L")
            .unwrap()
            .unwrap();
        assert!(is_negation_only(&boundary, true));
        assert!(!is_negation_only(
            &LiteralValue::Integer {
                value: -1,
                radix: Radix::Hexadecimal
            },
            false
        ));
    }

    #[test]
    fn test_bad_digits_and_underscores() {
        assert_matches!(
            decode(TokenKind::IntLiteral, "09"),
            Err(LiteralFault::InvalidNumber(_))
        );
        assert_matches!(
            decode(TokenKind::IntLiteral, "0b102"),
            Err(LiteralFault::InvalidNumber(_))
        );
        assert_matches!(
            decode(TokenKind::IntLiteral, "1_"),
            Err(LiteralFault::InvalidNumber(_))
        );
        assert_matches!(
            decode(TokenKind::IntLiteral, "0x_1"),
            Err(LiteralFault::InvalidNumber(_))
        );
        assert_matches!(
            decode(TokenKind::DoubleLiteral, "1_.5"),
            Err(LiteralFault::InvalidNumber(_))
        );
    }

    #[test]
    fn test_floating_forms() {
        assert!((double("3.14e-1") - 0.314).abs() < 1e-12);
        assert_eq!(double("1."), 1.0);
        assert_eq!(double(".5"), 0.5);
        assert_eq!(double("1e3"), 1000.0);
        assert_eq!(double("2d"), 2.0);
        assert_eq!(double("0x1p3"), 8.0);
        assert_eq!(double("0x1.8p1"), 3.0);
        assert_eq!(double("0x.8p0D"), 0.5);
        match decode(TokenKind::FloatLiteral, "1.5f") {
            Ok(Some(LiteralValue::Floating(v))) => assert_eq!(v, 1.5),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_floating_range_errors() {
        assert_matches!(
            decode(TokenKind::FloatLiteral, "1e40f"),
            Err(LiteralFault::InvalidNumber(_))
        );
        assert_matches!(
            decode(TokenKind::DoubleLiteral, "1e-400"),
            Err(LiteralFault::InvalidNumber(_))
        );
        assert_eq!(double("0e-400"), 0.0);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(string(r#""a\tb""#), "a\tb");
        assert_eq!(string(r#""\s\"\\""#), " \"\\");
        assert_eq!(string(r#""\101\0\377""#), "A\u{0}\u{ff}");
        assert_eq!(string(r#""A\uu0042""#), "AB");
        assert_eq!(string(r#""😀""#), "\u{1F600}");
        assert_eq!(string(r#""\uD800x""#), "\u{FFFD}x");
        assert_eq!(string(r#""""#), "");
        assert_matches!(
            decode(TokenKind::StringLiteral, r#""ab\q""#),
            Err(LiteralFault::InvalidEscape(3))
        );
        assert_matches!(
            decode(TokenKind::StringLiteral, r#""\u12""#),
            Err(LiteralFault::InvalidEscape(1))
        );
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(
            decode(TokenKind::CharLiteral, "'a'"),
            Ok(Some(LiteralValue::Char('a')))
        );
        assert_eq!(
            decode(TokenKind::CharLiteral, r"'\n'"),
            Ok(Some(LiteralValue::Char('\n')))
        );
        assert_eq!(
            decode(TokenKind::CharLiteral, r"'\u0041'"),
            Ok(Some(LiteralValue::Char('A')))
        );
        assert_matches!(
            decode(TokenKind::CharLiteral, "'ab'"),
            Err(LiteralFault::InvalidCharLiteral)
        );
        assert_matches!(
            decode(TokenKind::CharLiteral, "'\u{1F600}'"),
            Err(LiteralFault::InvalidCharLiteral)
        );
    }

    #[test]
    fn test_text_block_indentation() {
        let block = "\"\"\"\n    hello\n      world\n    \"\"\"";
        assert_eq!(
            decode(TokenKind::TextBlock, block),
            Ok(Some(LiteralValue::Str("hello\n  world\n".to_string())))
        );

        let closing_inline = "\"\"\"\n  a  \n  b\"\"\"";
        assert_eq!(
            decode(TokenKind::TextBlock, closing_inline),
            Ok(Some(LiteralValue::Str("a\nb".to_string())))
        );

        let closing_left = "\"\"\"\r\n    x\r\n\"\"\"";
        assert_eq!(
            decode(TokenKind::TextBlock, closing_left),
            Ok(Some(LiteralValue::Str("    x\n".to_string())))
        );
    }

    #[test]
    fn test_text_block_escapes() {
        let block = "\"\"\"\n  one \\\n  two\\s\n  \"\"\"";
        assert_eq!(
            decode(TokenKind::TextBlock, block),
            Ok(Some(LiteralValue::Str("one two \n".to_string())))
        );
    }

    #[test]
    fn test_non_literal_kinds_have_no_value() {
        assert_eq!(decode(TokenKind::Identifier, "x"), Ok(None));
        assert_eq!(decode(TokenKind::Null, "null"), Ok(None));
        assert_eq!(
            decode(TokenKind::True, "true"),
            Ok(Some(LiteralValue::Bool(true)))
        );
    }
}
