use std::num::IntErrorKind;

use crate::ast::ConstantValue;

/// A string token split into its parts. `body` is the raw text between the
/// quotes, escapes untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringParts<'src> {
    pub raw: bool,
    pub bytes: bool,
    pub formatted: bool,
    pub body: &'src str,
}

pub fn split_string(text: &str) -> Option<StringParts<'_>> {
    let quote_at = text.find(['"', '\''])?;
    let (prefix, quoted) = text.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();

    let quote = &quoted[..1];
    let triple = quote.repeat(3);
    let delimiter = match quoted.starts_with(&triple) && quoted.len() >= 6 {
        true => triple.as_str(),
        false => quote,
    };

    let body = quoted
        .strip_prefix(delimiter)?
        .strip_suffix(delimiter)?;

    Some(StringParts {
        raw: prefix.contains('r'),
        bytes: prefix.contains('b'),
        formatted: prefix.contains('f'),
        body,
    })
}

/// Resolves backslash escapes. Unknown escapes keep their backslash.
pub fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let Some(escaped) = chars.next() else {
            result.push('\\');
            break;
        };

        match escaped {
            '\n' => {}
            '\r' => _ = chars.next_if_eq(&'\n'),
            '\\' => result.push('\\'),
            '\'' => result.push('\''),
            '"' => result.push('"'),
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            'a' => result.push('\x07'),
            'b' => result.push('\x08'),
            'f' => result.push('\x0c'),
            'v' => result.push('\x0b'),
            '0'..='7' => {
                let mut digits = String::from(escaped);
                while digits.len() < 3 {
                    match chars.next_if(|c| ('0'..='7').contains(c)) {
                        Some(digit) => digits.push(digit),
                        None => break,
                    }
                }
                let value = u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32);
                result.push(value.unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'x' | 'u' | 'U' => {
                let width = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..width)
                    .map_while(|_| chars.next_if(char::is_ascii_hexdigit))
                    .collect();
                let value = match digits.len() == width {
                    true => u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32),
                    false => None,
                };
                match value {
                    Some(ch) => result.push(ch),
                    None => {
                        result.push('\\');
                        result.push(escaped);
                        result.push_str(&digits);
                    }
                }
            }
            other => {
                result.push('\\');
                result.push(other);
            }
        }
    }

    result
}

/// Value of a single, non formatted string token.
pub fn string_value(parts: StringParts<'_>) -> ConstantValue {
    let text = match parts.raw {
        true => parts.body.to_string(),
        false => unescape(parts.body),
    };

    match parts.bytes {
        true => ConstantValue::Bytes(text),
        false => ConstantValue::Str(text),
    }
}

pub fn number_value(text: &str) -> Result<ConstantValue, String> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();

    if let Some(imaginary) = lower.strip_suffix('j') {
        return imaginary
            .parse()
            .map(ConstantValue::Complex)
            .map_err(|_| format!("invalid imaginary literal '{text}'"));
    }

    let radix = match lower.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        return integer_value(&lower[2..], radix, text);
    }

    if lower.contains(['.', 'e']) {
        return lower
            .parse()
            .map(ConstantValue::Float)
            .map_err(|_| format!("invalid float literal '{text}'"));
    }

    integer_value(&lower, 10, text)
}

/// Integers have unbounded precision at runtime; literals that overflow
/// `i128` become [`ConstantValue::BigInt`].
fn integer_value(digits: &str, radix: u32, text: &str) -> Result<ConstantValue, String> {
    match i128::from_str_radix(digits, radix) {
        Ok(value) => Ok(ConstantValue::Int(value)),
        Err(error) if *error.kind() == IntErrorKind::PosOverflow => {
            Ok(ConstantValue::BigInt(text.replace('_', "")))
        }
        Err(_) => Err(format!("invalid integer literal '{text}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_string() {
        let parts = split_string(r#"rb"a\n""#).unwrap();
        assert!(parts.raw && parts.bytes && !parts.formatted);
        assert_eq!(parts.body, r"a\n");

        let parts = split_string(r#"F'''x "y" z'''"#).unwrap();
        assert!(parts.formatted);
        assert_eq!(parts.body, r#"x "y" z"#);

        assert_eq!(split_string(r#""""#).unwrap().body, "");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\tb\\c\'"), "a\tb\\c'");
        assert_eq!(unescape(r"\x41\101é"), "AAé");
        assert_eq!(unescape(r"\d\x4"), r"\d\x4");
        assert_eq!(unescape("one\\\ntwo"), "onetwo");
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value("1_000"), Ok(ConstantValue::Int(1000)));
        assert_eq!(number_value("0xff"), Ok(ConstantValue::Int(255)));
        assert_eq!(number_value("0b101"), Ok(ConstantValue::Int(5)));
        assert_eq!(number_value("1.5"), Ok(ConstantValue::Float(1.5)));
        assert_eq!(number_value(".5"), Ok(ConstantValue::Float(0.5)));
        assert_eq!(number_value("1e3"), Ok(ConstantValue::Float(1000.0)));
        assert_eq!(number_value("2j"), Ok(ConstantValue::Complex(2.0)));
        assert!(number_value("0x").is_err());
        assert!(number_value("0b102").is_err());
    }

    #[test]
    fn test_oversized_integers() {
        let decimal = "1_000000000000000000000000000000000000000000";
        assert_eq!(
            number_value(decimal),
            Ok(ConstantValue::BigInt("1000000000000000000000000000000000000000000".into()))
        );
        assert_eq!(
            number_value("0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"),
            Ok(ConstantValue::BigInt("0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF".into()))
        );
        assert!(number_value("0o7777777777777777777777777777777777777777777777").is_ok());
        assert!(number_value(&format!("0b1{}", "0".repeat(130))).is_ok());
    }
}
