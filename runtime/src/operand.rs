//! # Operand Parsing
//!
//! Converts a loaded XML `<argK type="...">text</argK>` element into an
//! [`Operand`] — either a variable reference, a literal value, a label
//! name, or a type-literal — applying the per-kind normalization rules of
//! spec §4.1.

use crate::error::InterpError;
use crate::hexfloat;
use crate::value::Value;

/// One resolved instruction operand, as it appears in the source form
/// (before frame/name lookup, which happens at execution time).
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A `FRAME@NAME` variable reference, not yet split.
    Var(String),
    /// A literal value (int/float/bool/string/nil).
    Literal(Value),
    /// A label name (for `LABEL`/`JUMP`/`CALL`/`JUMPIF{N,}EQ`).
    Label(String),
    /// A type-literal (`int|string|bool|float`), for `TYPE`-adjacent opcodes.
    TypeLiteral(String),
}

/// Parse one `<argK>` payload given its `type` attribute and trimmed text.
pub fn parse_operand(arg_type: &str, text: &str) -> Result<Operand, InterpError> {
    match arg_type {
        "var" => Ok(Operand::Var(text.to_string())),
        "label" => Ok(Operand::Label(text.to_string())),
        "type" => {
            let lowered = text.to_lowercase();
            if matches!(lowered.as_str(), "int" | "string" | "bool" | "float") {
                Ok(Operand::TypeLiteral(lowered))
            } else {
                Err(InterpError::MissingValue(format!("invalid type literal '{}'", text)))
            }
        }
        "nil" => {
            if text == "nil" {
                Ok(Operand::Literal(Value::Nil))
            } else {
                Err(InterpError::Syntax(format!("invalid nil literal '{}'", text)))
            }
        }
        "bool" => {
            let b = text.to_lowercase() == "true";
            Ok(Operand::Literal(Value::Bool(b)))
        }
        "int" => text
            .parse::<i64>()
            .map(Value::Int)
            .map(Operand::Literal)
            .map_err(|_| InterpError::Syntax(format!("invalid int literal '{}'", text))),
        "float" => parse_float_literal(text).map(Operand::Literal),
        "string" => Ok(Operand::Literal(Value::Str(decode_string_escapes(text)))),
        other => Err(InterpError::Syntax(format!("unknown operand type '{}'", other))),
    }
}

/// Parse a float literal: try hex-float first (the on-disk form), then
/// decimal, then require the result to re-encode to hex form (spec §4.1).
fn parse_float_literal(text: &str) -> Result<Value, InterpError> {
    let parsed = hexfloat::parse_hex_float(text).or_else(|| text.parse::<f64>().ok());
    match parsed {
        Some(v) => {
            // Round-trip check: re-encoding to hex form must succeed. This
            // always succeeds for a finite f64 produced above, but guards
            // against NaN/inf text sneaking through `str::parse`.
            let _ = hexfloat::format_hex_float(v);
            Ok(Value::Float(v))
        }
        None => Err(InterpError::Syntax(format!("invalid float literal '{}'", text))),
    }
}

/// Decode every `\NNN` (three decimal digits) escape to the Unicode scalar
/// with that codepoint. All other characters pass through unchanged.
pub fn decode_string_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' && i + 3 < chars.len() && chars[i + 1..i + 4].iter().all(|c| c.is_ascii_digit()) {
            let digits: String = chars[i + 1..i + 4].iter().collect();
            if let Ok(code) = digits.parse::<u32>() {
                if let Some(ch) = char::from_u32(code) {
                    out.push(ch);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Split a raw `FRAME@NAME` variable reference. Returns `None` if there is
/// no `@` separator (malformed var text — treated as an ill-formed operand,
/// exit 52, by the caller).
pub fn split_var(raw: &str) -> Option<(&str, &str)> {
    raw.split_once('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escape_sequences() {
        assert_eq!(decode_string_escapes(r"Hello\032World"), "Hello World");
        assert_eq!(decode_string_escapes(r"\010\010"), "\n\n");
        assert_eq!(decode_string_escapes("plain"), "plain");
    }

    #[test]
    fn bool_literal_is_permissive() {
        assert_eq!(parse_operand("bool", "true").unwrap(), Operand::Literal(Value::Bool(true)));
        assert_eq!(parse_operand("bool", "TRUE").unwrap(), Operand::Literal(Value::Bool(true)));
        assert_eq!(parse_operand("bool", "garbage").unwrap(), Operand::Literal(Value::Bool(false)));
    }

    #[test]
    fn int_literal_rejects_non_integer() {
        assert!(parse_operand("int", "3.5").is_err());
        assert_eq!(parse_operand("int", "42").unwrap(), Operand::Literal(Value::Int(42)));
    }

    #[test]
    fn type_literal_must_be_known() {
        assert!(parse_operand("type", "garbage").is_err());
        assert_eq!(parse_operand("type", "nil").unwrap_err().exit_code(), 56);
        assert_eq!(parse_operand("type", "label").unwrap_err().exit_code(), 56);
        assert_eq!(
            parse_operand("type", "Int").unwrap(),
            Operand::TypeLiteral("int".to_string())
        );
    }

    #[test]
    fn var_retains_raw_text() {
        assert_eq!(parse_operand("var", "GF@x").unwrap(), Operand::Var("GF@x".to_string()));
        assert_eq!(split_var("GF@x"), Some(("GF", "x")));
    }
}
