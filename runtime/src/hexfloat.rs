//! # C99 hex-float codec
//!
//! IPPcode23 floats are written on the wire and on `WRITE` output in C99
//! `%a` hex-float form (e.g. `0x1.999999999999ap-4`), matching Python's
//! `float.fromhex`/`float.hex`, which the reference implementation
//! (`examples/original_source/interpret.py`) uses directly. Rust's standard
//! library has no built-in hex-float parser/formatter, so this module
//! implements both directions over `f64::to_bits`/`from_bits`.

/// Parse a C99-style hex float (`[sign]0x1.fraction[p[sign]exp]`, or the
/// bare-integer hex form `0x10p0`) into an `f64`. Returns `None` if `text`
/// is not a well-formed hex float.
pub fn parse_hex_float(text: &str) -> Option<f64> {
    let text = text.trim();
    let (neg, rest) = match text.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let rest = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"))?;

    let (mantissa_part, exp_part) = match rest.find(['p', 'P']) {
        Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
        None => (rest, None),
    };

    let (int_part, frac_part) = match mantissa_part.find('.') {
        Some(idx) => (&mantissa_part[..idx], &mantissa_part[idx + 1..]),
        None => (mantissa_part, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut mantissa: f64 = 0.0;
    for c in int_part.chars() {
        let digit = c.to_digit(16)? as f64;
        mantissa = mantissa * 16.0 + digit;
    }
    let mut frac_scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        let digit = c.to_digit(16)? as f64;
        mantissa += digit * frac_scale;
        frac_scale /= 16.0;
    }

    let exponent: i32 = match exp_part {
        Some(e) if !e.is_empty() => e.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };

    let value = mantissa * 2f64.powi(exponent);
    Some(if neg { -value } else { value })
}

/// Format an `f64` as a C99 hex float, matching Python's `float.hex()`.
///
/// Produces normalized form `[-]0x1.hhhhhhhhhhhhhp[+-]e` for finite nonzero
/// values, `0x0.0p+0` / `-0x0.0p+0` for zero, and `inf`/`nan` spellings for
/// the non-finite cases (Python spells these `inf`/`-inf`/`nan`).
pub fn format_hex_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf".to_string() } else { "inf".to_string() };
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value == 0.0 {
        return format!("{}0x0.0p+0", sign);
    }

    let bits = value.to_bits();
    let raw_exp = ((bits >> 52) & 0x7ff) as i64;
    let raw_mantissa = bits & 0x000f_ffff_ffff_ffff;

    let (leading, exponent, mantissa) = if raw_exp == 0 {
        // Subnormal: no implicit leading 1, exponent pinned to -1022.
        (0u64, -1022i64, raw_mantissa)
    } else {
        (1u64, raw_exp - 1023, raw_mantissa)
    };

    // 52 mantissa bits = 13 hex digits.
    let mantissa_hex = format!("{:013x}", mantissa);
    let trimmed = mantissa_hex.trim_end_matches('0');
    let frac = if trimmed.is_empty() { "0" } else { trimmed };

    format!("{}0x{}.{}p{:+}", sign, leading, frac, exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_common_values() {
        for v in [0.0_f64, -0.0, 1.0, -1.0, 0.1, 123456.789, 1e300, 1e-300, std::f64::consts::PI] {
            let text = format_hex_float(v);
            let back = parse_hex_float(&text).expect("reparse");
            assert_eq!(back.to_bits(), v.to_bits(), "round-trip failed for {v} via {text}");
        }
    }

    #[test]
    fn known_encoding() {
        // 0.1 in IEEE-754 double is 0x1.999999999999ap-4 (Python float.hex(0.1)).
        assert_eq!(format_hex_float(0.1), "0x1.999999999999ap-4");
        assert_eq!(parse_hex_float("0x1.999999999999ap-4").unwrap().to_bits(), 0.1_f64.to_bits());
    }

    #[test]
    fn rejects_non_hex_float() {
        assert_eq!(parse_hex_float("not a float"), None);
        assert_eq!(parse_hex_float("123.456"), None);
    }

    #[test]
    fn accepts_decimal_looking_hex_literal() {
        // 0x10p0 == 16.0
        assert_eq!(parse_hex_float("0x10p0"), Some(16.0));
    }
}
