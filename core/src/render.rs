//! Literal evaluation of single placeholders.
//!
//! Renders a known argument exactly as the C library would, with the `C`
//! locale: digit grouping has no separator there, so [`Flag::Grouping`]
//! renders nothing. Width and precision must be fixed; callers handle `*`.

use std::iter::repeat_n;

use crate::spec::{Conversion, Flag, PlaceholderSpec};
use crate::value::Literal;

/// Default precision of the floating conversions.
const FLOAT_PRECISION: usize = 6;

/// Renders `value` under `spec`.
///
/// Returns `None` when the value has no exact rendering: non-finite floats
/// or `%c` outside ASCII.
pub fn render(spec: &PlaceholderSpec, value: &Literal) -> Option<String> {
    match spec.conversion {
        Conversion::String => {
            let text = value.to_text()?;
            Some(match spec.fixed_precision() {
                Some(p) => pad_text(spec, &text.chars().take(p).collect::<String>()),
                None => pad_text(spec, &text),
            })
        }
        Conversion::Char => {
            let c = u8::try_from(value.to_int()?)
                .ok()
                .filter(u8::is_ascii)
                .map(char::from)?;
            Some(pad_text(spec, c.encode_utf8(&mut [0; 4])))
        }
        conversion if conversion.is_integer() => Some(render_integer(spec, value.to_int()?)),
        _ => render_float(spec, value.to_float()),
    }
}

/// Pads `text` to the field width of `spec`.
///
/// Left-aligned text is filled on the right with the pad character or
/// spaces. Otherwise the fill goes on the left: the pad character, `0` under
/// [`Flag::ZeroPad`], or spaces.
pub fn pad_text(spec: &PlaceholderSpec, text: &str) -> String {
    let fill = spec.fixed_width().saturating_sub(text.chars().count());
    let mut out = String::with_capacity(text.len() + fill);
    if spec.flags.contains(Flag::LeftAlign) {
        out.push_str(text);
        out.extend(repeat_n(spec.pad_char.unwrap_or(' '), fill));
    } else {
        let c = match spec.pad_char {
            Some(c) => c,
            None if spec.flags.contains(Flag::ZeroPad) => '0',
            None => ' ',
        };
        out.extend(repeat_n(c, fill));
        out.push_str(text);
    }
    out
}

/// Pads a number split into `sign` and `digits`.
///
/// Zero fill goes between the sign and the digits, any other left fill
/// before the sign.
fn pad_number(spec: &PlaceholderSpec, sign: &str, digits: &str, zero_fill: bool) -> String {
    let len = sign.len() + digits.chars().count();
    let fill = spec.fixed_width().saturating_sub(len);
    let mut out = String::with_capacity(len + fill);

    if spec.flags.contains(Flag::LeftAlign) {
        out.push_str(sign);
        out.push_str(digits);
        out.extend(repeat_n(spec.pad_char.unwrap_or(' '), fill));
    } else if let Some(c) = spec.pad_char {
        out.extend(repeat_n(c, fill));
        out.push_str(sign);
        out.push_str(digits);
    } else if zero_fill && spec.flags.contains(Flag::ZeroPad) {
        out.push_str(sign);
        out.extend(repeat_n('0', fill));
        out.push_str(digits);
    } else {
        out.extend(repeat_n(' ', fill));
        out.push_str(sign);
        out.push_str(digits);
    }
    out
}

fn sign(spec: &PlaceholderSpec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if !spec.conversion.is_signed() {
        ""
    } else if spec.flags.contains(Flag::ForceSign) {
        "+"
    } else if spec.flags.contains(Flag::SpaceSign) {
        " "
    } else {
        ""
    }
}

fn render_integer(spec: &PlaceholderSpec, value: i64) -> String {
    let unsigned = value as u64;
    let (negative, digits) = match spec.conversion {
        Conversion::SignedInt => (value < 0, value.unsigned_abs().to_string()),
        Conversion::Octal => (false, format!("{unsigned:o}")),
        Conversion::HexLower => (false, format!("{unsigned:x}")),
        Conversion::HexUpper => (false, format!("{unsigned:X}")),
        _ => (false, unsigned.to_string()),
    };

    // precision is a minimum digit count, and turns off zero fill
    let digits = match spec.fixed_precision() {
        Some(0) if value == 0 => String::new(),
        Some(p) if p > digits.len() => {
            let mut padded: String = repeat_n('0', p - digits.len()).collect();
            padded.push_str(&digits);
            padded
        }
        _ => digits,
    };

    pad_number(spec, sign(spec, negative), &digits, spec.precision.is_none())
}

fn render_float(spec: &PlaceholderSpec, value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let precision = spec.fixed_precision().unwrap_or(FLOAT_PRECISION);
    let magnitude = value.abs();

    let digits = match spec.conversion {
        Conversion::Scientific { upper } => scientific(magnitude, precision, upper)?,
        Conversion::General { upper } => general(magnitude, precision, upper)?,
        _ => format!("{magnitude:.precision$}"),
    };

    Some(pad_number(spec, sign(spec, value.is_sign_negative()), &digits, true))
}

/// `d.ddde±XX` with at least two exponent digits.
fn scientific(magnitude: f64, precision: usize, upper: bool) -> Option<String> {
    let (mantissa, exponent) = split_exponent(magnitude, precision)?;
    Some(join_exponent(&mantissa, exponent, upper))
}

/// `%g`: scientific when the exponent is below -4 or at least the
/// precision, fixed otherwise, with trailing zeros removed.
fn general(magnitude: f64, precision: usize, upper: bool) -> Option<String> {
    let precision = precision.max(1);
    let (mantissa, exponent) = split_exponent(magnitude, precision - 1)?;

    let Ok(limit) = i32::try_from(precision) else {
        return None;
    };
    if exponent < -4 || exponent >= limit {
        return Some(join_exponent(strip_zeros(&mantissa), exponent, upper));
    }

    let decimals = usize::try_from(limit - 1 - exponent).ok()?;
    Some(strip_zeros(&format!("{magnitude:.decimals$}")).to_owned())
}

fn split_exponent(magnitude: f64, precision: usize) -> Option<(String, i32)> {
    let formatted = format!("{magnitude:.precision$e}");
    let (mantissa, exponent) = formatted.split_once('e')?;
    Some((mantissa.to_owned(), exponent.parse().ok()?))
}

fn join_exponent(mantissa: &str, exponent: i32, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exponent.unsigned_abs())
}

/// Removes trailing fractional zeros, and the point if nothing follows it.
pub(crate) fn strip_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
