//! Literal-or-type view of call arguments.
//!
//! The host hands every expression to the analyzer in one of two forms: a
//! statically known [`Literal`] value, or an opaque [`ArgType`]. The same
//! abstraction flows through parsing, binding and synthesis, so literal
//! evaluation is not a separate pass.

use std::borrow::Cow;

use crate::render::strip_zeros;

/// The format-string argument of a call.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatArg {
    /// The format is a known literal.
    Literal(String),
    /// The format is built at runtime; nothing is validated.
    Unknown,
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

/// A statically known argument value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// The general static type of an argument whose value is not known.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    /// Any string, possibly empty.
    String,
    /// A string known to hold at least one character.
    NonEmptyString,
    Int,
    Float,
    Bool,
    Null,
    /// Nothing is known.
    Mixed,
    /// One of several types.
    Union(Vec<ArgType>),
}

impl ArgType {
    /// Whether rendering a value of this type as text always yields at least
    /// one character.
    ///
    /// Integers and floats always print a digit. `false` and null print
    /// nothing.
    pub fn renders_non_empty(&self) -> bool {
        match self {
            Self::NonEmptyString | Self::Int | Self::Float => true,
            Self::String | Self::Bool | Self::Null | Self::Mixed => false,
            Self::Union(members) => {
                !members.is_empty() && members.iter().all(Self::renders_non_empty)
            }
        }
    }
}

/// One value argument of a call.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Literal(Literal),
    Typed(ArgType),
}

/// Stand-in for an argument that was never supplied.
pub(crate) static MISSING: Argument = Argument::Typed(ArgType::Mixed);

impl Argument {
    /// The general type of this argument, widening literals.
    pub fn ty(&self) -> Cow<'_, ArgType> {
        match self {
            Self::Typed(ty) => Cow::Borrowed(ty),
            Self::Literal(lit) => Cow::Owned(lit.ty()),
        }
    }
}

impl From<Literal> for Argument {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<ArgType> for Argument {
    fn from(value: ArgType) -> Self {
        Self::Typed(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::Literal(Literal::String(value.to_owned()))
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::Literal(Literal::String(value))
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Self::Literal(Literal::Int(value))
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Self::Literal(Literal::Float(value))
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }
}

/// The value arguments of a call, after the format.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq)]
pub enum Arguments {
    /// Individually known arguments, in call order.
    Listed(Vec<Argument>),
    /// A single array of unknown shape, as taken by the `v*` variants.
    Unknown,
}

impl Arguments {
    /// Argument bound to the 1-based `index`, if it is known to be supplied.
    pub fn get(&self, index: usize) -> Option<&Argument> {
        match self {
            Self::Listed(args) => index.checked_sub(1).and_then(|i| args.get(i)),
            Self::Unknown => None,
        }
    }

    /// Number of supplied arguments, when known.
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Listed(args) => Some(args.len()),
            Self::Unknown => None,
        }
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::Listed(Vec::new())
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(value: Vec<Argument>) -> Self {
        Self::Listed(value)
    }
}

impl Literal {
    /// Widen to the general type.
    pub fn ty(&self) -> ArgType {
        match self {
            Self::String(s) if s.is_empty() => ArgType::String,
            Self::String(_) => ArgType::NonEmptyString,
            Self::Int(_) => ArgType::Int,
            Self::Float(_) => ArgType::Float,
            Self::Bool(_) => ArgType::Bool,
            Self::Null => ArgType::Null,
        }
    }

    /// Text of the value under a string conversion.
    ///
    /// Returns `None` for non-finite floats.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::Int(n) => Some(Cow::Owned(n.to_string())),
            Self::Float(f) => float_text(*f).map(Cow::Owned),
            Self::Bool(true) => Some(Cow::Borrowed("1")),
            Self::Bool(false) | Self::Null => Some(Cow::Borrowed("")),
        }
    }

    /// Value under an integer conversion.
    ///
    /// Floats truncate toward zero, strings use their leading numeric prefix.
    /// Returns `None` when the value has no 64-bit integer image.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) => truncate(*f),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Null => Some(0),
            Self::String(s) => truncate(numeric_prefix(s)),
        }
    }

    /// Value under a floating conversion.
    pub fn to_float(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Float(f) => *f,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Null => 0.0,
            Self::String(s) => numeric_prefix(s),
        }
    }
}

/// Significant digits of a float converted to text.
const FLOAT_TEXT_DIGITS: i32 = 14;

/// Text of a float under the host's conversion: 14 significant digits,
/// trailing zeros removed, exponent form (`1.0E-5`, `1.5E+20`) when the
/// decimal exponent is below -4 or at least 14.
fn float_text(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let scientific = format!("{f:.prec$e}", prec = (FLOAT_TEXT_DIGITS - 1) as usize);
    let (mantissa, exponent) = scientific.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;

    if exponent < -4 || exponent >= FLOAT_TEXT_DIGITS {
        let mantissa = strip_zeros(mantissa);
        let point = if mantissa.contains('.') { "" } else { ".0" };
        let sign = if exponent < 0 { '-' } else { '+' };
        return Some(format!("{mantissa}{point}E{sign}{}", exponent.unsigned_abs()));
    }

    let decimals = usize::try_from(FLOAT_TEXT_DIGITS - 1 - exponent).ok()?;
    Some(strip_zeros(&format!("{f:.decimals$}")).to_owned())
}

fn truncate(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    (f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f.trunc() as i64)
}

/// Longest numeric prefix of `s` after leading whitespace, or `0.0`.
fn numeric_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits(end);
    let mut mantissa = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits(end + 1);
        if frac_end > end + 1 || mantissa {
            mantissa = true;
            end = frac_end;
        }
    }
    if !mantissa {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    s.get(..end).and_then(|p| p.parse().ok()).unwrap_or(0.0)
}
