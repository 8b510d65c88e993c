use core::fmt;

/// Return type of an analyzed call, in the host's refinement lattice.
///
/// Displays in the host's type syntax: `'text'`, `non-empty-string`,
/// `string`, `5`, `int<0, max>`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// Exactly this text.
    Literal(String),
    /// Some string of at least one character.
    NonEmptyString,
    /// Any string.
    String,
    /// Exactly this many characters written.
    LiteralInt(u64),
    /// Zero or more characters written.
    NonNegativeInt,
}

impl ReturnType {
    /// The conservative type for a string or counting variant.
    #[inline]
    pub const fn fallback(counts: bool) -> Self {
        if counts {
            Self::NonNegativeInt
        } else {
            Self::String
        }
    }

    #[inline]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// Whether every value of this type is a string of at least one character.
    pub fn is_non_empty_string(&self) -> bool {
        match self {
            Self::Literal(text) => !text.is_empty(),
            Self::NonEmptyString => true,
            Self::String | Self::LiteralInt(_) | Self::NonNegativeInt => false,
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => {
                f.write_str("'")?;
                for c in text.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
            Self::NonEmptyString => f.write_str("non-empty-string"),
            Self::String => f.write_str("string"),
            Self::LiteralInt(n) => write!(f, "{n}"),
            Self::NonNegativeInt => f.write_str("int<0, max>"),
        }
    }
}
