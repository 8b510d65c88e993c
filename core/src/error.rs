//! Format string errors.
//!
//! [`FormatError`] is produced by the parser and doubles as the error type of
//! the `logos` lexer that splits a format into segments. Every variant except
//! [`FormatError::Unknown`] carries the span of the offending placeholder,
//! measured from its `%`.

use thiserror::Error;

use crate::span::Span;

/// Largest argnum, width or precision accepted by the grammar.
pub const NUMERIC_LIMIT: u32 = i32::MAX as u32;

#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatError {
    #[default]
    #[error("unrecognized format text")]
    Unknown,

    /// The text ended inside a placeholder, e.g. a bare trailing `%`.
    #[error("placeholder at {span} is missing a conversion")]
    Unterminated { span: Span },

    #[error("unknown conversion `{found}` at {span}")]
    UnknownConversion { found: char, span: Span },

    #[error("argument number at {span} must be greater than zero")]
    ZeroArgnum { span: Span },

    /// An argnum, width or precision above [`NUMERIC_LIMIT`].
    #[error("{what} at {span} must be less than {limit}", limit = NUMERIC_LIMIT)]
    Overflow { what: &'static str, span: Span },

    /// Padding and a forced sign on a string conversion cut to zero characters.
    #[error("placeholder at {span} pads a signed string of precision zero")]
    PaddedEmptyString { span: Span },
}

impl FormatError {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Unknown => None,
            Self::Unterminated { span }
            | Self::UnknownConversion { span, .. }
            | Self::ZeroArgnum { span }
            | Self::Overflow { span, .. }
            | Self::PaddedEmptyString { span } => Some(*span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let span = Span::new(1, 3);
        assert_eq!(
            FormatError::UnknownConversion { found: '"', span }.to_string(),
            "unknown conversion `\"` at 1..3"
        );
        assert_eq!(
            FormatError::Overflow { what: "width", span }.to_string(),
            "width at 1..3 must be less than 2147483647"
        );
        assert_eq!(
            FormatError::Unterminated { span }.to_string(),
            "placeholder at 1..3 is missing a conversion"
        );
    }

    #[test]
    fn test_error_span() {
        assert_eq!(FormatError::Unknown.span(), None);
        assert_eq!(
            FormatError::ZeroArgnum {
                span: Span::new(0, 3)
            }
            .span(),
            Some(Span::new(0, 3))
        );
    }
}
