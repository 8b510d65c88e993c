//! Diagnostics reported against a call site.
//!
//! Diagnostics are data, not errors: the host attaches them to the call's
//! source location and keeps going with the synthesized return type.

use core::fmt;

use crate::analyze::FormatFunction;
use crate::error::FormatError;
use crate::resolve::Arity;
use crate::span::Span;

/// Issue category, matching the host's issue names.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    TooFewArguments,
    TooManyArguments,
    InvalidArgument,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TooFewArguments => "TooFewArguments",
            Self::TooManyArguments => "TooManyArguments",
            Self::InvalidArgument => "InvalidArgument",
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Location inside the format string, when the issue is in the format.
    pub span: Option<Span>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Reporting phase; diagnostics are emitted in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Parse,
    Arity,
    Structure,
}

/// Collects the diagnostics of one call and orders them by phase.
#[derive(Debug)]
pub struct Validator {
    function: FormatFunction,
    reported: Vec<(Phase, Diagnostic)>,
}

impl Validator {
    pub fn new(function: FormatFunction) -> Self {
        Self {
            function,
            reported: Vec::new(),
        }
    }

    /// Records a malformed format.
    pub fn format_error(&mut self, error: &FormatError) {
        let message = format!(
            "argument {} of {} is not a valid format: {error}",
            self.function.format_position(),
            self.function
        );
        self.push(Phase::Parse, DiagnosticKind::InvalidArgument, message, error.span());
    }

    /// Records the outcome of the arity check.
    pub fn arity(&mut self, arity: Arity) {
        let function = self.function;
        match arity {
            Arity::Satisfied => {}
            Arity::TooFew { required, supplied } => self.push(
                Phase::Arity,
                DiagnosticKind::TooFewArguments,
                format!("too few arguments for {function}: format expects {required}, got {supplied}"),
                None,
            ),
            Arity::TooMany { required, supplied } => self.push(
                Phase::Arity,
                DiagnosticKind::TooManyArguments,
                format!("too many arguments for {function}: format expects {required}, got {supplied}"),
                None,
            ),
            Arity::Unexpected { supplied } => self.push(
                Phase::Structure,
                DiagnosticKind::InvalidArgument,
                format!(
                    "argument {} of {function} contains no placeholders, but {supplied} value \
                     argument(s) were supplied",
                    function.format_position()
                ),
                None,
            ),
        }
    }

    /// Records a call that passes nothing but the format.
    pub fn missing_values(&mut self) {
        let message = format!(
            "too few arguments for {}: expected at least one value after the format",
            self.function
        );
        self.push(Phase::Arity, DiagnosticKind::TooFewArguments, message, None);
    }

    fn push(&mut self, phase: Phase, kind: DiagnosticKind, message: String, span: Option<Span>) {
        self.reported.push((phase, Diagnostic {
            kind,
            message,
            span,
        }));
    }

    /// The recorded diagnostics, parse issues first, then arity, then
    /// structure. Order within a phase is preserved.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.reported.sort_by_key(|(phase, _)| *phase);
        self.reported.into_iter().map(|(_, diagnostic)| diagnostic).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_orders_by_phase() {
        let mut validator = Validator::new(FormatFunction::Sprintf);
        validator.arity(Arity::Unexpected { supplied: 1 });
        validator.arity(Arity::TooMany {
            required: 1,
            supplied: 2,
        });
        validator.format_error(&FormatError::ZeroArgnum {
            span: Span::new(0, 3),
        });

        let kinds: Vec<_> = validator.finish().into_iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![
            DiagnosticKind::InvalidArgument,
            DiagnosticKind::TooManyArguments,
            DiagnosticKind::InvalidArgument,
        ]);
    }

    #[test]
    fn test_validator_satisfied_is_silent() {
        let mut validator = Validator::new(FormatFunction::Printf);
        validator.arity(Arity::Satisfied);
        assert!(validator.finish().is_empty());
    }

    #[test]
    fn test_diagnostic_messages() {
        let mut validator = Validator::new(FormatFunction::Printf);
        validator.arity(Arity::TooFew {
            required: 2,
            supplied: 1,
        });
        validator.missing_values();
        let diagnostics = validator.finish();
        assert_eq!(
            diagnostics[0].to_string(),
            "TooFewArguments: too few arguments for printf: format expects 2, got 1"
        );
        assert_eq!(
            diagnostics[1].message,
            "too few arguments for printf: expected at least one value after the format"
        );
        assert_eq!(diagnostics[1].span, None);
    }

    #[test]
    fn test_structure_message_names_format_position() {
        let mut validator = Validator::new(FormatFunction::Fprintf);
        validator.arity(Arity::Unexpected { supplied: 2 });
        assert_eq!(
            validator.finish()[0].message,
            "argument 2 of fprintf contains no placeholders, but 2 value argument(s) were supplied"
        );
    }

    #[test]
    fn test_format_error_carries_span() {
        let mut validator = Validator::new(FormatFunction::Sprintf);
        validator.format_error(&FormatError::UnknownConversion {
            found: '"',
            span: Span::new(1, 3),
        });
        let diagnostics = validator.finish();
        assert_eq!(diagnostics[0].span, Some(Span::new(1, 3)));
        assert_eq!(
            diagnostics[0].message,
            "argument 1 of sprintf is not a valid format: unknown conversion `\"` at 1..3"
        );
    }
}
