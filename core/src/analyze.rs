//! Call-site entry point.
//!
//! [`Analyzer::analyze`] is a pure function of its inputs: it reads the
//! immutable [`AnalyzerConfig`] and the [`FormatCall`], and returns an
//! [`Analysis`]. No state survives a call, so one analyzer may be shared
//! across threads.
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/pipeline.mmd"))]

use core::fmt;

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::diagnostic::{Diagnostic, Validator};
use crate::resolve::{Arity, resolve};
use crate::spec::parse;
use crate::synth::{count_type, synthesize, text_type};
use crate::types::ReturnType;
use crate::value::{Arguments, FormatArg};

/// The printf-family functions the analyzer understands.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFunction {
    Sprintf,
    Vsprintf,
    Printf,
    Vprintf,
    Fprintf,
    Vfprintf,
}

impl FormatFunction {
    pub const ALL: [Self; 6] = [
        Self::Sprintf,
        Self::Vsprintf,
        Self::Printf,
        Self::Vprintf,
        Self::Fprintf,
        Self::Vfprintf,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sprintf => "sprintf",
            Self::Vsprintf => "vsprintf",
            Self::Printf => "printf",
            Self::Vprintf => "vprintf",
            Self::Fprintf => "fprintf",
            Self::Vfprintf => "vfprintf",
        }
    }

    /// Looks up a function by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
    }

    /// Whether the call returns the number of characters written rather
    /// than the text.
    pub const fn counts_output(self) -> bool {
        !matches!(self, Self::Sprintf | Self::Vsprintf)
    }

    /// Whether the values arrive as a single array.
    pub const fn takes_array(self) -> bool {
        matches!(self, Self::Vsprintf | Self::Vprintf | Self::Vfprintf)
    }

    /// 1-based position of the format among the call's parameters.
    ///
    /// The stream parameter of `fprintf` comes first and is not part of
    /// [`FormatCall::arguments`].
    pub const fn format_position(self) -> usize {
        match self {
            Self::Fprintf | Self::Vfprintf => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for FormatFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One call site, as seen by the analyzer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCall {
    pub function: FormatFunction,
    pub format: FormatArg,
    /// Value arguments after the format.
    pub arguments: Arguments,
}

impl FormatCall {
    pub fn new(
        function: FormatFunction,
        format: impl Into<FormatArg>,
        arguments: impl Into<Arguments>,
    ) -> Self {
        Self {
            function,
            format: format.into(),
            arguments: arguments.into(),
        }
    }
}

/// Result of analyzing one call.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub return_type: ReturnType,
    /// Parse issues first, then argument counts, then structural issues.
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    fn conservative(function: FormatFunction) -> Self {
        Self {
            return_type: ReturnType::fallback(function.counts_output()),
            diagnostics: Vec::new(),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Analyzes printf-family calls under a fixed configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub const fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Computes the return type of `call` and the diagnostics it raises.
    ///
    /// Never fails: a format that is unknown, oversized or malformed yields
    /// the conservative type of the function.
    pub fn analyze(&self, call: &FormatCall) -> Analysis {
        let function = call.function;
        let format = match &call.format {
            FormatArg::Literal(format) => format,
            FormatArg::Unknown => {
                debug!(%function, "format is not a literal");
                return Analysis::conservative(function);
            }
        };

        if format.len() > self.config.max_format_len {
            debug!(
                %function,
                len = format.len(),
                limit = self.config.max_format_len,
                "format exceeds length limit"
            );
            return Analysis::conservative(function);
        }

        let mut validator = Validator::new(function);
        let template = match parse(format, self.config.quote_flag) {
            Ok(template) => template,
            Err(error) => {
                debug!(%function, %error, "invalid format");
                validator.format_error(&error);
                return Analysis {
                    return_type: ReturnType::fallback(function.counts_output()),
                    diagnostics: validator.finish(),
                };
            }
        };

        let resolution = resolve(&template);
        if let Some(supplied) = call.arguments.count() {
            let arity = resolution.arity(supplied);
            if supplied == 0
                && arity == Arity::Satisfied
                && self.config.require_values
                && !function.takes_array()
            {
                validator.missing_values();
            }
            validator.arity(arity);
        }

        let pieces = synthesize(&resolution, &call.arguments, &self.config);
        let return_type = if function.counts_output() {
            count_type(&pieces, &self.config)
        } else {
            text_type(&pieces, &self.config)
        };
        let diagnostics = validator.finish();

        debug!(
            %function,
            %return_type,
            placeholders = resolution.placeholders,
            diagnostics = diagnostics.len(),
            "analyzed call"
        );

        Analysis {
            return_type,
            diagnostics,
        }
    }
}

/// Analyzes `call` with [`AnalyzerConfig::DEFAULT`].
pub fn analyze(call: &FormatCall) -> Analysis {
    Analyzer::new(AnalyzerConfig::DEFAULT).analyze(call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::value::Argument;

    #[test]
    fn test_function_names() {
        for function in FormatFunction::ALL {
            assert_eq!(FormatFunction::from_name(function.name()), Some(function));
        }
        assert_eq!(FormatFunction::from_name("SPRINTF"), Some(FormatFunction::Sprintf));
        assert_eq!(FormatFunction::from_name("snprintf"), None);
    }

    #[test]
    fn test_function_shape() {
        assert!(!FormatFunction::Vsprintf.counts_output());
        assert!(FormatFunction::Fprintf.counts_output());
        assert!(FormatFunction::Vprintf.takes_array());
        assert!(!FormatFunction::Printf.takes_array());
        assert_eq!(FormatFunction::Vfprintf.format_position(), 2);
    }

    #[test]
    fn test_unknown_format_short_circuits() {
        let call = FormatCall::new(FormatFunction::Sprintf, FormatArg::Unknown, vec![]);
        assert_eq!(analyze(&call), Analysis::conservative(FormatFunction::Sprintf));

        let call = FormatCall::new(FormatFunction::Printf, FormatArg::Unknown, vec![]);
        assert_eq!(analyze(&call).return_type, ReturnType::NonNegativeInt);
    }

    #[test]
    fn test_parse_failure_skips_arity() {
        let call = FormatCall::new(FormatFunction::Sprintf, "%0$s %s", Vec::<Argument>::new());
        let analysis = analyze(&call);
        assert_eq!(analysis.return_type, ReturnType::String);
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].kind, DiagnosticKind::InvalidArgument);
    }

    #[test]
    fn test_oversized_format_is_unknown() {
        let analyzer = Analyzer::new(AnalyzerConfig::new().with_max_format_len(4));
        let call = FormatCall::new(FormatFunction::Sprintf, "%s %s %s", vec![Argument::from("a")]);
        let analysis = analyzer.analyze(&call);
        assert!(analysis.is_valid());
        assert_eq!(analysis.return_type, ReturnType::String);
    }

    #[test]
    fn test_format_only_call() {
        let call = FormatCall::new(FormatFunction::Sprintf, "hello", Vec::<Argument>::new());
        let analysis = analyze(&call);
        assert_eq!(analysis.return_type, ReturnType::Literal("hello".into()));
        assert_eq!(analysis.diagnostics[0].kind, DiagnosticKind::TooFewArguments);

        let call = FormatCall::new(FormatFunction::Vsprintf, "hello", Vec::<Argument>::new());
        assert!(analyze(&call).is_valid());

        let relaxed = Analyzer::new(AnalyzerConfig::new().with_require_values(false));
        let call = FormatCall::new(FormatFunction::Sprintf, "hello", Vec::<Argument>::new());
        assert!(relaxed.analyze(&call).is_valid());
    }
}
