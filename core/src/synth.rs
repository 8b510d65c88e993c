//! Return type synthesis.
//!
//! Each bound segment is typed as a [`Piece`]: exact text, some non-empty
//! text, or any text. The pieces then combine into the call's return type:
//!
//! 1. every piece exact: the literal concatenation,
//! 2. otherwise, some piece non-empty: `non-empty-string`,
//! 3. otherwise: `string`.
//!
//! A placeholder with `*` width or precision is never exact, so a single
//! dynamic marker rules out step 1 for the whole call.

use tracing::trace;

use crate::config::AnalyzerConfig;
use crate::render::{pad_text, render};
use crate::resolve::{Binding, Resolution, Resolved};
use crate::spec::{Conversion, PlaceholderSpec, Precision};
use crate::types::ReturnType;
use crate::value::{ArgType, Argument, Arguments, MISSING};

/// Type of one segment of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Exact(String),
    NonEmpty,
    Any,
}

impl Piece {
    #[inline]
    pub fn is_non_empty(&self) -> bool {
        match self {
            Self::Exact(text) => !text.is_empty(),
            Self::NonEmpty => true,
            Self::Any => false,
        }
    }
}

/// Types every segment of `resolution` against `arguments`.
///
/// Arguments that were not supplied, or that sit in an array of unknown
/// shape, are treated as [`ArgType::Mixed`]. Literal evaluation stops once
/// the exact text produced so far exceeds [`AnalyzerConfig::max_literal_len`]:
/// later placeholders are typed from their arguments' general types.
pub fn synthesize(
    resolution: &Resolution<'_>,
    arguments: &Arguments,
    config: &AnalyzerConfig,
) -> Vec<Piece> {
    let mut spent = 0usize;
    let mut pieces = Vec::with_capacity(resolution.pieces.len());

    for resolved in &resolution.pieces {
        let piece = match resolved {
            Resolved::Text(text) => Piece::Exact((*text).to_owned()),
            Resolved::Placeholder(binding) => {
                let budget = config.max_literal_len.checked_sub(spent);
                let piece = placeholder(binding, arguments, budget);
                trace!(placeholder = %binding.spec, ?budget, ?piece, "synthesized segment");
                piece
            }
        };
        if let Piece::Exact(text) = &piece {
            spent = spent.saturating_add(text.len());
        }
        pieces.push(piece);
    }

    pieces
}

/// Types one placeholder, rendering it only when its fixed width and
/// precision fit in the remaining `budget`.
fn placeholder(binding: &Binding<'_>, arguments: &Arguments, budget: Option<usize>) -> Piece {
    let spec = binding.spec;
    if spec.is_dynamic() {
        return dynamic(spec);
    }

    let argument = arguments.get(binding.argument).unwrap_or(&MISSING);
    let within_budget = budget.is_some_and(|budget| {
        spec.fixed_width() <= budget && spec.fixed_precision().is_none_or(|p| p <= budget)
    });

    if within_budget {
        if spec.conversion == Conversion::String && spec.fixed_precision() == Some(0) {
            return Piece::Exact(pad_text(spec, ""));
        }
        if let Argument::Literal(value) = argument {
            match render(spec, value) {
                // an empty rendering of an argument says nothing beyond its type
                Some(text) if text.is_empty() && spec.conversion == Conversion::String => {}
                Some(text) => return Piece::Exact(text),
                None => {}
            }
        }
    }

    typed(spec, &argument.ty())
}

fn typed(spec: &PlaceholderSpec, ty: &ArgType) -> Piece {
    let zero_precision = spec.fixed_precision() == Some(0);
    let non_empty = match spec.conversion {
        Conversion::String => !zero_precision && ty.renders_non_empty(),
        // `%.0d` renders nothing for zero
        c if c.is_integer() => !zero_precision,
        _ => true,
    };

    if non_empty || spec.fixed_width() > 0 {
        Piece::NonEmpty
    } else {
        Piece::Any
    }
}

fn dynamic(spec: &PlaceholderSpec) -> Piece {
    match spec.conversion {
        Conversion::String => Piece::Any,
        c if c.is_integer() => match spec.precision {
            Some(Precision::Dynamic) | Some(Precision::Fixed(0)) => Piece::Any,
            _ => Piece::NonEmpty,
        },
        _ => Piece::NonEmpty,
    }
}

/// Return type of a string variant.
pub fn text_type(pieces: &[Piece], config: &AnalyzerConfig) -> ReturnType {
    let non_empty = pieces.iter().any(Piece::is_non_empty);
    let abstract_type = if non_empty {
        ReturnType::NonEmptyString
    } else {
        ReturnType::String
    };

    match exact_text(pieces) {
        Some(text) if text.len() <= config.max_literal_len => ReturnType::Literal(text),
        _ => abstract_type,
    }
}

/// Return type of a counting variant.
///
/// The count is exact only when the whole output is literal and no longer
/// than [`AnalyzerConfig::max_literal_len`].
pub fn count_type(pieces: &[Piece], config: &AnalyzerConfig) -> ReturnType {
    if !config.exact_counts {
        return ReturnType::NonNegativeInt;
    }
    pieces
        .iter()
        .map(|piece| match piece {
            Piece::Exact(text) => Some(text.len()),
            Piece::NonEmpty | Piece::Any => None,
        })
        .sum::<Option<usize>>()
        .filter(|&len| len <= config.max_literal_len)
        .map_or(ReturnType::NonNegativeInt, |len| ReturnType::LiteralInt(len as u64))
}

fn exact_text(pieces: &[Piece]) -> Option<String> {
    pieces
        .iter()
        .map(|piece| match piece {
            Piece::Exact(text) => Some(text.as_str()),
            Piece::NonEmpty | Piece::Any => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuoteFlag;
    use crate::resolve::resolve;
    use crate::spec::parse;
    use test_case::test_case;

    fn pieces(format: &str, args: Vec<Argument>) -> Vec<Piece> {
        let template = parse(format, QuoteFlag::PadChar).unwrap();
        let resolution = resolve(&template);
        synthesize(&resolution, &Arguments::from(args), &AnalyzerConfig::DEFAULT)
    }

    fn string_type(format: &str, args: Vec<Argument>) -> ReturnType {
        text_type(&pieces(format, args), &AnalyzerConfig::DEFAULT)
    }

    #[test]
    fn test_literal_arguments_evaluate() {
        assert_eq!(
            string_type("%2$s %1$s", vec!["A".into(), "B".into()]),
            ReturnType::Literal("B A".into())
        );
        assert_eq!(
            string_type("%05.1f|%x", vec![2.3.into(), 255_i64.into()]),
            ReturnType::Literal("002.3|ff".into())
        );
    }

    #[test]
    fn test_zero_precision_string_is_exact() {
        assert_eq!(
            pieces("%0.0s", vec!["abc".into()]),
            vec![Piece::Exact(String::new())]
        );
        assert_eq!(
            pieces("%3.0s", vec![ArgType::String.into()]),
            vec![Piece::Exact("   ".into())]
        );
    }

    #[test]
    fn test_empty_literal_argument_is_widened() {
        assert_eq!(pieces("%s", vec!["".into()]), vec![Piece::Any]);
        assert_eq!(pieces("%s", vec![false.into()]), vec![Piece::Any]);
        assert_eq!(pieces("%2s", vec!["".into()]), vec![Piece::Exact("  ".into())]);
    }

    #[test_case(ArgType::Int, Piece::NonEmpty; "int")]
    #[test_case(ArgType::Float, Piece::NonEmpty; "float")]
    #[test_case(ArgType::NonEmptyString, Piece::NonEmpty; "non empty string")]
    #[test_case(ArgType::String, Piece::Any; "string")]
    #[test_case(ArgType::Mixed, Piece::Any; "mixed")]
    #[test_case(ArgType::Union(vec![ArgType::Int, ArgType::NonEmptyString]), Piece::NonEmpty; "int or non empty string")]
    #[test_case(ArgType::Union(vec![ArgType::Int, ArgType::String]), Piece::Any; "int or string")]
    fn test_string_conversion_of_types(ty: ArgType, expected: Piece) {
        assert_eq!(pieces("%s", vec![ty.into()]), vec![expected]);
    }

    #[test_case("%d"; "signed")]
    #[test_case("%x"; "hex")]
    #[test_case("%c"; "char")]
    #[test_case("%e"; "scientific")]
    #[test_case("%.0f"; "zero precision float")]
    fn test_numeric_conversions_never_empty(format: &str) {
        assert_eq!(pieces(format, vec![ArgType::Mixed.into()]), vec![Piece::NonEmpty]);
    }

    #[test]
    fn test_zero_precision_integer_may_be_empty() {
        assert_eq!(pieces("%.0d", vec![ArgType::Int.into()]), vec![Piece::Any]);
        assert_eq!(
            pieces("%.0d", vec![0_i64.into()]),
            vec![Piece::Exact(String::new())]
        );
        assert_eq!(pieces("%.0d", vec![3_i64.into()]), vec![Piece::Exact("3".into())]);
    }

    #[test_case("%*.0s", vec![0_i64.into(), "abc".into()], Piece::Any; "dynamic width string")]
    #[test_case("%0.*s", vec![0_i64.into(), "abc".into()], Piece::Any; "dynamic precision string")]
    #[test_case("%*d", vec![4_i64.into(), 1_i64.into()], Piece::NonEmpty; "dynamic width int")]
    #[test_case("%.*d", vec![0_i64.into(), 0_i64.into()], Piece::Any; "dynamic precision int")]
    #[test_case("%*f", vec![4_i64.into(), 1.0.into()], Piece::NonEmpty; "dynamic width float")]
    fn test_dynamic_markers(format: &str, args: Vec<Argument>, expected: Piece) {
        assert_eq!(pieces(format, args), vec![expected]);
    }

    #[test]
    fn test_missing_argument_is_mixed() {
        assert_eq!(
            pieces("%s|%d", vec![]),
            vec![Piece::Any, Piece::Exact("|".into()), Piece::NonEmpty]
        );
    }

    #[test]
    fn test_unknown_argument_array() {
        let template = parse("%s-%s", QuoteFlag::PadChar).unwrap();
        let resolution = resolve(&template);
        let pieces = synthesize(&resolution, &Arguments::Unknown, &AnalyzerConfig::DEFAULT);
        assert_eq!(
            text_type(&pieces, &AnalyzerConfig::DEFAULT),
            ReturnType::NonEmptyString
        );
    }

    #[test]
    fn test_combination_rules() {
        assert_eq!(string_type("", vec![]), ReturnType::Literal(String::new()));
        assert_eq!(
            string_type("%s %s", vec!["".into(), "".into()]),
            ReturnType::NonEmptyString
        );
        assert_eq!(
            string_type("%2$s%1$s", vec!["".into(), ArgType::String.into()]),
            ReturnType::String
        );
    }

    #[test]
    fn test_literal_limits() {
        let config = AnalyzerConfig::new().with_max_literal_len(4);
        let template = parse("%10s", QuoteFlag::PadChar).unwrap();
        let resolution = resolve(&template);
        let args = Arguments::from(vec![Argument::from("ab")]);
        let pieces = synthesize(&resolution, &args, &config);
        assert_eq!(pieces, vec![Piece::NonEmpty]);

        let long = vec![Piece::Exact("abc".into()), Piece::Exact("de".into())];
        assert_eq!(text_type(&long, &config), ReturnType::NonEmptyString);
    }

    #[test]
    fn test_literal_budget_is_shared() {
        let config = AnalyzerConfig::new().with_max_literal_len(10);
        let template = parse("%4s%4s%4s%4s", QuoteFlag::PadChar).unwrap();
        let resolution = resolve(&template);
        let args = Arguments::from(vec![Argument::from("a"); 4]);
        let pieces = synthesize(&resolution, &args, &config);
        assert_eq!(pieces, vec![
            Piece::Exact("   a".into()),
            Piece::Exact("   a".into()),
            Piece::NonEmpty,
            Piece::NonEmpty,
        ]);
        assert_eq!(text_type(&pieces, &config), ReturnType::NonEmptyString);
        assert_eq!(count_type(&pieces, &config), ReturnType::NonNegativeInt);
    }

    #[test]
    fn test_long_run_of_wide_placeholders() {
        let format = "%4096s".repeat(10_000);
        let template = parse(&format, QuoteFlag::PadChar).unwrap();
        let resolution = resolve(&template);
        let args = Arguments::from(vec![Argument::from("a"); 10_000]);
        let config = AnalyzerConfig::DEFAULT;
        let pieces = synthesize(&resolution, &args, &config);

        let materialized: usize = pieces
            .iter()
            .map(|piece| match piece {
                Piece::Exact(text) => text.len(),
                Piece::NonEmpty | Piece::Any => 0,
            })
            .sum();
        assert_eq!(materialized, config.max_literal_len);
        assert_eq!(text_type(&pieces, &config), ReturnType::NonEmptyString);
        assert_eq!(count_type(&pieces, &config), ReturnType::NonNegativeInt);
    }

    #[test]
    fn test_count_type() {
        let config = AnalyzerConfig::DEFAULT;
        let exact = vec![Piece::Exact("héllo".into())];
        assert_eq!(count_type(&exact, &config), ReturnType::LiteralInt(6));
        assert_eq!(
            count_type(&[Piece::Exact("a".into()), Piece::NonEmpty], &config),
            ReturnType::NonNegativeInt
        );
        assert_eq!(
            count_type(&exact, &config.with_exact_counts(false)),
            ReturnType::NonNegativeInt
        );
        assert_eq!(count_type(&[], &config), ReturnType::LiteralInt(0));
        assert_eq!(
            count_type(&exact, &config.with_max_literal_len(5)),
            ReturnType::NonNegativeInt
        );
    }
}
