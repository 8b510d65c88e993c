#![no_main]

use fmtype::{Analyzer, AnalyzerConfig, FormatCall, QuoteFlag, ReturnType};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    quote_flag: QuoteFlag,
    max_literal_len: u16,
    call: FormatCall,
}

fuzz_target!(|input: Input| {
    let config = AnalyzerConfig::new()
        .with_quote_flag(input.quote_flag)
        .with_max_literal_len(usize::from(input.max_literal_len));
    let analysis = Analyzer::new(config).analyze(&input.call);

    match analysis.return_type {
        ReturnType::Literal(text) => assert!(text.len() <= config.max_literal_len),
        ReturnType::LiteralInt(_) | ReturnType::NonNegativeInt => {
            assert!(input.call.function.counts_output());
        }
        ReturnType::NonEmptyString | ReturnType::String => {
            assert!(!input.call.function.counts_output());
        }
    }
});
