#![no_main]

use fmtype::{QuoteFlag, Segment, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for quote_flag in [QuoteFlag::PadChar, QuoteFlag::Grouping] {
            match parse(s, quote_flag) {
                Ok(template) => {
                    for segment in &template.segments {
                        if let Segment::Placeholder(spec) = segment {
                            let directive = spec.span.slice(s);
                            assert!(directive.is_some_and(|d| d.starts_with('%')));
                            // the canonical form parses back to the same placeholder
                            let canonical = spec.to_string();
                            let reparsed = parse(&canonical, quote_flag);
                            assert!(reparsed.is_ok(), "{canonical}");
                        }
                    }
                }
                Err(error) => {
                    if let Some(span) = error.span() {
                        assert!(span.slice(s).is_some());
                    }
                }
            }
        }
    }
});
