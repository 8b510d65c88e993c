//! Format string parser.
//!
//! `logos` splits the format into text runs, `%%` escapes and directives. A
//! directive token consumes its own body in a callback: the grammar after the
//! `%` depends on [`QuoteFlag`], which the lexer carries as its extras.
//!
//! ```text
//! %  [argnum $]  [flags]  [width | *]  [. [precision | *]]  conversion
//! ```

use logos::{Lexer, Logos};

use super::{Conversion, Flag, Flags, PlaceholderSpec, Precision, Segment, Width};
use crate::config::QuoteFlag;
use crate::error::{FormatError, NUMERIC_LIMIT};
use crate::span::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = QuoteFlag)]
#[logos(error = FormatError)]
enum Token {
    #[token("%%")]
    Escape,

    #[token("%", directive)]
    Directive(PlaceholderSpec),

    #[regex(r"[^%]+", allow_greedy = true)]
    Text,
}

/// A parsed literal format string.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Placeholders in textual order.
    pub fn placeholders(&self) -> impl Iterator<Item = &PlaceholderSpec> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(spec) => Some(spec),
            Segment::Literal(_) => None,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Parses a literal format string.
///
/// Adjacent text runs and `%%` escapes are merged into one
/// [`Segment::Literal`]. An empty format parses to an empty template.
///
/// # Errors
///
/// Returns the first malformed placeholder: a `%` without a conversion, an
/// unknown conversion character, a zero or oversized number, or a forbidden
/// flag combination.
pub fn parse(format: &str, quote_flag: QuoteFlag) -> Result<Template, FormatError> {
    let mut lexer = Token::lexer_with_extras(format, quote_flag);
    let mut segments = Vec::new();

    while let Some(token) = lexer.next() {
        match token? {
            Token::Escape => push_text(&mut segments, "%"),
            Token::Text => push_text(&mut segments, lexer.slice()),
            Token::Directive(spec) => segments.push(Segment::Placeholder(spec)),
        }
    }

    Ok(Template { segments })
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_owned()));
    }
}

fn directive(lex: &mut Lexer<'_, Token>) -> Result<PlaceholderSpec, FormatError> {
    let start = lex.span().start;
    let mut cursor = Cursor::new(lex.remainder());
    let decoded = decode(&mut cursor, start, lex.extras);
    lex.bump(cursor.pos);
    decoded
}

/// Character cursor over the text following a `%`.
struct Cursor<'a> {
    rest: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.rest.get(self.pos..)?.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        let matched = self.peek() == Some(expected);
        if matched {
            self.pos += expected.len_utf8();
        }
        matched
    }

    /// Reads a run of decimal digits, saturating above `u64::MAX`.
    fn number(&mut self) -> Option<u64> {
        let mut value: Option<u64> = None;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            self.pos += 1;
            value = Some(
                value
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(u64::from(d)),
            );
        }
        value
    }
}

fn decode(
    cur: &mut Cursor<'_>,
    start: usize,
    quote_flag: QuoteFlag,
) -> Result<PlaceholderSpec, FormatError> {
    // `%` itself is one byte
    let span = |cur: &Cursor<'_>| Span::new(start, start + 1 + cur.pos);
    let bounded = |n: u64, what: &'static str, cur: &Cursor<'_>| {
        u32::try_from(n)
            .ok()
            .filter(|n| *n < NUMERIC_LIMIT)
            .ok_or(FormatError::Overflow {
                what,
                span: span(cur),
            })
    };

    let save = cur.pos;
    let argnum = match cur.number() {
        Some(n) if cur.eat('$') => {
            if n == 0 {
                return Err(FormatError::ZeroArgnum { span: span(cur) });
            }
            Some(bounded(n, "argument number", cur)?)
        }
        _ => {
            cur.pos = save;
            None
        }
    };

    let mut flags = Flags::empty();
    let mut pad_char = None;
    loop {
        let flag = match cur.peek() {
            Some('-') => Flag::LeftAlign,
            Some('+') => Flag::ForceSign,
            Some(' ') => Flag::SpaceSign,
            Some('0') => Flag::ZeroPad,
            Some('\'') => match quote_flag {
                QuoteFlag::Grouping => Flag::Grouping,
                QuoteFlag::PadChar => {
                    cur.bump();
                    let c = cur
                        .bump()
                        .ok_or(FormatError::Unterminated { span: span(cur) })?;
                    pad_char = Some(c);
                    continue;
                }
            },
            _ => break,
        };
        cur.bump();
        flags.insert(flag);
    }

    let width = if cur.eat('*') {
        Width::Dynamic
    } else {
        match cur.number() {
            Some(n) => Width::Fixed(bounded(n, "width", cur)?),
            None => Width::None,
        }
    };

    let precision = if cur.eat('.') {
        if cur.eat('*') {
            Some(Precision::Dynamic)
        } else {
            let p = cur.number().unwrap_or(0);
            Some(Precision::Fixed(bounded(p, "precision", cur)?))
        }
    } else {
        None
    };

    let found = cur
        .bump()
        .ok_or(FormatError::Unterminated { span: span(cur) })?;
    let conversion = Conversion::from_char(found).ok_or(FormatError::UnknownConversion {
        found,
        span: span(cur),
    })?;

    let spec = PlaceholderSpec {
        argnum,
        flags,
        pad_char,
        width,
        precision,
        conversion,
        span: span(cur),
    };

    if spec.conversion == Conversion::String
        && spec.flags.contains(Flag::ForceSign)
        && spec.precision == Some(Precision::Fixed(0))
        && spec.is_padded()
    {
        return Err(FormatError::PaddedEmptyString { span: spec.span });
    }

    Ok(spec)
}
