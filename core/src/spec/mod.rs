//! Format string model.
//!
//! A literal format is parsed into an ordered sequence of [`Segment`]s: runs
//! of literal text and [`PlaceholderSpec`] directives. Segment order matters,
//! since placeholders without an explicit argnum consume arguments
//! positionally.
//!
//! ```text
//! "%2$s: %-5d%%"
//!   ├── Placeholder { argnum: 2, conversion: String }
//!   ├── Literal(": ")
//!   ├── Placeholder { flags: LeftAlign, width: 5, conversion: SignedInt }
//!   └── Literal("%")
//! ```

mod parser;

use core::fmt;

pub use parser::{Template, parse};

use crate::span::Span;

/// One piece of a parsed format string.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output as-is. `%%` contributes a literal `%`.
    Literal(String),
    /// A `%...` directive.
    Placeholder(PlaceholderSpec),
}

/// A single placeholder flag.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `-`
    LeftAlign,
    /// `0`
    ZeroPad,
    /// `+`
    ForceSign,
    /// ` `
    SpaceSign,
    /// `'`, when configured as the grouping flag.
    Grouping,
}

impl Flag {
    const ALL: [Flag; 5] = [
        Flag::LeftAlign,
        Flag::ZeroPad,
        Flag::ForceSign,
        Flag::SpaceSign,
        Flag::Grouping,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }

    pub const fn symbol(self) -> char {
        match self {
            Flag::LeftAlign => '-',
            Flag::ZeroPad => '0',
            Flag::ForceSign => '+',
            Flag::SpaceSign => ' ',
            Flag::Grouping => '\'',
        }
    }
}

/// Set of [`Flag`]s on a placeholder.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn contains(&self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    #[inline]
    pub const fn with(mut self, flag: Flag) -> Self {
        self.0 |= flag.bit();
        self
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

/// Minimum field width.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Width {
    /// No width given; same as `Fixed(0)`.
    #[default]
    None,
    Fixed(u32),
    /// `*`: taken from the argument list.
    Dynamic,
}

/// Precision after `.`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Fixed(u32),
    /// `.*`: taken from the argument list.
    Dynamic,
}

/// Rendering kind selected by the conversion character.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// `s`
    String,
    /// `c`
    Char,
    /// `d`, `i`
    SignedInt,
    /// `u`
    UnsignedInt,
    /// `o`
    Octal,
    /// `x`
    HexLower,
    /// `X`
    HexUpper,
    /// `f`, `F`
    Fixed,
    /// `e`, `E`
    Scientific { upper: bool },
    /// `g`, `G`
    General { upper: bool },
}

impl Conversion {
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            's' => Self::String,
            'c' => Self::Char,
            'd' | 'i' => Self::SignedInt,
            'u' => Self::UnsignedInt,
            'o' => Self::Octal,
            'x' => Self::HexLower,
            'X' => Self::HexUpper,
            'f' | 'F' => Self::Fixed,
            'e' => Self::Scientific { upper: false },
            'E' => Self::Scientific { upper: true },
            'g' => Self::General { upper: false },
            'G' => Self::General { upper: true },
            _ => return None,
        })
    }

    /// Integer conversions: `d i u o x X`.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::SignedInt | Self::UnsignedInt | Self::Octal | Self::HexLower | Self::HexUpper
        )
    }

    /// Floating conversions: `f F e E g G`.
    pub const fn is_float(&self) -> bool {
        matches!(
            self,
            Self::Fixed | Self::Scientific { .. } | Self::General { .. }
        )
    }

    /// Conversions that honor `+` and ` `.
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::SignedInt) || self.is_float()
    }
}

/// A parsed `%...` directive.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpec {
    /// Explicit 1-based argument index from `n$`.
    pub argnum: Option<u32>,
    pub flags: Flags,
    /// Explicit pad character from `'c`.
    pub pad_char: Option<char>,
    pub width: Width,
    pub precision: Option<Precision>,
    pub conversion: Conversion,
    /// Location of the directive, `%` through the conversion character.
    pub span: Span,
}

impl PlaceholderSpec {
    /// A bare `%<conversion>` placeholder.
    pub const fn new(conversion: Conversion) -> Self {
        Self {
            argnum: None,
            flags: Flags::empty(),
            pad_char: None,
            width: Width::None,
            precision: None,
            conversion,
            span: Span::new(0, 0),
        }
    }

    /// Whether width or precision is read from the argument list.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.width == Width::Dynamic || self.precision == Some(Precision::Dynamic)
    }

    /// The fixed field width, `0` when absent or dynamic.
    #[inline]
    pub fn fixed_width(&self) -> usize {
        match self.width {
            Width::Fixed(w) => w as usize,
            Width::None | Width::Dynamic => 0,
        }
    }

    /// The fixed precision, if one was given.
    #[inline]
    pub fn fixed_precision(&self) -> Option<usize> {
        match self.precision {
            Some(Precision::Fixed(p)) => Some(p as usize),
            Some(Precision::Dynamic) | None => None,
        }
    }

    /// Whether the fill goes on the left with something other than spaces.
    #[inline]
    pub fn is_padded(&self) -> bool {
        self.pad_char.is_some() || self.flags.contains(Flag::ZeroPad)
    }
}

impl fmt::Display for PlaceholderSpec {
    /// Writes the directive back in canonical form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("%")?;
        if let Some(n) = self.argnum {
            write!(f, "{n}$")?;
        }
        for flag in self.flags.iter() {
            write!(f, "{}", flag.symbol())?;
        }
        if let Some(c) = self.pad_char {
            write!(f, "'{c}")?;
        }
        match self.width {
            Width::None => {}
            Width::Fixed(w) => write!(f, "{w}")?,
            Width::Dynamic => f.write_str("*")?,
        }
        match self.precision {
            None => {}
            Some(Precision::Fixed(p)) => write!(f, ".{p}")?,
            Some(Precision::Dynamic) => f.write_str(".*")?,
        }
        let c = match self.conversion {
            Conversion::String => 's',
            Conversion::Char => 'c',
            Conversion::SignedInt => 'd',
            Conversion::UnsignedInt => 'u',
            Conversion::Octal => 'o',
            Conversion::HexLower => 'x',
            Conversion::HexUpper => 'X',
            Conversion::Fixed => 'f',
            Conversion::Scientific { upper } => {
                if upper {
                    'E'
                } else {
                    'e'
                }
            }
            Conversion::General { upper } => {
                if upper {
                    'G'
                } else {
                    'g'
                }
            }
        };
        write!(f, "{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_set() {
        let mut flags = Flags::empty();
        assert!(flags.is_empty());
        flags.insert(Flag::ZeroPad);
        flags.insert(Flag::ForceSign);
        flags.insert(Flag::ZeroPad);
        assert!(flags.contains(Flag::ZeroPad));
        assert!(!flags.contains(Flag::LeftAlign));
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            vec![Flag::ZeroPad, Flag::ForceSign]
        );
    }

    #[test]
    fn test_conversion_classes() {
        assert_eq!(Conversion::from_char('i'), Some(Conversion::SignedInt));
        assert_eq!(Conversion::from_char('b'), None);
        assert!(Conversion::HexUpper.is_integer());
        assert!(!Conversion::HexUpper.is_signed());
        assert!(Conversion::General { upper: true }.is_signed());
        assert!(!Conversion::Char.is_float());
    }

    #[test]
    fn test_placeholder_display() {
        let spec = PlaceholderSpec {
            argnum: Some(2),
            flags: Flags::empty().with(Flag::LeftAlign),
            pad_char: Some('*'),
            width: Width::Fixed(8),
            precision: Some(Precision::Dynamic),
            ..PlaceholderSpec::new(Conversion::Scientific { upper: true })
        };
        assert_eq!(spec.to_string(), "%2$-'*8.*E");
        assert!(spec.is_dynamic());
        assert!(spec.is_padded());
        assert_eq!(spec.fixed_width(), 8);
        assert_eq!(spec.fixed_precision(), None);
    }
}
