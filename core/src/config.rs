//! Analyzer configuration for grammar options and resource limits.
//!
//! This module provides [`AnalyzerConfig`] for controlling how format strings
//! are read and how far literal evaluation is allowed to go.
//!
//! # Literal Limits
//!
//! Literal evaluation materializes the text a call would produce. A format
//! such as `"%2000000000s"` is perfectly valid, so
//! [`AnalyzerConfig::max_literal_len`] is a budget on the total text one call
//! may materialize. Placeholders that do not fit in what is left, and results
//! longer than the budget, fall back to the abstract type the literal would
//! have refined.
//!
//! # Example
//!
//! ```ignore
//! use fmtype_core::config::{AnalyzerConfig, QuoteFlag};
//!
//! // Default grammar and limits
//! let config = AnalyzerConfig::default();
//!
//! // Read `'` as the digit-grouping flag
//! let config = AnalyzerConfig::new()
//!     .with_quote_flag(QuoteFlag::Grouping)
//!     .with_max_literal_len(256);
//! ```

/// Meaning of the `'` character inside a placeholder.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuoteFlag {
    /// `'c` selects `c` as the explicit pad character (`%'*10s`).
    #[default]
    PadChar,
    /// `'` is the digit-grouping flag (`%'d`).
    Grouping,
}

/// Configuration for analyzer behavior and resource limits.
///
/// # Default Values
///
/// | Setting | Default | Rationale |
/// |---------|---------|-----------|
/// | `quote_flag` | `PadChar` | Explicit pad characters are far more common |
/// | `max_format_len` | 65536 | Formats are source literals |
/// | `max_literal_len` | 4096 | Bounds allocation during evaluation |
/// | `require_values` | `true` | Format-only calls should use the literal |
/// | `exact_counts` | `true` | Counting variants fold literal output |
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// How `'` inside a placeholder is read.
    pub quote_flag: QuoteFlag,

    /// Longest literal format that is parsed at all.
    ///
    /// Longer formats are analyzed as if the format were not statically
    /// known: conservative type, no diagnostics.
    ///
    /// Default: 65536 bytes
    pub max_format_len: usize,

    /// Total length of exact text that literal evaluation of one call will
    /// produce. Also caps each evaluated width and precision.
    ///
    /// Default: 4096
    pub max_literal_len: usize,

    /// Report a call passing only the format string as `TooFewArguments`.
    ///
    /// Never applies to variants taking their values as one array.
    ///
    /// Default: `true`
    pub require_values: bool,

    /// Return an exact literal count from counting variants when the whole
    /// output is literal and within `max_literal_len`.
    ///
    /// Default: `true`
    pub exact_counts: bool,
}

impl Default for AnalyzerConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl AnalyzerConfig {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        quote_flag: QuoteFlag::PadChar,
        max_format_len: 64 * 1024,
        max_literal_len: 4096,
        require_values: true,
        exact_counts: true,
    };

    /// Creates a new configuration with default values.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets how `'` inside a placeholder is read.
    #[inline]
    pub const fn with_quote_flag(mut self, quote_flag: QuoteFlag) -> Self {
        self.quote_flag = quote_flag;
        self
    }

    /// Sets the longest format that is parsed.
    #[inline]
    pub const fn with_max_format_len(mut self, len: usize) -> Self {
        self.max_format_len = len;
        self
    }

    /// Sets the literal evaluation bound.
    ///
    /// # Arguments
    ///
    /// * `len` - Maximum width, precision and result length. With `0`, every
    ///   non-empty text result stays abstract.
    #[inline]
    pub const fn with_max_literal_len(mut self, len: usize) -> Self {
        self.max_literal_len = len;
        self
    }

    /// Sets whether format-only calls are reported.
    #[inline]
    pub const fn with_require_values(mut self, require: bool) -> Self {
        self.require_values = require;
        self
    }

    /// Sets whether counting variants fold literal output to an exact count.
    #[inline]
    pub const fn with_exact_counts(mut self, exact: bool) -> Self {
        self.exact_counts = exact;
        self
    }
}
