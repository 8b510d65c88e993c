//! Return-type inference and validation for printf-family calls.
//!
//! Given a call's format string and its value arguments, each either a known
//! literal or an opaque type, [`analyze`] computes the most precise return
//! type the call can have and the diagnostics it raises.
//!
//! ```ignore
//! use fmtype_core::{Argument, FormatCall, FormatFunction, analyze};
//!
//! let call = FormatCall::new(
//!     FormatFunction::Sprintf,
//!     "%2$s %1$s",
//!     vec![Argument::from("A"), Argument::from("B")],
//! );
//! assert_eq!(analyze(&call).return_type.to_string(), "'B A'");
//! ```
#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

mod analyze;
pub mod config;
mod diagnostic;
mod error;
pub mod render;
pub mod resolve;
mod span;
pub mod spec;
pub mod synth;
mod types;
mod value;

pub use analyze::{Analysis, Analyzer, FormatCall, FormatFunction, analyze};
pub use config::{AnalyzerConfig, QuoteFlag};
pub use diagnostic::{Diagnostic, DiagnosticKind, Validator};
pub use error::{FormatError, NUMERIC_LIMIT};
pub use span::Span;
pub use spec::{
    Conversion, Flag, Flags, PlaceholderSpec, Precision, Segment, Template, Width, parse,
};
pub use types::ReturnType;
pub use value::{ArgType, Argument, Arguments, FormatArg, Literal};
