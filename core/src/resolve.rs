//! Placeholder-to-argument binding.
//!
//! Placeholders are bound left to right. An explicit `n$` binds argument `n`
//! and leaves the positional counter alone; otherwise the placeholder takes
//! the counter, which then advances. Each `*` takes its own positional slot
//! ahead of the conversion's argument, width before precision.

use tracing::trace;

use crate::spec::{PlaceholderSpec, Precision, Segment, Template, Width};

/// A placeholder and the 1-based argument indices it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'t> {
    pub spec: &'t PlaceholderSpec,
    /// Argument rendered by the conversion.
    pub argument: usize,
    /// Argument supplying a `*` width.
    pub width_argument: Option<usize>,
    /// Argument supplying a `.*` precision.
    pub precision_argument: Option<usize>,
}

/// A template segment after binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'t> {
    Text(&'t str),
    Placeholder(Binding<'t>),
}

/// Outcome of comparing the required and supplied argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Satisfied,
    TooFew { required: usize, supplied: usize },
    TooMany { required: usize, supplied: usize },
    /// Arguments passed to a format without placeholders.
    Unexpected { supplied: usize },
}

/// A bound template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution<'t> {
    pub pieces: Vec<Resolved<'t>>,
    /// Highest argument index read by any placeholder or `*`, or `0`.
    pub required: usize,
    pub placeholders: usize,
}

/// Binds every placeholder of `template` to its arguments.
pub fn resolve(template: &Template) -> Resolution<'_> {
    let mut next = 1usize;
    let mut take = || {
        let slot = next;
        next += 1;
        slot
    };

    let mut resolution = Resolution::default();
    for segment in &template.segments {
        let spec = match segment {
            Segment::Literal(text) => {
                resolution.pieces.push(Resolved::Text(text));
                continue;
            }
            Segment::Placeholder(spec) => spec,
        };

        let width_argument = (spec.width == Width::Dynamic).then(&mut take);
        let precision_argument = (spec.precision == Some(Precision::Dynamic)).then(&mut take);
        let argument = match spec.argnum {
            Some(n) => n as usize,
            None => take(),
        };

        trace!(
            placeholder = %spec,
            argument,
            width = ?width_argument,
            precision = ?precision_argument,
            "bound placeholder"
        );

        resolution.required = [Some(argument), width_argument, precision_argument]
            .into_iter()
            .flatten()
            .fold(resolution.required, usize::max);
        resolution.placeholders += 1;
        resolution.pieces.push(Resolved::Placeholder(Binding {
            spec,
            argument,
            width_argument,
            precision_argument,
        }));
    }

    resolution
}

impl Resolution<'_> {
    /// Checks `supplied` arguments against the bound placeholders.
    pub fn arity(&self, supplied: usize) -> Arity {
        if self.placeholders == 0 {
            return match supplied {
                0 => Arity::Satisfied,
                supplied => Arity::Unexpected { supplied },
            };
        }

        let required = self.required;
        match required.cmp(&supplied) {
            core::cmp::Ordering::Greater => Arity::TooFew { required, supplied },
            core::cmp::Ordering::Less => Arity::TooMany { required, supplied },
            core::cmp::Ordering::Equal => Arity::Satisfied,
        }
    }

    /// Bindings in textual order.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding<'_>> {
        self.pieces.iter().filter_map(|piece| match piece {
            Resolved::Placeholder(binding) => Some(binding),
            Resolved::Text(_) => None,
        })
    }
}
