//! Predicates over sequence records.
//!
//! A subset query always parses into a tree made of exactly three kinds of node,
//! so [`Filter`] is a closed enum rather than a trait object.

pub mod collection;
pub use collection::*;

pub mod content;
pub use content::*;

pub mod count;
pub use count::*;

use std::fmt;

use crate::record::SequenceRecord;

#[derive(Debug)]
pub enum Filter {
    Content(SequenceContentFilter),
    Count(ResidueCountFilter),
    Collection(FilterCollection),
}

impl Filter {
    /// Whether the record passes this predicate.
    pub fn evaluate<R: SequenceRecord + ?Sized>(&self, record: &R) -> bool {
        use Filter::*;
        match self {
            Content(f) => f.evaluate(record),
            Count(f) => f.evaluate(record),
            Collection(f) => f.evaluate(record),
        }
    }

    /// Overwrite the inversion flag, which is applied after the base test.
    pub fn set_inversion(&mut self, invert: bool) {
        use Filter::*;
        match self {
            Content(f) => f.set_inversion(invert),
            Count(f) => f.set_inversion(invert),
            Collection(f) => f.set_inversion(invert),
        }
    }

    pub fn is_inverted(&self) -> bool {
        use Filter::*;
        match self {
            Content(f) => f.is_inverted(),
            Count(f) => f.is_inverted(),
            Collection(f) => f.is_inverted(),
        }
    }
}

impl From<SequenceContentFilter> for Filter {
    fn from(f: SequenceContentFilter) -> Self {
        Filter::Content(f)
    }
}

impl From<ResidueCountFilter> for Filter {
    fn from(f: ResidueCountFilter) -> Self {
        Filter::Count(f)
    }
}

impl From<FilterCollection> for Filter {
    fn from(f: FilterCollection) -> Self {
        Filter::Collection(f)
    }
}

/// Renders a query that parses back into an equivalent filter, except for leaves
/// built with [`SequenceContentFilter::from_regex`], which print their raw regex.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Filter::*;
        match self {
            Content(c) => write!(f, "{}", c),
            Count(c) => write!(f, "{}", c),
            Collection(c) => write!(f, "{}", c),
        }
    }
}

/// Upper-case residues and turn `U` (initiator-less methionine) into `M`.
///
/// Returns whether a `U` was seen, which switches on initiator exclusion.
pub(crate) fn normalize_residues(residues: &[u8]) -> (Vec<u8>, bool) {
    let mut res = residues.to_ascii_uppercase();
    let exclude_initiator = res.contains(&b'U');

    if exclude_initiator {
        res.iter_mut().filter(|c| **c == b'U').for_each(|c| *c = b'M');
    }

    (res, exclude_initiator)
}

/// Inverse of [`normalize_residues`] for display.
pub(crate) fn render_residues(residues: &[u8], exclude_initiator: bool) -> String {
    residues
        .iter()
        .map(|&c| {
            if exclude_initiator && c == b'M' {
                'U'
            } else {
                c as char
            }
        })
        .collect()
}
