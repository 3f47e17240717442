use std::fmt;

use crate::filter::Filter;
use crate::record::*;

pub use Combination::*;

/// How the children of a [`FilterCollection`] are folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    And,
    Or,
}

impl Combination {
    pub fn keyword(self) -> &'static str {
        match self {
            And => "AND",
            Or => "OR",
        }
    }
}

/// An ordered group of filters joined by a single boolean operator.
///
/// An empty `And` collection keeps every record and an empty `Or` collection keeps none.
#[derive(Debug)]
pub struct FilterCollection {
    filters: Vec<Filter>,
    combination: Combination,
    inverted: bool,
}

impl FilterCollection {
    pub fn new(combination: Combination) -> Self {
        Self::with_filters(combination, Vec::new())
    }

    pub fn with_filters(combination: Combination, filters: Vec<Filter>) -> Self {
        Self {
            filters,
            combination,
            inverted: false,
        }
    }

    pub fn add(&mut self, filter: impl Into<Filter>) {
        self.filters.push(filter.into());
    }

    pub fn evaluate<R: SequenceRecord + ?Sized>(&self, record: &R) -> bool {
        let res = match self.combination {
            And => self.filters.iter().all(|f| f.evaluate(record)),
            Or => self.filters.iter().any(|f| f.evaluate(record)),
        };

        if self.inverted {
            !res
        } else {
            res
        }
    }

    pub fn set_inversion(&mut self, invert: bool) {
        self.inverted = invert;
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn combination(&self) -> Combination {
        self.combination
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Display for FilterCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.inverted {
            write!(f, "!")?;
        }
        write!(f, "(")?;
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.combination.keyword())?;
            }
            write!(f, "{}", filter)?;
        }
        write!(f, ")")
    }
}
