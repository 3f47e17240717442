use memchr::memmem::Finder;

use regex::bytes::Regex;

use thread_local::*;

use std::fmt;

use crate::errors::*;
use crate::filter::{normalize_residues, render_residues};
use crate::parse_utils::*;
use crate::record::*;

/// Keeps records whose sequence contains (or, when exclusive, lacks) a pattern.
///
/// Patterns containing `.` are compiled as regular expressions and searched
/// anywhere in the sequence; all other patterns are matched literally.
#[derive(Debug)]
pub struct SequenceContentFilter {
    pattern: Vec<u8>,
    inclusive: bool,
    exclude_initiator: bool,
    compiled: bool,
    matcher: Matcher,
}

#[derive(Debug)]
enum Matcher {
    Literal(Finder<'static>),
    Regex {
        regex: Regex,
        regex_local: ThreadLocal<Regex>,
    },
}

impl SequenceContentFilter {
    /// Build a filter from a textual pattern such as `"!UK.R"`.
    ///
    /// Every leading `!` or `^` toggles between inclusive and exclusive matching.
    /// A `U` anywhere stands for `M` and makes the filter ignore an initiator methionine.
    pub fn new(pattern: &str) -> Result<Self> {
        let trimmed = trim_ascii_whitespace(pattern.as_bytes()).unwrap_or_default();
        let (rest, negations) = strip_negations(trimmed);
        let rest = trim_ascii_whitespace(rest).unwrap_or_default();
        let (pattern, exclude_initiator) = normalize_residues(rest);

        let matcher = if pattern.contains(&b'.') {
            let pattern_str = utf8(&pattern);
            let regex = Regex::new(&pattern_str).map_err(|e| Error::Regex {
                pattern: pattern_str,
                source: e,
            })?;
            Matcher::Regex {
                regex,
                regex_local: ThreadLocal::new(),
            }
        } else {
            Matcher::Literal(Finder::new(&pattern).into_owned())
        };

        Ok(Self {
            pattern,
            inclusive: negations % 2 == 0,
            exclude_initiator,
            compiled: false,
            matcher,
        })
    }

    /// Build a filter from an already compiled regular expression.
    ///
    /// The regex is used as given: it is neither upper-cased nor checked for `U`.
    /// Such a filter displays as its raw regex, which is not a subset query and
    /// need not parse back into the same filter.
    pub fn from_regex(regex: Regex, inclusive: bool, exclude_initiator: bool) -> Self {
        Self {
            pattern: regex.as_str().as_bytes().to_owned(),
            inclusive,
            exclude_initiator,
            compiled: true,
            matcher: Matcher::Regex {
                regex,
                regex_local: ThreadLocal::new(),
            },
        }
    }

    pub fn evaluate<R: SequenceRecord + ?Sized>(&self, record: &R) -> bool {
        let region = match_region(record.sequence(), self.exclude_initiator);

        let found = match &self.matcher {
            Matcher::Literal(finder) => finder.find(region).is_some(),
            Matcher::Regex { regex, regex_local } => {
                regex_local.get_or(|| regex.clone()).is_match(region)
            }
        };

        if self.inclusive {
            found
        } else {
            !found
        }
    }

    pub fn set_inversion(&mut self, invert: bool) {
        self.inclusive = !invert;
    }

    pub fn is_inverted(&self) -> bool {
        !self.inclusive
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Regex { .. })
    }

    pub fn excludes_initiator(&self) -> bool {
        self.exclude_initiator
    }

    /// Whether this filter was built from a pre-compiled regex rather than a query pattern.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }
}

impl fmt::Display for SequenceContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.inclusive {
            write!(f, "!")?;
        }
        if self.compiled {
            return write!(f, "{}", String::from_utf8_lossy(&self.pattern));
        }
        write!(f, "{}", render_residues(&self.pattern, self.exclude_initiator))
    }
}
