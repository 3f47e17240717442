use memchr::memmem::Finder;

use std::fmt;

use crate::filter::{normalize_residues, render_residues};
use crate::record::*;

pub use Comparison::*;

/// How a residue count is compared against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    GreaterThan,
    LessThan,
}

impl Comparison {
    pub fn from_symbol(c: u8) -> Option<Self> {
        match c {
            b'=' => Some(Equal),
            b'>' => Some(GreaterThan),
            b'<' => Some(LessThan),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Equal => '=',
            GreaterThan => '>',
            LessThan => '<',
        }
    }

    pub fn compare(self, count: usize, threshold: usize) -> bool {
        match self {
            Equal => count == threshold,
            GreaterThan => count > threshold,
            LessThan => count < threshold,
        }
    }
}

/// Keeps records based on how often a residue or stretch occurs.
#[derive(Debug)]
pub struct ResidueCountFilter {
    residues: Vec<u8>,
    finder: Finder<'static>,
    threshold: usize,
    comparison: Comparison,
    inverted: bool,
    exclude_initiator: bool,
}

impl ResidueCountFilter {
    /// A `U` in `residues` stands for `M` and makes the filter ignore an initiator methionine.
    pub fn new(residues: &str, threshold: usize, comparison: Comparison) -> Self {
        let (residues, exclude_initiator) = normalize_residues(residues.trim().as_bytes());

        Self {
            finder: Finder::new(&residues).into_owned(),
            residues,
            threshold,
            comparison,
            inverted: false,
            exclude_initiator,
        }
    }

    /// Number of occurrences of the residue stretch, counting overlapping hits separately.
    ///
    /// `AA` occurs twice in `AAA`. An empty stretch never occurs.
    pub fn count<R: SequenceRecord + ?Sized>(&self, record: &R) -> usize {
        if self.residues.is_empty() {
            return 0;
        }

        let region = match_region(record.sequence(), self.exclude_initiator);
        let mut count = 0;
        let mut pos = 0;

        while let Some(idx) = self.finder.find(&region[pos..]) {
            count += 1;
            pos += idx + 1;
        }

        count
    }

    pub fn evaluate<R: SequenceRecord + ?Sized>(&self, record: &R) -> bool {
        let res = self.comparison.compare(self.count(record), self.threshold);
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

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn excludes_initiator(&self) -> bool {
        self.exclude_initiator
    }
}

impl fmt::Display for ResidueCountFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.inverted {
            write!(f, "!")?;
        }
        write!(
            f,
            "{}{}{}",
            self.comparison.symbol(),
            self.threshold,
            render_residues(&self.residues, self.exclude_initiator)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_hits_count_separately() {
        let f = ResidueCountFilter::new("AA", 2, Equal);
        assert_eq!(f.count("AAA"), 2);
        assert_eq!(f.count("AAAA"), 3);
        assert_eq!(f.count("AABAA"), 2);
        assert!(f.evaluate("AAA"));
    }

    #[test]
    fn comparisons() {
        let record = "LENNARTMARTENS";
        assert!(ResidueCountFilter::new("a", 2, Equal).evaluate(record));
        assert!(ResidueCountFilter::new("A", 1, GreaterThan).evaluate(record));
        assert!(!ResidueCountFilter::new("A", 2, GreaterThan).evaluate(record));
        assert!(ResidueCountFilter::new("A", 3, LessThan).evaluate(record));
        assert!(!ResidueCountFilter::new("A", 2, LessThan).evaluate(record));
    }

    #[test]
    fn initiator_not_counted() {
        let f = ResidueCountFilter::new("U", 1, Equal);
        assert!(f.excludes_initiator());
        assert_eq!(f.count("MKMR"), 1);
        assert_eq!(f.count("KMMR"), 2);

        let f = ResidueCountFilter::new("M", 1, Equal);
        assert_eq!(f.count("MKMR"), 2);
    }

    #[test]
    fn empty_stretch() {
        let f = ResidueCountFilter::new("", 0, Equal);
        assert_eq!(f.count("AAA"), 0);
        assert!(f.evaluate("AAA"));
    }

    #[test]
    fn symbols() {
        for c in [Equal, GreaterThan, LessThan] {
            assert_eq!(Comparison::from_symbol(c.symbol() as u8), Some(c));
        }
        assert_eq!(Comparison::from_symbol(b'!'), None);
    }

    #[test]
    fn display() {
        let mut f = ResidueCountFilter::new("uk", 3, GreaterThan);
        assert_eq!(f.to_string(), ">3UK");
        f.set_inversion(true);
        assert_eq!(f.to_string(), "!>3UK");
    }
}
