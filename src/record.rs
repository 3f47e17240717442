use std::fmt;

/// Anything that carries an amino-acid sequence.
///
/// Filters only ever look at the sequence, so readers for any flat-file format
/// can hand their own record types straight to a [`Filter`](crate::Filter).
pub trait SequenceRecord {
    fn sequence(&self) -> &[u8];
}

impl SequenceRecord for [u8] {
    fn sequence(&self) -> &[u8] {
        self
    }
}

impl SequenceRecord for Vec<u8> {
    fn sequence(&self) -> &[u8] {
        self
    }
}

impl SequenceRecord for str {
    fn sequence(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl SequenceRecord for String {
    fn sequence(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<R: SequenceRecord + ?Sized> SequenceRecord for &R {
    fn sequence(&self) -> &[u8] {
        (**self).sequence()
    }
}

/// A protein database entry: header line and amino-acid sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protein {
    header: String,
    sequence: Vec<u8>,
}

impl Protein {
    pub fn new(header: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl SequenceRecord for Protein {
    fn sequence(&self) -> &[u8] {
        &self.sequence
    }
}

impl fmt::Display for Protein {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ">{}", self.header)?;
        write!(f, "{}", String::from_utf8_lossy(&self.sequence))
    }
}

/// Sequence to match against, with a leading initiator methionine removed if requested.
pub(crate) fn match_region(sequence: &[u8], exclude_initiator: bool) -> &[u8] {
    match sequence {
        [b'M', rest @ ..] if exclude_initiator => rest,
        _ => sequence,
    }
}
