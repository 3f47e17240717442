pub fn trim_ascii_whitespace(b: &[u8]) -> Option<&[u8]> {
    let start = b.iter().position(|&c| !c.is_ascii_whitespace())?;
    let end = b.iter().rposition(|&c| !c.is_ascii_whitespace())?;
    Some(&b[start..=end])
}

/// Shrink `start..end` of `s` to exclude surrounding whitespace.
///
/// An all-whitespace range collapses to an empty range at `end`.
pub fn trim_range(s: &[u8], start: usize, end: usize) -> (usize, usize) {
    match s[start..end].iter().position(|c| !c.is_ascii_whitespace()) {
        Some(first) => {
            let last = s[start..end]
                .iter()
                .rposition(|c| !c.is_ascii_whitespace())
                .unwrap_or(first);
            (start + first, start + last + 1)
        }
        None => (end, end),
    }
}

pub fn is_negation(c: u8) -> bool {
    c == b'!' || c == b'^'
}

/// Strip leading negation markers, returning the rest and how many were removed.
pub fn strip_negations(b: &[u8]) -> (&[u8], usize) {
    let n = b.iter().take_while(|&&c| is_negation(c)).count();
    (&b[n..], n)
}

/// Find the first case-insensitive occurrence of the word `keyword` in `s[start..end]`.
///
/// A word must be bounded on both sides by whitespace or by the edges of the range.
/// A negation marker directly after the word also ends it, so `AND!K` splits.
pub fn find_keyword(s: &[u8], start: usize, end: usize, keyword: &[u8]) -> Option<usize> {
    if end - start < keyword.len() {
        return None;
    }

    (start..=end - keyword.len()).find(|&i| {
        s[i..i + keyword.len()].eq_ignore_ascii_case(keyword)
            && (i == start || s[i - 1].is_ascii_whitespace())
            && (i + keyword.len() == end
                || s[i + keyword.len()].is_ascii_whitespace()
                || is_negation(s[i + keyword.len()]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_range_inner() {
        let s = b"  ab c  ";
        assert_eq!(trim_range(s, 0, s.len()), (2, 6));
        assert_eq!(trim_range(s, 0, 2), (2, 2));
        assert_eq!(trim_ascii_whitespace(b"   "), None);
    }

    #[test]
    fn keywords_are_whole_words() {
        let s = b"LAND and r";
        assert_eq!(find_keyword(s, 0, s.len(), b"AND"), Some(5));
        assert_eq!(find_keyword(s, 0, 4, b"AND"), None);
        assert_eq!(find_keyword(b"or", 0, 2, b"OR"), Some(0));
        assert_eq!(find_keyword(b"ORF", 0, 3, b"OR"), None);
        assert_eq!(find_keyword(b"M AND!K", 0, 7, b"AND"), Some(2));
        assert_eq!(find_keyword(b"M!AND K", 0, 7, b"AND"), None);
    }

    #[test]
    fn negations() {
        assert_eq!(strip_negations(b"!^!M"), (&b"M"[..], 3));
        assert_eq!(strip_negations(b"M!"), (&b"M!"[..], 0));
    }
}
