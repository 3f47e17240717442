//! Parser for subset queries.
//!
//! ```text
//! query := term (("AND"|"OR") term)*
//! term  := "!"? "(" query ")" | count | pattern
//! count := "!"? ("="|">"|"<")? digit+ letter+
//! ```
//!
//! Keywords are case-insensitive whole words. Only one keyword splits a given
//! nesting level: if `AND` appears anywhere at that level it is the splitter,
//! even when `OR` appears there too, and `OR` is used only when there is no `AND`.
//! Parenthesised groups are parsed before the level is split. `^` is accepted
//! wherever `!` is.

use log::debug;

use std::str::FromStr;

use crate::errors::QuerySyntaxError;
use crate::filter::*;
use crate::parse_utils::*;

type ParseResult<T> = std::result::Result<T, QuerySyntaxError>;

/// Parse a subset query into a filter tree.
///
/// Error offsets are byte offsets into `query`.
pub fn parse_query(query: &str) -> ParseResult<Filter> {
    let parser = Parser { query };
    let filter = parser.parse_level(0, query.len())?;
    debug!("Parsed subset query \"{}\" as {}", query, filter);
    Ok(filter)
}

impl FromStr for Filter {
    type Err = QuerySyntaxError;

    fn from_str(s: &str) -> ParseResult<Self> {
        parse_query(s)
    }
}

struct Parser<'a> {
    query: &'a str,
}

/// One nesting level after its groups have been parsed.
enum Item {
    Text { start: usize, end: usize },
    Group { filter: Filter, start: usize },
}

/// Everything between two splitting keywords.
struct Fragment {
    items: Vec<Item>,
    start: usize,
    keyword_before: Option<usize>,
    keyword_after: Option<usize>,
}

impl Fragment {
    fn new(start: usize, keyword_before: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            start,
            keyword_before,
            keyword_after: None,
        }
    }

    fn push_text(&mut self, start: usize, end: usize) {
        if start < end {
            self.items.push(Item::Text { start, end });
        }
    }
}

impl<'a> Parser<'a> {
    fn bytes(&self) -> &'a [u8] {
        self.query.as_bytes()
    }

    fn parse_level(&self, start: usize, end: usize) -> ParseResult<Filter> {
        let items = self.scan_groups(start, end)?;

        let combination = if self.has_keyword(&items, And) {
            Some(And)
        } else if self.has_keyword(&items, Or) {
            Some(Or)
        } else {
            None
        };

        let Some(combination) = combination else {
            let mut fragment = Fragment::new(start, None);
            fragment.items = items;
            return self.resolve(fragment, None);
        };

        let filters = self
            .split(items, start, combination)
            .into_iter()
            .map(|fragment| self.resolve(fragment, Some(combination)))
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(FilterCollection::with_filters(combination, filters).into())
    }

    /// Parse every top-level parenthesised group in `start..end`, leaving the text between them.
    fn scan_groups(&self, start: usize, end: usize) -> ParseResult<Vec<Item>> {
        let q = self.bytes();
        let mut items = Vec::new();
        let mut text_start = start;
        let mut depth = 0usize;
        let mut open = start;

        for i in start..end {
            match q[i] {
                b'(' => {
                    if depth == 0 {
                        open = i;
                    }
                    depth += 1;
                }
                b')' => {
                    if depth == 0 {
                        return Err(QuerySyntaxError::new("unmatched ')'", i));
                    }
                    depth -= 1;

                    if depth == 0 {
                        let mut filter = self.parse_level(open + 1, i)?;

                        // only a marker directly touching the '(' belongs to the group
                        let negated = open > text_start && is_negation(q[open - 1]);
                        let group_start = if negated { open - 1 } else { open };
                        if negated {
                            filter.set_inversion(true);
                        }

                        if text_start < group_start {
                            items.push(Item::Text {
                                start: text_start,
                                end: group_start,
                            });
                        }
                        items.push(Item::Group {
                            filter,
                            start: group_start,
                        });
                        text_start = i + 1;
                    }
                }
                _ => (),
            }
        }

        if depth > 0 {
            return Err(QuerySyntaxError::new("unclosed '('", open));
        }

        if text_start < end {
            items.push(Item::Text {
                start: text_start,
                end,
            });
        }

        Ok(items)
    }

    fn has_keyword(&self, items: &[Item], combination: Combination) -> bool {
        let keyword = combination.keyword().as_bytes();
        items.iter().any(|item| match item {
            Item::Text { start, end } => find_keyword(self.bytes(), *start, *end, keyword).is_some(),
            Item::Group { .. } => false,
        })
    }

    fn split(&self, items: Vec<Item>, start: usize, combination: Combination) -> Vec<Fragment> {
        let keyword = combination.keyword().as_bytes();
        let mut fragments = Vec::new();
        let mut curr = Fragment::new(start, None);

        for item in items {
            match item {
                Item::Text { start, end } => {
                    let mut pos = start;

                    while let Some(k) = find_keyword(self.bytes(), pos, end, keyword) {
                        curr.push_text(pos, k);
                        curr.keyword_after = Some(k);
                        let next = Fragment::new(k + keyword.len(), Some(k));
                        fragments.push(std::mem::replace(&mut curr, next));
                        pos = k + keyword.len();
                    }

                    curr.push_text(pos, end);
                }
                group => curr.items.push(group),
            }
        }

        fragments.push(curr);
        fragments
    }

    /// Turn a fragment into exactly one filter.
    fn resolve(&self, fragment: Fragment, combination: Option<Combination>) -> ParseResult<Filter> {
        let q = self.bytes();
        let mut terms = fragment
            .items
            .into_iter()
            .filter_map(|item| match item {
                Item::Text { start, end } => {
                    let (start, end) = trim_range(q, start, end);
                    (start < end).then_some(Item::Text { start, end })
                }
                group => Some(group),
            })
            .collect::<Vec<_>>();

        if terms.len() > 1 {
            let offset = match &terms[1] {
                Item::Text { start, .. } | Item::Group { start, .. } => *start,
            };
            return Err(QuerySyntaxError::new(
                "expected AND or OR between terms",
                offset,
            ));
        }

        match terms.pop() {
            Some(Item::Text { start, end }) => self.parse_term(start, end),
            Some(Item::Group { filter, .. }) => Ok(filter),
            None => {
                let keyword = combination.map(|c| c.keyword()).unwrap_or_default();
                Err(match (fragment.keyword_before, fragment.keyword_after) {
                    (None, Some(after)) => {
                        QuerySyntaxError::new(format!("expected a term before {}", keyword), after)
                    }
                    (Some(before), None) => {
                        QuerySyntaxError::new(format!("expected a term after {}", keyword), before)
                    }
                    (Some(_), Some(after)) => QuerySyntaxError::new(
                        format!("expected a term between two {}s", keyword),
                        after,
                    ),
                    (None, None) => QuerySyntaxError::new("empty query", fragment.start),
                })
            }
        }
    }

    /// Parse a single count or pattern term from trimmed, non-empty text.
    fn parse_term(&self, start: usize, end: usize) -> ParseResult<Filter> {
        let text = &self.bytes()[start..end];
        let first_digit = text.iter().position(u8::is_ascii_digit);
        let first_letter = text.iter().position(u8::is_ascii_alphabetic);

        match (first_digit, first_letter) {
            (Some(d), Some(l)) if d < l => self.parse_count(start, end, start + d),
            (Some(d), None) => self.parse_count(start, end, start + d),
            _ => self.parse_pattern(start, end),
        }
    }

    fn parse_count(&self, start: usize, end: usize, digits_start: usize) -> ParseResult<Filter> {
        let q = self.bytes();
        let mut inverted = false;
        let mut comparison = None;

        for i in start..digits_start {
            let c = q[i];
            if c.is_ascii_whitespace() {
                continue;
            }
            if is_negation(c) && comparison.is_none() {
                inverted = !inverted;
                continue;
            }
            match Comparison::from_symbol(c) {
                Some(cmp) if comparison.is_none() => comparison = Some(cmp),
                _ => {
                    return Err(QuerySyntaxError::new(
                        format!("expected a count but found '{}'", c as char),
                        i,
                    ))
                }
            }
        }

        let digits_end = digits_start
            + q[digits_start..end]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .count();
        let threshold = self.query[digits_start..digits_end]
            .parse::<usize>()
            .map_err(|_| QuerySyntaxError::new("count is too large", digits_start))?;

        let (residues_start, _) = trim_range(q, digits_end, end);
        let residues_end = residues_start
            + q[residues_start..end]
                .iter()
                .take_while(|c| c.is_ascii_alphabetic())
                .count();
        if residues_start == residues_end {
            return Err(QuerySyntaxError::new(
                "expected a residue or stretch after the count",
                digits_end,
            ));
        }
        if residues_end < end {
            return Err(QuerySyntaxError::new(
                "unexpected text after the residue stretch",
                residues_end,
            ));
        }

        let mut filter = ResidueCountFilter::new(
            &self.query[residues_start..residues_end],
            threshold,
            comparison.unwrap_or(Equal),
        );
        filter.set_inversion(inverted);

        Ok(filter.into())
    }

    fn parse_pattern(&self, start: usize, end: usize) -> ParseResult<Filter> {
        let text = &self.query[start..end];
        let (rest, _) = strip_negations(text.as_bytes());
        if trim_ascii_whitespace(rest).is_none() {
            return Err(QuerySyntaxError::new("expected a sequence pattern", start));
        }

        SequenceContentFilter::new(text)
            .map(Filter::from)
            .map_err(|e| QuerySyntaxError::new(e.to_string(), start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASS: &str = "LENNARTMARTENS";
    const NO_PASS: &str = "KRISGEVAERT";
    const THIRD: &str = "GRTMAR";

    fn err_offset(query: &str) -> usize {
        parse_query(query)
            .expect_err(&format!("\"{}\" should not parse", query))
            .offset
    }

    #[test]
    fn single_leaf() {
        let f = parse_query("M").unwrap();
        assert!(matches!(f, Filter::Content(_)));
        assert!(f.evaluate(PASS));
        assert!(!f.evaluate(NO_PASS));

        let f = parse_query("^M").unwrap();
        assert!(f.is_inverted());
        assert!(!f.evaluate(PASS));
        assert!(f.evaluate(NO_PASS));
    }

    #[test]
    fn and_or_levels() {
        let f = parse_query("M and R").unwrap();
        match &f {
            Filter::Collection(c) => {
                assert_eq!(c.combination(), And);
                assert_eq!(c.len(), 2);
            }
            _ => panic!("expected a collection"),
        }
        assert!(f.evaluate(PASS));
        assert!(!f.evaluate(NO_PASS));

        let f = parse_query("M OR L").unwrap();
        assert!(f.evaluate(PASS));
        assert!(!f.evaluate(NO_PASS));
        assert!(f.evaluate(THIRD));
    }

    #[test]
    fn groups() {
        let f = parse_query("(L and M) or (K and G)").unwrap();
        assert!(f.evaluate(PASS));
        assert!(f.evaluate(NO_PASS));
        assert!(!f.evaluate(THIRD));

        let f = parse_query("!(L and M) or (K and G)").unwrap();
        assert!(!f.evaluate(PASS));
        assert!(f.evaluate(THIRD));
    }

    #[test]
    fn lone_group_is_unwrapped() {
        let f = parse_query(" ( M ) ").unwrap();
        assert!(matches!(f, Filter::Content(_)));

        let f = parse_query("!(M)").unwrap();
        assert!(f.is_inverted());
        assert!(!f.evaluate(PASS));
    }

    #[test]
    fn group_negation_overwrites_inversion() {
        let f = parse_query("!(!M)").unwrap();
        assert!(f.is_inverted());
        assert!(!f.evaluate(PASS));
        assert!(f.evaluate(NO_PASS));

        let f = parse_query("!(!2A)").unwrap();
        assert!(f.is_inverted());
        assert_eq!(f.to_string(), "!=2A");
        assert!(!f.evaluate(PASS));
        assert!(f.evaluate(NO_PASS));
    }

    #[test]
    fn whitespace_after_negation() {
        let f = parse_query("! M").unwrap();
        assert_eq!(f.to_string(), "!M");
        assert!(!f.evaluate("MK"));
        assert!(f.evaluate("KR"));

        let f = parse_query("W OR ^ uk").unwrap();
        assert!(f.evaluate("MKR"));
        assert!(!f.evaluate("AMKR"));
    }

    #[test]
    fn negation_right_after_keyword() {
        let f = parse_query("M AND!K").unwrap();
        assert_eq!(f.to_string(), "(M AND !K)");
        assert!(f.evaluate("MR"));
        assert!(!f.evaluate("MK"));

        let f = parse_query("K or^2A").unwrap();
        assert!(f.evaluate("AK"));
        assert!(f.evaluate("R"));
        assert!(!f.evaluate("AA"));
    }

    #[test]
    fn and_wins_over_or() {
        // splits into "M" AND "K OR L", not ("M" AND "K") OR "L"
        let f = parse_query("M AND K OR L").unwrap();
        assert_eq!(f.to_string(), "(M AND (K OR L))");
        assert!(f.evaluate(PASS));
        assert!(!f.evaluate("LLL"));

        let f = parse_query("L OR K AND M").unwrap();
        assert_eq!(f.to_string(), "((L OR K) AND M)");
        assert!(!f.evaluate("LLL"));
    }

    #[test]
    fn keywords_need_word_boundaries() {
        let f = parse_query("LAND").unwrap();
        assert!(matches!(f, Filter::Content(_)));

        let f = parse_query("(M)and(R)").unwrap();
        assert!(matches!(f, Filter::Collection(_)));
        assert!(f.evaluate(PASS));
    }

    #[test]
    fn counts() {
        let f = parse_query("2A").unwrap();
        match &f {
            Filter::Count(c) => {
                assert_eq!(c.residues(), b"A");
                assert_eq!(c.threshold(), 2);
                assert_eq!(c.comparison(), Equal);
                assert!(!c.is_inverted());
            }
            _ => panic!("expected a count"),
        }
        assert!(f.evaluate(PASS));
        assert!(!f.evaluate(NO_PASS));

        let f = parse_query("<2A").unwrap();
        assert!(!f.evaluate(PASS));
        assert!(f.evaluate(NO_PASS));

        let f = parse_query("^<2A").unwrap();
        assert!(f.evaluate(PASS));
        assert!(!f.evaluate(NO_PASS));

        let f = parse_query("> 1 rt").unwrap();
        assert_eq!(f.to_string(), ">1RT");
        assert!(f.evaluate(PASS));
    }

    #[test]
    fn count_with_initiator() {
        let f = parse_query("=1U").unwrap();
        assert!(f.evaluate("MKMR"));
        assert!(!f.evaluate("KMMR"));
    }

    #[test]
    fn malformed_queries() {
        assert_eq!(err_offset("^M AND G AND"), 9);
        assert_eq!(err_offset("AND G"), 0);
        assert_eq!(err_offset("()"), 1);
        assert_eq!(err_offset("(A)) OR (G and F)"), 3);
        assert_eq!(err_offset("((A or G)"), 0);
        assert_eq!(err_offset("(A or G) (K and L)"), 9);
        assert_eq!(err_offset(""), 0);
        assert_eq!(err_offset("M AND AND R"), 6);
    }

    #[test]
    fn malformed_counts() {
        assert_eq!(err_offset("A OR 12"), 7);
        assert_eq!(err_offset("=>2A"), 1);
        assert_eq!(err_offset("2A B"), 2);
        assert_eq!(err_offset("99999999999999999999999A"), 0);
    }

    #[test]
    fn nested_offsets_are_absolute() {
        assert_eq!(err_offset("M OR (K AND (R AND))"), 15);
        assert_eq!(err_offset("M OR (K AND ())"), 13);
    }

    #[test]
    fn bad_patterns() {
        assert_eq!(err_offset("K OR !"), 5);
        assert_eq!(err_offset("K OR A.["), 5);
    }

    #[test]
    fn display_round_trips() {
        for query in ["!(K and G) or 2A", "U.K and !>3W", "(M or ^R) and <1C and UK"] {
            let f = parse_query(query).unwrap();
            let again = parse_query(&f.to_string()).unwrap();
            for record in [PASS, NO_PASS, THIRD, "MKWWWW", "AMKC"] {
                assert_eq!(f.evaluate(record), again.evaluate(record), "{}", query);
            }
        }
    }

    #[test]
    fn from_str() {
        let f: Filter = "M and R".parse().unwrap();
        assert!(f.evaluate(PASS));
    }
}
