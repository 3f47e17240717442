use colored::*;

use std::fmt::Write;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    QuerySyntax(#[from] QuerySyntaxError),

    #[error("Error compiling sequence pattern \"{pattern}\": {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },

    #[error("Error reading query set: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Could not parse query \"{name}\" (\"{query}\"): {source}")]
    NamedQuery {
        name: String,
        query: String,
        source: QuerySyntaxError,
    },

    #[error("Query name \"{0}\" is used more than once")]
    DuplicateQueryName(String),
}

/// A subset query that could not be parsed.
///
/// `offset` is a zero-based byte offset into the whole query string that was
/// handed to the parser, no matter how deeply nested the failing term was.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct QuerySyntaxError {
    pub message: String,
    pub offset: usize,
}

impl QuerySyntaxError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    /// Render the query with the offending character marked, followed by a caret line.
    pub fn highlight(&self, query: &str) -> String {
        let offset = self.offset.min(query.len());
        let (before, rest) = query.split_at(offset);
        let (bad, after) = match rest.chars().next() {
            Some(c) => rest.split_at(c.len_utf8()),
            None => ("", rest),
        };

        let mut res = String::new();
        // writing to a String cannot fail
        let _ = writeln!(res, "{}{}{}", before, bad.red().bold(), after);
        let _ = write!(
            res,
            "{}{} {}",
            " ".repeat(before.chars().count()),
            "^".red().bold(),
            self.message
        );
        res
    }
}

pub fn utf8(b: &[u8]) -> String {
    String::from_utf8_lossy(b).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_points_at_offset() {
        colored::control::set_override(false);
        let e = QuerySyntaxError::new("unmatched ')'", 3);
        let s = e.highlight("(A)) OR G");
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "(A)) OR G");
        assert_eq!(lines[1], "   ^ unmatched ')'");
    }

    #[test]
    fn highlight_past_end() {
        colored::control::set_override(false);
        let e = QuerySyntaxError::new("empty query", 5);
        let s = e.highlight("AND");
        assert!(s.ends_with("   ^ empty query"));
    }

    #[test]
    fn display_includes_offset() {
        let e: Error = QuerySyntaxError::new("empty query", 0).into();
        assert_eq!(e.to_string(), "empty query at offset 0");
    }
}
