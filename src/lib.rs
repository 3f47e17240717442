//! Rust library for selecting protein sequence records with subset queries.
//!
//! # Overview
//! A subset query is a compact boolean expression over the amino-acid content of a
//! sequence. Every "select a subset of the database" workflow boils down to parsing
//! one query into a [`Filter`] and evaluating it against each record in turn.
//!
//! ## Query syntax
//! Here are some example queries:
//! * `M`: keep sequences containing a methionine
//! * `!C`: keep sequences without a cysteine
//! * `KR.P`: patterns with a `.` are regular expressions
//! * `U`: like `M`, but an initiator methionine at the start does not count
//! * `2A`, `>3W`, `<1C`: count residues or stretches (`=` is the default)
//! * `(M and 2A) or !(K and G)`: combine terms with `AND`/`OR` and parentheses
//!
//! Keywords are case-insensitive and `^` may be used instead of `!`.
//! Only one keyword splits an unparenthesised level: when `AND` appears anywhere
//! at a level it splits that whole level, so `M AND K OR L` means `M AND (K OR L)`.
//! Use parentheses to be explicit.
//!
//! ## Evaluating
//! ```
//! use protsel::*;
//!
//! let filter = parse_query("(L and M) or (K and G)").unwrap();
//! assert!(filter.evaluate("LENNARTMARTENS"));
//! assert!(!filter.evaluate("GRTMAR"));
//! ```
//!
//! Filters are immutable after they are built, so one filter can be shared by many
//! threads. See [`subset_with_threads`] and [`SubsetExt::subset`].

pub mod errors;
pub mod filter;
pub mod iter;
pub mod query;
pub mod query_set;
pub mod record;

mod parse_utils;

// commonly used functions and types

pub use crate::errors::{Error, QuerySyntaxError, Result};
pub use crate::filter::*;
pub use crate::iter::*;
pub use crate::query::*;
pub use crate::query_set::*;
pub use crate::record::*;

/// Parse a subset query, panicking with the call site if it is malformed.
#[macro_export]
macro_rules! query {
    ($s:expr) => {{
        let s: &str = $s;
        $crate::parse_query(s).unwrap_or_else(|e| {
            panic!(
                "Error parsing subset query:\n{}\non line {} column {} in file {}",
                e.highlight(s),
                line!(),
                column!(),
                file!()
            )
        })
    }};
}
