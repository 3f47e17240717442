use log::debug;

use std::thread;

use crate::filter::Filter;
use crate::record::SequenceRecord;

/// Iterator adapter that keeps only records passing a filter.
pub struct SubsetIter<'f, I> {
    records: I,
    filter: &'f Filter,
}

impl<'f, I> Iterator for SubsetIter<'f, I>
where
    I: Iterator,
    I::Item: SequenceRecord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.records.find(|r| filter.evaluate(r))
    }
}

pub trait SubsetExt: Iterator + Sized {
    /// Lazily keep the records for which `filter` evaluates to true.
    #[must_use]
    fn subset(self, filter: &Filter) -> SubsetIter<'_, Self> {
        SubsetIter {
            records: self,
            filter,
        }
    }
}

impl<I: Iterator> SubsetExt for I {}

/// Evaluate `filter` over `records` on several threads, returning the kept records in input order.
pub fn subset_with_threads<'r, R>(records: &'r [R], filter: &Filter, threads: usize) -> Vec<&'r R>
where
    R: SequenceRecord + Sync,
{
    assert!(threads >= 1, "Number of threads must be greater than zero");

    let chunk_size = records.len().div_ceil(threads).max(1);

    let res = thread::scope(|s| {
        let handles = records
            .chunks(chunk_size)
            .map(|chunk| s.spawn(move || chunk.iter().filter(|r| filter.evaluate(*r)).collect::<Vec<_>>()))
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|_| panic!("Subset worker thread panicked")))
            .collect::<Vec<_>>()
    });

    debug!("Kept {} of {} records", res.len(), records.len());
    res
}
