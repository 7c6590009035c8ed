//! In-process stand-in for the execution framework: partitions the input
//! into per-worker chunks, runs one local aggregator per chunk, groups the
//! partials by month and reduces each month to its mean.

use std::{collections::HashMap, num::NonZeroUsize, thread};

use thiserror::Error;
use tracing::debug;

use crate::{
    aggregate,
    merge::{self, MergeError},
    record::{MonthKey, RecordError},
    Means, SumCount,
};

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Runs the two-stage job over `buf` with up to `workers` local
/// aggregators.
///
/// Chunks only ever cut after a newline, so every record is seen by
/// exactly one aggregator, and the per-month partials merge associatively:
/// any partitioning of the same input produces the same [`Means`].
///
/// A record error in any worker fails the whole run; nothing is emitted.
pub fn run(buf: &str, workers: NonZeroUsize) -> Result<Means<'_>, JobError> {
    let chunks = chunks(buf, workers.get());
    debug!(
        bytes = buf.len(),
        chunks = chunks.len(),
        "aggregation stage"
    );

    let partial_maps = thread::scope(|scope| {
        let handles = chunks
            .into_iter()
            .map(|chunk| scope.spawn(move || aggregate::process(chunk)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("aggregation worker panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut groups: HashMap<MonthKey<'_>, Vec<SumCount>> = HashMap::new();
    for partials in partial_maps {
        for (month, partial) in partials {
            groups.entry(month).or_default().push(partial);
        }
    }
    debug!(months = groups.len(), "merge stage");

    let mut means = Means::default();
    for (month, partials) in groups {
        let (month, mean) = merge::reduce(month, partials)?;
        means.inner.insert(month, mean);
    }
    Ok(means)
}

/// Start of the line following `from`, or the end of the buffer.
fn next_line_start(buf: &[u8], from: usize) -> usize {
    match buf[from..].iter().position(|&c| c == b'\n') {
        Some(i) => from + i + 1,
        None => buf.len(),
    }
}

/// Splits `buf` into about `n` chunks of similar size, cutting only after
/// newlines. Concatenating the chunks yields `buf` back: the partitioning
/// is disjoint and complete.
fn chunks(buf: &str, n: usize) -> Vec<&str> {
    let chunk_len = buf.len() / n;
    let mut chunks = Vec::with_capacity(n);
    let mut start = 0;
    for boundary in (1..n).map(|i| i * chunk_len) {
        let end = next_line_start(buf.as_bytes(), boundary.max(start));
        if end > start {
            chunks.push(&buf[start..end]);
            start = end;
        }
    }
    if start < buf.len() {
        chunks.push(&buf[start..]);
    }
    chunks
}
