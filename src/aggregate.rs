//! First-stage, per-partition pre-reduction.

use std::collections::HashMap;

use crate::{
    record::{MonthKey, Record, RecordError},
    SumCount,
};

/// Accumulates one [`SumCount`] per month seen in the lines fed to it.
///
/// Memory is proportional to the number of distinct months, not to the
/// input size: each day's maximum folds straight into its month's partial.
/// The partials stay private to this aggregator until [`Aggregator::finish`]
/// flushes them, so concurrent aggregators never share state.
#[derive(Debug, Default)]
pub struct Aggregator<'a> {
    partials: HashMap<MonthKey<'a>, SumCount>,
}

impl<'a> Aggregator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one input line in.
    ///
    /// Lines that are not three-field records are skipped. A record whose
    /// date or maximum temperature cannot be read is an error for this
    /// unit, never a guessed value.
    pub fn ingest(&mut self, line: &'a str) -> Result<(), RecordError> {
        let Some(record) = Record::parse(line) else {
            return Ok(());
        };
        let key = record.month_key()?;
        let max = record.max_temp()?;
        let partial = self.partials.entry(key).or_insert_with(SumCount::identity);
        *partial = partial.add(max);
        Ok(())
    }

    /// Flushes every accumulated partial, exactly one per distinct month,
    /// in unspecified order.
    ///
    /// Consumes the aggregator: this is the end-of-input cleanup and can
    /// happen only once.
    pub fn finish(self) -> impl Iterator<Item = (MonthKey<'a>, SumCount)> {
        self.partials.into_iter()
    }
}

/// Runs one aggregator over every line of a chunk.
pub fn process(chunk: &str) -> Result<HashMap<MonthKey<'_>, SumCount>, RecordError> {
    let mut aggregator = Aggregator::new();
    for line in chunk.split_terminator('\n') {
        aggregator.ingest(line)?;
    }
    Ok(aggregator.finish().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_partial_per_month() {
        let partials =
            process("01012014,-2.1,5.0\n02012014,-1.8,5.1\n01022014,0.0,7.5\n").unwrap();
        assert_eq!(partials.len(), 2);

        let january = partials[&MonthKey::of_date("01012014").unwrap()];
        assert_eq!(january.sum(), 5.0 + 5.1);
        assert_eq!(january.count(), 2);

        let february = partials[&MonthKey::of_date("01022014").unwrap()];
        assert_eq!(february.sum(), 7.5);
        assert_eq!(february.count(), 1);
    }

    #[test]
    fn test_empty_chunk_flushes_nothing() {
        assert!(process("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_lines_contribute_nothing() {
        let partials = process(
            "01012014,5.0\n\
             02012014,-1.8,5.1\n\
             03012014,-3.6,2.5,junk\n\
             \n",
        )
        .unwrap();
        assert_eq!(partials.len(), 1);
        let january = partials[&MonthKey::of_date("02012014").unwrap()];
        assert_eq!(january.sum(), 5.1);
        assert_eq!(january.count(), 1);
    }

    #[test]
    fn test_bad_max_temp_aborts_the_unit() {
        assert!(process("01012014,-2.1,5.0\n02012014,-1.8,oops\n").is_err());
    }

    #[test]
    fn test_finish_without_trailing_newline() {
        let partials = process("01012014,-2.1,5.0\n02012014,-1.8,2.5").unwrap();
        let january = partials[&MonthKey::of_date("01012014").unwrap()];
        assert_eq!(january.count(), 2);
        assert_eq!(january.sum(), 5.0 + 2.5);
    }
}
