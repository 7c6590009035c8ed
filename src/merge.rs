//! Final, per-month combination of partial statistics into the mean.

use thiserror::Error;

use crate::{record::MonthKey, SumCount};

#[derive(Debug, Error)]
pub enum MergeError {
    /// The grouping step owes every merge invocation at least one partial,
    /// and every partial counts at least one record. A zero total means the
    /// grouping contract is broken, not that the mean is zero.
    #[error("month `{0}` reached the merge stage with no observations")]
    EmptyMonth(String),
}

/// Folds every partial produced for `key` into the final mean.
///
/// The fold starts from the identity and may visit the partials in any
/// order: `merge` is commutative and associative, so however the records
/// were split among aggregators, the total is the same.
pub fn reduce<'a>(
    key: MonthKey<'a>,
    partials: impl IntoIterator<Item = SumCount>,
) -> Result<(MonthKey<'a>, f64), MergeError> {
    let total = partials
        .into_iter()
        .fold(SumCount::identity(), SumCount::merge);
    if total.count() == 0 {
        return Err(MergeError::EmptyMonth(key.to_string()));
    }
    Ok((key, total.sum() / total.count() as f64))
}
