//! Mean daily-maximum temperature per calendar month, computed as a
//! two-stage aggregation: local aggregators pre-reduce their share of the
//! records into per-month partial statistics, and a merge stage folds the
//! partials of each month into the final mean.

pub mod aggregate;
pub mod job;
pub mod merge;
pub mod record;

use std::{cmp::Ordering, collections::HashMap, fmt};

use crate::record::MonthKey;

/// Partial statistic for one month: the running sum and count of the daily
/// maximum temperatures an aggregator has seen.
///
/// Merging is pointwise addition, which is commutative and associative, so
/// partials produced by independent workers combine in any order and any
/// grouping into the same total.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumCount {
    sum: f64,
    count: i64,
}

impl SumCount {
    /// Width of the fixed encoding: 8 bytes of sum, 8 bytes of count.
    pub const ENCODED_LEN: usize = 16;

    /// The merge identity: no observations yet.
    pub fn identity() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    /// Folds a single new observation in.
    pub fn add(self, v: f64) -> Self {
        Self {
            sum: self.sum + v,
            count: self.count + 1,
        }
    }

    /// Combines two partials.
    pub fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Encodes as two big-endian fixed-width fields, sum then count.
    pub fn encode(self) -> [u8; Self::ENCODED_LEN] {
        let mut buf = [0u8; Self::ENCODED_LEN];
        buf[..8].copy_from_slice(&self.sum.to_be_bytes());
        buf[8..].copy_from_slice(&self.count.to_be_bytes());
        buf
    }

    /// Exact inverse of [`SumCount::encode`].
    pub fn decode(buf: [u8; Self::ENCODED_LEN]) -> Self {
        let mut sum = [0u8; 8];
        let mut count = [0u8; 8];
        sum.copy_from_slice(&buf[..8]);
        count.copy_from_slice(&buf[8..]);
        Self {
            sum: f64::from_be_bytes(sum),
            count: i64::from_be_bytes(count),
        }
    }
}

impl PartialEq for SumCount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SumCount {}

impl PartialOrd for SumCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SumCount {
    /// Lexicographic on `(sum, count)`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.sum
            .total_cmp(&other.sum)
            .then(self.count.cmp(&other.count))
    }
}

/// Final result of a job: the mean daily maximum per month, keyed by
/// `MMYYYY`.
///
/// `Display` renders one `MMYYYY<TAB>mean` line per month, months sorted,
/// means at full round-trip precision.
#[derive(Debug, Default)]
pub struct Means<'a> {
    pub(crate) inner: HashMap<MonthKey<'a>, f64>,
}

impl<'a> Means<'a> {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, month: &str) -> Option<f64> {
        self.inner.get(month).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonthKey<'a>, f64)> + '_ {
        self.inner.iter().map(|(&month, &mean)| (month, mean))
    }
}

impl fmt::Display for Means<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut months = self.inner.keys().collect::<Vec<_>>();
        months.sort_unstable();
        for month in months {
            writeln!(f, "{}\t{}", month, self.inner[month])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn test_identity_law() {
        let a = SumCount::identity().add(5.0).add(-2.5);
        assert_eq!(a.merge(SumCount::identity()), a);
        assert_eq!(SumCount::identity().merge(a), a);
    }

    #[test]
    fn test_merge_commutative_associative() {
        let a = SumCount::identity().add(5.0);
        let b = SumCount::identity().add(5.1).add(2.5);
        let c = SumCount::identity().add(-3.25).add(0.5).add(12.0);
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
    }

    #[test]
    fn test_add() {
        let a = SumCount::identity().add(5.0).add(5.1).add(2.5);
        assert_eq!(a.sum(), 5.0 + 5.1 + 2.5);
        assert_eq!(a.count(), 3);
    }

    #[test]
    fn test_ordering_sum_then_count() {
        let small = SumCount { sum: 1.0, count: 9 };
        let big = SumCount { sum: 2.0, count: 1 };
        assert!(small < big);

        let short = SumCount { sum: 2.0, count: 1 };
        let long = SumCount { sum: 2.0, count: 3 };
        assert!(short < long);
        assert!(SumCount { sum: -1.0, count: 2 } < SumCount { sum: 1.0, count: 2 });
    }

    #[test]
    fn test_codec_round_trip() {
        for stat in [
            SumCount::identity(),
            SumCount::identity().add(5.0).add(5.1).add(2.5),
            SumCount {
                sum: -123.456,
                count: i64::MAX,
            },
        ] {
            assert_eq!(SumCount::decode(stat.encode()), stat);
        }
    }

    #[test]
    fn test_codec_field_order() {
        let encoded = SumCount { sum: 1.0, count: 2 }.encode();
        assert_eq!(encoded[..8], 1.0f64.to_be_bytes());
        assert_eq!(encoded[8..], 2i64.to_be_bytes());
    }

    #[test]
    fn test_means_display_sorted_tab_separated() {
        let buf = "02012014,0.0,1.0\n01012014,0.0,0.0\n03012014,0.0,0.0\n\
                   15021935,-11.0,-10.5\n16021935,-10.0,-9.5\n";
        let means = crate::job::run(buf, NonZeroUsize::new(1).unwrap()).unwrap();
        assert_eq!(means.to_string(), "012014\t0.3333333333333333\n021935\t-10\n");
    }
}
