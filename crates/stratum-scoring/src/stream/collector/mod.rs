//! Collectors for grouping and aggregating tuples.
//!
//! A collector extracts a value from each tuple of a group and folds it into
//! an accumulator that supports retraction, so a group-by node can keep its
//! aggregates current without rescanning the group.
//!
//! ```
//! use stratum_scoring::stream::collector::{count, max, Accumulator, UniCollector};
//!
//! let visits = count::<u32>();
//! let mut acc = visits.create_accumulator();
//! acc.accumulate(&visits.extract(&4));
//! acc.accumulate(&visits.extract(&9));
//! acc.retract(&visits.extract(&4));
//! assert_eq!(acc.finish(), 1);
//!
//! let latest = max(|t: &u32| *t);
//! let mut acc = latest.create_accumulator();
//! for t in [3, 11, 7] {
//!     acc.accumulate(&latest.extract(&t));
//! }
//! assert_eq!(acc.finish(), Some(11));
//! ```

mod collection;
mod compose;
mod count;
mod extremum;
mod load_balance;
mod sum;
mod uni;

#[cfg(test)]
mod tests;

pub use collection::{
    to_list, to_set, ToListAccumulator, ToListCollector, ToSetAccumulator, ToSetCollector,
};
pub use compose::{
    collect_and_then, compose, conditionally, AndThenAccumulator, AndThenCollector,
    ComposeAccumulator, ComposeCollector, ConditionalAccumulator, ConditionalCollector,
};
pub use count::{
    count, count_distinct, CountAccumulator, CountCollector, CountDistinctAccumulator,
    CountDistinctCollector,
};
pub use extremum::{max, min, ExtremumAccumulator, ExtremumCollector};
pub use load_balance::{load_balance, LoadBalance, LoadBalanceAccumulator, LoadBalanceCollector};
pub use sum::{average, sum, AverageAccumulator, AverageCollector, SumAccumulator, SumCollector};
pub use uni::{Accumulator, UniCollector};
