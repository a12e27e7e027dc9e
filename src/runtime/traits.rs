// Grouped-aggregation stage contract.
//
// The pipeline is written against these two traits only. A `Stage` says how
// to turn one input into keyed contributions and how to merge two values
// that share a key. A `Substrate` runs a stage: map, optional local combine,
// shuffle by key, reduce. Whatever substrate runs the stages, `merge` must be
// associative, commutative and safe under re-delivery, because the
// substrate is free to combine any number of times and to deliver a
// contribution more than once.

use std::collections::BTreeMap;
use std::hash::Hash;

use crate::error::Result;

/// Fully grouped output of a stage, ordered by key.
pub type Grouped<K, V> = BTreeMap<K, V>;

/// One map → combine → shuffle → reduce step.
pub trait Stage: Sync {
    type Input: Sync;
    type Key: Ord + Hash + Clone + Send;
    type Value: Clone + Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Emit keyed contributions for one input.
    fn emit(&self, input: &Self::Input, out: &mut Vec<(Self::Key, Self::Value)>) -> Result<()>;

    /// Fold `incoming` into `acc`. Used both as combiner and as reducer.
    fn merge(&self, key: &Self::Key, acc: &mut Self::Value, incoming: Self::Value) -> Result<()>;
}

/// Executes stages. Must hand back complete grouping: no key may be
/// returned until every contribution to it has been merged.
pub trait Substrate {
    fn run_stage<S: Stage>(
        &self,
        stage: &S,
        inputs: &[S::Input],
    ) -> Result<Grouped<S::Key, S::Value>>;
}
