// In-process substrate backed by rayon.
//
// Inputs are cut into partitions that are mapped in parallel. Each partition
// optionally pre-aggregates its own output (the combiner), then all partition
// outputs are merged into one key-ordered map. Returning that map is the
// barrier between stages.

use rayon::prelude::*;
use std::collections::{btree_map, hash_map, HashMap};
use std::num::NonZeroUsize;
use tracing::{debug, info};

use super::traits::{Grouped, Stage, Substrate};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct LocalSubstrate {
    /// Number of map partitions (logical workers)
    pub partitions: usize,
    /// Pre-aggregate inside each partition before the global merge
    pub combine: bool,
    /// Times every emitted contribution is delivered. Values above 1 model an
    /// at-least-once transport that retries map tasks.
    pub delivery: usize,
}

impl Default for LocalSubstrate {
    fn default() -> Self {
        Self {
            partitions: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
            combine: true,
            delivery: 1,
        }
    }
}

impl LocalSubstrate {
    pub fn new(partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(Error::Configuration(
                "partition count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            partitions,
            ..Self::default()
        })
    }

    pub fn with_combine(mut self, combine: bool) -> Self {
        self.combine = combine;
        self
    }

    pub fn with_delivery(mut self, delivery: usize) -> Self {
        self.delivery = delivery.max(1);
        self
    }

    fn map_partition<S: Stage>(
        &self,
        stage: &S,
        partition: &[S::Input],
    ) -> Result<Vec<(S::Key, S::Value)>> {
        let mut emitted = Vec::new();
        for input in partition {
            stage.emit(input, &mut emitted)?;
        }

        if self.delivery > 1 {
            emitted = emitted
                .into_iter()
                .flat_map(|(key, value)| {
                    (0..self.delivery).map(move |_| (key.clone(), value.clone()))
                })
                .collect();
        }

        if !self.combine {
            return Ok(emitted);
        }

        let mut combined: HashMap<S::Key, S::Value> = HashMap::with_capacity(emitted.len());
        for (key, value) in emitted {
            match combined.entry(key) {
                hash_map::Entry::Occupied(mut entry) => {
                    let key = entry.key().clone();
                    stage.merge(&key, entry.get_mut(), value)?;
                }
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
        Ok(combined.into_iter().collect())
    }
}

impl Substrate for LocalSubstrate {
    fn run_stage<S: Stage>(
        &self,
        stage: &S,
        inputs: &[S::Input],
    ) -> Result<Grouped<S::Key, S::Value>> {
        let chunk = inputs.len().div_ceil(self.partitions.max(1)).max(1);

        let mapped: Vec<Vec<(S::Key, S::Value)>> = inputs
            .par_chunks(chunk)
            .map(|partition| self.map_partition(stage, partition))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            stage = stage.name(),
            partitions = mapped.len(),
            emitted = mapped.iter().map(Vec::len).sum::<usize>(),
            "Map phase done"
        );

        let mut grouped: Grouped<S::Key, S::Value> = Grouped::new();
        for (key, value) in mapped.into_iter().flatten() {
            match grouped.entry(key) {
                btree_map::Entry::Occupied(mut entry) => {
                    let key = entry.key().clone();
                    stage.merge(&key, entry.get_mut(), value)?;
                }
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }

        info!(
            stage = stage.name(),
            inputs = inputs.len(),
            keys = grouped.len(),
            "Stage complete"
        );

        Ok(grouped)
    }
}
