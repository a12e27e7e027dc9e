use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::contingency::CountUnit;
use crate::corpus::stopwords;
use crate::error::{Error, Result};

/// Default number of terms kept per category.
pub const DEFAULT_K: i64 = 75;

/// Run settings gathered from environment variables and CLI flags.
///
/// The .env file is loaded by the binary at startup via dotenvy, so every
/// field can be set there too. CLI flags override what the environment says.
#[derive(Debug, Clone)]
pub struct Config {
    /// Terms kept per category. Signed so a negative value from the
    /// environment or the command line is reported instead of wrapping.
    pub k: i64,
    /// Stopword file; the built-in English list is used when unset
    pub stopwords_path: Option<PathBuf>,
    pub count_unit: CountUnit,
    /// Map partitions for the in-process substrate
    pub partitions: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// CHISEL_K, CHISEL_STOPWORDS, CHISEL_COUNT_UNIT, CHISEL_PARTITIONS.
    pub fn load() -> Result<Self> {
        let k = match env::var("CHISEL_K") {
            Ok(raw) => raw.trim().parse::<i64>().map_err(|_| {
                Error::Configuration(format!("CHISEL_K must be an integer, got '{raw}'"))
            })?,
            Err(_) => DEFAULT_K,
        };

        let count_unit = match env::var("CHISEL_COUNT_UNIT") {
            Ok(raw) => raw.parse::<CountUnit>().map_err(Error::Configuration)?,
            Err(_) => CountUnit::default(),
        };

        let partitions = match env::var("CHISEL_PARTITIONS") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::Configuration(format!(
                    "CHISEL_PARTITIONS must be a positive integer, got '{raw}'"
                ))
            })?,
            Err(_) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        };

        Ok(Self {
            k,
            stopwords_path: env::var("CHISEL_STOPWORDS").ok().map(PathBuf::from),
            count_unit,
            partitions,
        })
    }

    /// Check that K and the partition count are usable.
    /// Call this before building a `RunConfig`.
    pub fn validate(&self) -> Result<()> {
        if self.k <= 0 {
            return Err(Error::Configuration(format!(
                "K must be a positive integer, got {}",
                self.k
            )));
        }
        if self.partitions == 0 {
            return Err(Error::Configuration(
                "partition count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate, load the stopword source, and freeze everything the
    /// pipeline stages read into a `RunConfig`.
    pub fn run_config(&self) -> Result<RunConfig> {
        self.validate()?;
        let stopwords = stopwords::resolve(self.stopwords_path.as_deref())?;
        Ok(RunConfig::new(stopwords, self.k as usize).with_count_unit(self.count_unit))
    }
}

/// Read-only configuration shared by every stage of one run.
///
/// Built once before the first stage and handed to each stage explicitly;
/// the pipeline keeps no other state between stages.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub stopwords: Arc<HashSet<String>>,
    /// Terms kept per category. Zero keeps nothing.
    pub k: usize,
    pub count_unit: CountUnit,
    /// Also collect the sorted vocabulary of scored terms
    pub vocabulary: bool,
    /// Show a progress bar over the stages
    pub progress: bool,
}

impl RunConfig {
    pub fn new(stopwords: HashSet<String>, k: usize) -> Self {
        Self {
            stopwords: Arc::new(stopwords),
            k,
            count_unit: CountUnit::Document,
            vocabulary: true,
            progress: false,
        }
    }

    pub fn with_count_unit(mut self, count_unit: CountUnit) -> Self {
        self.count_unit = count_unit;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: bool) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}
