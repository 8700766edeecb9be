use std::fmt;
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use crate::address::Address;
use crate::cache::Cache;
use crate::config::{Geometry, Layout};
use crate::error::Result;
use crate::replacement_policies::RecencyCounter;
use crate::selector::IndexingPattern;
use crate::trace::Trace;

/// Whether a reference was found in the cache
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Hit,
    Miss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Hit => f.write_str("hit"),
            Outcome::Miss => f.write_str("miss"),
        }
    }
}

/// The outcome of a single reference, paired with the address as written in the trace
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct AccessRecord {
    pub address: String,
    pub outcome: Outcome,
}

/// The result of a cache simulation. Can be serialised alongside the report
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub accesses: Vec<AccessRecord>,
    pub hits: u64,
    pub misses: u64,
}

/// The simulator replays references against a cache driven by a fixed indexing pattern, and
/// collects results.
///
/// It supports calling simulate multiple times, the cache contents, the time taken to simulate and
/// the results all carry over between calls
#[derive(Debug)]
pub struct Simulator {
    cache: Cache<RecencyCounter>,
    layout: Layout,
    result: SimulationResult,
    simulation_time: Duration,
}

impl Simulator {
    /// Creates a new simulator with an empty cache
    ///
    /// The replacement ages saturate at the number of set index bits
    ///
    /// # Arguments
    ///
    /// * `geometry`: The cache geometry, validated here
    /// * `pattern`: The index function, usually chosen by an [`IndexSelector`](crate::selector::IndexSelector)
    ///
    /// returns: Result<Simulator, Error>
    pub fn new(geometry: &Geometry, pattern: IndexingPattern) -> Result<Self> {
        let layout = geometry.layout()?;
        let policy = RecencyCounter::new(layout.set_index_bits as u64);
        let cache = Cache::new(&layout, geometry.cache_sets, geometry.associativity, pattern, policy)?;
        debug!(?layout, pattern = ?cache.pattern().positions(), "Created simulator");
        Ok(Self {
            cache,
            layout,
            result: SimulationResult::default(),
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Replays a single reference
    pub fn access(&mut self, address: &Address) -> Result<Outcome> {
        let outcome = if self.cache.read_and_update_line(address)? {
            self.result.hits += 1;
            Outcome::Hit
        } else {
            self.result.misses += 1;
            Outcome::Miss
        };
        trace!(%address, %outcome, "Access");
        self.result.accesses.push(AccessRecord {
            address: address.to_string(),
            outcome,
        });
        Ok(outcome)
    }

    /// Replays every reference of the trace in order
    ///
    /// Stops at the first address that doesn't match the configured width, there is no partial
    /// result
    ///
    /// returns: Result<&SimulationResult, Error>
    pub fn simulate(&mut self, trace: &Trace) -> Result<&SimulationResult> {
        let start = Instant::now();
        self.result.accesses.reserve(trace.len());
        for address in trace.iter() {
            self.access(address)?;
        }
        let end = Instant::now();
        self.simulation_time += end - start;
        debug!(hits = self.result.hits, misses = self.result.misses, "Simulated trace");
        Ok(&self.result)
    }

    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn into_result(self) -> SimulationResult {
        self.result
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn cache(&self) -> &Cache<RecencyCounter> {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of slots never filled
    pub fn get_uninitialised_line_count(&self) -> usize {
        self.cache.get_uninitialised_line_count()
    }
}
