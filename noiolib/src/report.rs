use std::io::Write;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::config::{Geometry, Layout};
use crate::error::Result;
use crate::selector::IndexSelector;
use crate::simulator::{SimulationResult, Simulator};
use crate::statistics::BitStatistics;
use crate::trace::Trace;

/// Everything a run produces: the geometry, the chosen index function and every outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub geometry: Geometry,
    pub layout: Layout,
    pub indexing_bits: Vec<usize>,
    pub benchmark: Option<String>,
    pub result: SimulationResult,
}

/// A report together with diagnostics that aren't part of the result itself
#[derive(Debug)]
pub struct Run {
    pub report: Report,
    pub simulation_time: Duration,
    pub uninitialised_lines: usize,
}

impl Report {
    /// Runs the whole pipeline: statistics, index selection, then simulation
    ///
    /// # Arguments
    ///
    /// * `geometry`: The cache geometry
    /// * `trace`: The references, each `geometry.address_bits` wide
    /// * `selector`: Chooses the index function from the trace statistics
    ///
    /// returns: Result<Run, Error>
    pub fn generate(geometry: &Geometry, trace: &Trace, selector: &impl IndexSelector) -> Result<Run> {
        let layout = geometry.layout()?;
        let statistics = BitStatistics::from_trace(trace, &layout)?;
        let pattern = selector.select(&statistics, &layout)?;
        info!(indexing_bits = ?pattern.positions(), "Selected index function");
        let indexing_bits = pattern.positions().to_vec();
        let mut simulator = Simulator::new(geometry, pattern)?;
        simulator.simulate(trace)?;
        let simulation_time = *simulator.get_execution_time();
        let uninitialised_lines = simulator.get_uninitialised_line_count();
        Ok(Run {
            report: Report {
                geometry: *geometry,
                layout,
                indexing_bits,
                benchmark: trace.benchmark().map(str::to_string),
                result: simulator.into_result(),
            },
            simulation_time,
            uninitialised_lines,
        })
    }

    pub fn total_misses(&self) -> u64 {
        self.result.misses
    }

    /// Writes the human readable log
    ///
    /// The geometry and the derived bit counts come first, then one line per reference, then the
    /// total miss count
    pub fn write_log<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "Address bits: {}", self.geometry.address_bits)?;
        writeln!(out, "Block size: {}", self.geometry.block_size)?;
        writeln!(out, "Cache sets: {}", self.geometry.cache_sets)?;
        writeln!(out, "Associativity: {}", self.geometry.associativity)?;
        writeln!(out)?;
        writeln!(out, "Offset bit count: {}", self.layout.offset_bits)?;
        writeln!(out, "Indexing bit count: {}", self.layout.set_index_bits)?;
        write!(out, "Indexing bits:")?;
        for bit in &self.indexing_bits {
            write!(out, " {bit}")?;
        }
        writeln!(out)?;
        writeln!(out)?;
        if let Some(benchmark) = &self.benchmark {
            writeln!(out, "{benchmark}")?;
        }
        for access in &self.result.accesses {
            writeln!(out, "{} {}", access.address, access.outcome)?;
        }
        writeln!(out, ".end")?;
        writeln!(out)?;
        writeln!(out, "Total cache miss count: {}", self.result.misses)?;
        out.flush()?;
        Ok(())
    }
}
