//! # NoioLib
//!
//! NoioLib is a library for learning a cache index function from a memory trace, and simulating a
//! set-associative cache which uses it
//!
//! The pipeline has three stages. Bit statistics score every address bit as a candidate index bit,
//! near-optimal index ordering greedily picks the index bits from those scores, and the simulator
//! replays the trace against a cache indexed by the chosen bits
//!
//! Each stage takes its inputs by reference and returns an owned value, so stages can be run and
//! inspected on their own as well as through [`report::Report::generate`]

/// Bit string utilities for addresses as they appear in a trace
pub mod address;

/// Contains the implementation of the cache store
pub mod cache;

/// Contains the cache geometry, its derived layout, and the parsers for the configuration formats
pub mod config;

/// The error type shared by the whole pipeline
pub mod error;

/// File reading helpers for geometry and trace files
pub mod io;

/// Contains the replacement policy used by the cache, with a trait for implementing others
pub mod replacement_policies;

/// Runs the whole pipeline and renders its results
pub mod report;

/// Contains the index function selectors
pub mod selector;

/// Contains the simulator used to replay a trace with a given indexing pattern
pub mod simulator;

/// Quality and correlation statistics over the bits of a trace
pub mod statistics;

/// The reference trace and its text format
pub mod trace;

#[cfg(test)]
mod test;

/// Contains synthetic trace generators for tests and benchmarks.
pub mod util;

pub use error::{Error, Result};
