use std::io::BufRead;
use tracing::{debug, error, warn};
use crate::address::Address;
use crate::error::Result;

const BENCHMARK_HEADER: &str = ".benchmark";
const SENTINEL: char = '.';

/// An ordered list of memory references. The order is the replay order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    /// The `.benchmark` header line, if the trace had one
    benchmark: Option<String>,
    addresses: Vec<Address>,
}

impl Trace {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self {
            benchmark: None,
            addresses,
        }
    }

    /// Builds a trace from already separated records, failing on the first malformed one
    ///
    /// # Examples
    ///
    /// ```
    /// use noiolib::trace::Trace;
    /// let trace = Trace::from_records(["0000", "1000", "0000"], 4).unwrap();
    /// assert_eq!(trace.len(), 3);
    /// ```
    pub fn from_records<I, S>(records: I, address_bits: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = records
            .into_iter()
            .map(|r| Address::parse(r.as_ref(), address_bits))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(addresses))
    }

    /// Parses a reference list
    ///
    /// An optional `.benchmark` line comes first, followed by whitespace separated binary records
    /// up to a token starting with `.` (normally `.end`). Anything after the sentinel is ignored.
    /// A trace that ends without a sentinel is accepted, but logged
    ///
    /// # Arguments
    ///
    /// * `reader`: The trace source
    /// * `address_bits`: The width every record must have
    ///
    /// returns: Result<Trace, Error>
    pub fn from_reader<R: BufRead>(reader: R, address_bits: usize) -> Result<Self> {
        let mut trace = Self::default();
        let mut seen_content = false;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !seen_content && trimmed.starts_with(BENCHMARK_HEADER) {
                seen_content = true;
                trace.benchmark = Some(trimmed.to_string());
                continue;
            }
            seen_content = true;
            for token in trimmed.split_whitespace() {
                if token.starts_with(SENTINEL) {
                    debug!(line = line_number, references = trace.len(), "Reached end of trace");
                    return Ok(trace);
                }
                let address = Address::parse(token, address_bits).inspect_err(|e| {
                    error!(line = line_number, "{e}");
                })?;
                trace.addresses.push(address);
            }
        }
        warn!(references = trace.len(), "Trace has no end sentinel, using every record read");
        Ok(trace)
    }

    pub fn benchmark(&self) -> Option<&str> {
        self.benchmark.as_deref()
    }

    pub fn set_benchmark(&mut self, benchmark: impl Into<String>) {
        self.benchmark = Some(benchmark.into());
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }
}

