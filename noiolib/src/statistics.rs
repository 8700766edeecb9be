use serde::Serialize;
use tracing::{debug, error, trace};
use crate::config::Layout;
use crate::error::{Error, Result};
use crate::trace::Trace;

/// Ratio of the smaller count to the larger, 0 when both are 0
///
/// # Examples
///
/// ```
/// use noiolib::statistics::balance;
/// assert_eq!(balance(2, 2), 1.0);
/// assert_eq!(balance(1, 3), balance(3, 1));
/// assert_eq!(balance(0, 5), 0.0);
/// assert_eq!(balance(0, 0), 0.0);
/// ```
pub fn balance(a: u64, b: u64) -> f64 {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    if high == 0 {
        0.0
    } else {
        low as f64 / high as f64
    }
}

/// Zero and one counts for every bit position over a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitCounts {
    zeros: Vec<u64>,
    ones: Vec<u64>,
}

impl BitCounts {
    /// Counts the first `com_bits` positions of every address in the trace
    ///
    /// # Panics
    ///
    /// If an address is narrower than `com_bits`. [`BitStatistics::from_trace`] checks the widths
    pub fn count(trace: &Trace, com_bits: usize) -> Self {
        let mut ones = vec![0u64; com_bits];
        for address in trace.iter() {
            debug_assert!(address.len() >= com_bits);
            for (position, count) in ones.iter_mut().enumerate() {
                if address.bit(position) {
                    *count += 1;
                }
            }
        }
        let total = trace.len() as u64;
        Self {
            zeros: ones.iter().map(|o| total - o).collect(),
            ones,
        }
    }

    pub fn zeros(&self, position: usize) -> u64 {
        self.zeros[position]
    }

    pub fn ones(&self, position: usize) -> u64 {
        self.ones[position]
    }

    pub fn len(&self) -> usize {
        self.ones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ones.is_empty()
    }
}

/// Per position suitability as an index bit, in [0, 1]
///
/// 1 means the bit splits the trace exactly in half, 0 means it never changes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityVector {
    scores: Vec<f64>,
}

impl QualityVector {
    pub fn compute(trace: &Trace, com_bits: usize) -> Self {
        Self::from_counts(&BitCounts::count(trace, com_bits))
    }

    pub fn from_counts(counts: &BitCounts) -> Self {
        Self {
            scores: counts.zeros.iter().zip(&counts.ones).map(|(z, o)| balance(*z, *o)).collect(),
        }
    }

    /// Wraps precomputed scores, mostly useful for exercising the selector directly
    pub fn from_scores(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    pub fn score(&self, position: usize) -> f64 {
        self.scores[position]
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Pairwise agreement between bit positions, stored as a dense square matrix
///
/// Symmetric, with a zero diagonal. 0 means one bit determines the other (they are always equal,
/// or always opposite), 1 means they agree on exactly half of the trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl CorrelationMatrix {
    /// # Panics
    ///
    /// If an address is narrower than `com_bits`
    pub fn compute(trace: &Trace, com_bits: usize) -> Self {
        // Only the upper triangle is counted, the disagreements are whatever isn't an agreement
        let mut agreements = vec![0u64; com_bits * com_bits];
        for address in trace.iter() {
            debug_assert!(address.len() >= com_bits);
            let bits = &address.as_str().as_bytes()[..com_bits];
            for i in 0..com_bits {
                for j in i + 1..com_bits {
                    if bits[i] == bits[j] {
                        agreements[i * com_bits + j] += 1;
                    }
                }
            }
        }
        let total = trace.len() as u64;
        Self::from_fn(com_bits, |i, j| {
            let equal = agreements[i * com_bits + j];
            balance(equal, total - equal)
        })
    }

    /// Builds a matrix from a function over the upper triangle (`i < j`)
    ///
    /// The lower triangle mirrors it and the diagonal is always 0
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut scores = vec![0.0; size * size];
        for i in 0..size {
            for j in i + 1..size {
                let score = f(i, j);
                scores[i * size + j] = score;
                scores[j * size + i] = score;
            }
        }
        Self { size, scores }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.size + j]
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Everything the selector needs to know about a trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BitStatistics {
    pub counts: BitCounts,
    pub quality: QualityVector,
    pub correlation: CorrelationMatrix,
}

impl BitStatistics {
    /// Scores every candidate position of `layout` over the whole trace
    ///
    /// Fails with [`Error::MalformedAddress`] if any address isn't `layout.address_bits` wide
    pub fn from_trace(trace: &Trace, layout: &Layout) -> Result<Self> {
        if let Some(address) = trace.iter().find(|a| a.len() != layout.address_bits) {
            error!(%address, address_bits = layout.address_bits, "Reference doesn't match the address width");
            return Err(Error::MalformedAddress {
                address: address.to_string(),
                reason: format!("expected {} bits, found {}", layout.address_bits, address.len()),
            });
        }
        let counts = BitCounts::count(trace, layout.com_bits);
        let quality = QualityVector::from_counts(&counts);
        let correlation = CorrelationMatrix::compute(trace, layout.com_bits);
        debug!(references = trace.len(), positions = layout.com_bits, "Computed bit statistics");
        trace!(quality = ?quality.scores(), "Quality per position");
        Ok(Self {
            counts,
            quality,
            correlation,
        })
    }
}
