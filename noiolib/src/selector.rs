use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::address::Address;
use crate::config::{IndexPolicyConfig, Layout};
use crate::error::{Error, Result};
use crate::statistics::{BitStatistics, CorrelationMatrix, QualityVector};

/// The bit positions used to compute a set index, always in ascending order
///
/// Applying the pattern reads the address at each position, the lowest position becoming the most
/// significant bit of the set index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct IndexingPattern {
    positions: Vec<usize>,
}

impl From<Vec<usize>> for IndexingPattern {
    fn from(positions: Vec<usize>) -> Self {
        Self::new(positions)
    }
}

impl From<IndexingPattern> for Vec<usize> {
    fn from(pattern: IndexingPattern) -> Self {
        pattern.positions
    }
}

impl IndexingPattern {
    /// Creates a pattern from arbitrary positions, sorting them into canonical order and dropping
    /// repeats
    pub fn new(mut positions: Vec<usize>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        Self { positions }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The number of distinct set indices this pattern can produce
    pub fn reachable_sets(&self) -> u128 {
        1u128.checked_shl(self.positions.len() as u32).unwrap_or(u128::MAX)
    }

    /// Computes the set index of an address
    ///
    /// # Examples
    ///
    /// ```
    /// use noiolib::address::Address;
    /// use noiolib::selector::IndexingPattern;
    /// let pattern = IndexingPattern::new(vec![3, 1]);
    /// assert_eq!(pattern.set_index(&Address::parse("0100", 4).unwrap()), 0b10);
    /// ```
    #[inline]
    pub fn set_index(&self, address: &Address) -> u64 {
        address.bits_of(&self.positions)
    }
}

/// Something which can choose an index function for a cache layout
///
/// Implemented by each policy, and by [`IndexPolicyConfig`] which dispatches to the configured one
pub trait IndexSelector {
    /// Chooses the indexing pattern
    ///
    /// # Arguments
    ///
    /// * `statistics`: Bit statistics for the trace which will be simulated
    /// * `layout`: The derived cache layout
    ///
    /// returns: Result<IndexingPattern, Error>
    fn select(&self, statistics: &BitStatistics, layout: &Layout) -> Result<IndexingPattern>;
}

/// Near-optimal index ordering, a greedy choice of balanced, mutually independent bits
///
/// Picks as many bits as there are block offset bits
#[derive(Debug, Default, Copy, Clone)]
pub struct NearOptimalIndexOrdering;

impl IndexSelector for NearOptimalIndexOrdering {
    fn select(&self, statistics: &BitStatistics, layout: &Layout) -> Result<IndexingPattern> {
        near_optimal_index_ordering(&statistics.quality, &statistics.correlation, layout.offset_bits, layout.tag_bits)
    }
}

/// The classical index, the set index bits immediately above the block offset
#[derive(Debug, Default, Copy, Clone)]
pub struct ConventionalIndex;

impl IndexSelector for ConventionalIndex {
    fn select(&self, _statistics: &BitStatistics, layout: &Layout) -> Result<IndexingPattern> {
        let low_bits = layout.offset_bits + layout.set_index_bits;
        if low_bits > layout.address_bits {
            return Err(Error::InvalidGeometry(format!(
                "{} offset bits and {} set index bits don't fit in a {} bit address",
                layout.offset_bits, layout.set_index_bits, layout.address_bits
            )));
        }
        let end = layout.address_bits - layout.offset_bits;
        Ok(IndexingPattern::new((end - layout.set_index_bits..end).collect()))
    }
}

impl IndexSelector for IndexPolicyConfig {
    fn select(&self, statistics: &BitStatistics, layout: &Layout) -> Result<IndexingPattern> {
        match self {
            IndexPolicyConfig::Noio => NearOptimalIndexOrdering.select(statistics, layout),
            IndexPolicyConfig::Conventional => ConventionalIndex.select(statistics, layout),
        }
    }
}

/// Greedily selects `count` index bits
///
/// Candidates are ranked by their distance from the least significant bit, `j`, which is stored
/// position `com_bits - 1 - j`. Each round scans `j` downward and takes the unused candidate with
/// the strictly highest current quality, so ties go to the most significant bit. The `tag_bits`
/// candidates nearest the least significant end (`j < tag_bits`) then have their quality scaled
/// by their correlation with the chosen bit, so bits redundant with an earlier choice fall behind
/// independent ones. The rest are never rescaled
///
/// # Arguments
///
/// * `quality`: Quality per stored position
/// * `correlation`: Pairwise correlation, the same size as `quality`
/// * `count`: How many positions to choose
/// * `tag_bits`: How many candidates, counted from the least significant end, are rescaled
///
/// returns: Result<IndexingPattern, Error>, stored positions sorted ascending
///
/// # Examples
///
/// ```
/// use noiolib::selector::near_optimal_index_ordering;
/// use noiolib::statistics::{CorrelationMatrix, QualityVector};
/// let quality = QualityVector::from_scores(vec![0.2, 1.0, 0.5]);
/// let correlation = CorrelationMatrix::from_fn(3, |_, _| 1.0);
/// let pattern = near_optimal_index_ordering(&quality, &correlation, 2, 3).unwrap();
/// assert_eq!(pattern.positions(), &[1, 2]);
/// ```
pub fn near_optimal_index_ordering(
    quality: &QualityVector,
    correlation: &CorrelationMatrix,
    count: usize,
    tag_bits: usize,
) -> Result<IndexingPattern> {
    let com_bits = quality.len();
    if count > com_bits {
        return Err(Error::InvalidGeometry(format!("can't select {count} index bits from {com_bits} candidates")));
    }
    if correlation.size() != com_bits {
        return Err(Error::InvalidGeometry(format!(
            "correlation covers {} positions but quality covers {com_bits}",
            correlation.size()
        )));
    }
    if tag_bits > com_bits {
        return Err(Error::InvalidGeometry(format!("{tag_bits} tag bits exceed {com_bits} candidates")));
    }
    let position_of = |j: usize| com_bits - 1 - j;
    // Indexed by distance from the least significant bit
    let mut scores: Vec<f64> = (0..com_bits).map(|j| quality.score(position_of(j))).collect();
    let mut used = vec![false; com_bits];
    let mut selected = Vec::with_capacity(count);
    for round in 0..count {
        // Strictly greater, so the first candidate of equal ones in the downward scan is kept
        let mut best: Option<(usize, f64)> = None;
        for j in (0..com_bits).rev() {
            if used[j] {
                continue;
            }
            if best.map_or(true, |(_, best_score)| scores[j] > best_score) {
                best = Some((j, scores[j]));
            }
        }
        let (j, score) = best
            .ok_or_else(|| Error::InvalidGeometry(format!("ran out of candidate bits after {round} selections")))?;
        used[j] = true;
        let position = position_of(j);
        selected.push(position);
        debug!(round, position, quality = score, "Selected index bit");
        for t in 0..tag_bits {
            if !used[t] {
                scores[t] *= correlation.get(position_of(t), position);
            }
        }
    }
    Ok(IndexingPattern::new(selected))
}
