use crate::config::Geometry;
use crate::statistics::{BitCounts, BitStatistics, CorrelationMatrix, QualityVector};
use crate::trace::Trace;

fn trace(records: &[&str]) -> Trace {
    Trace::from_records(records, records[0].len()).unwrap()
}

#[test]
fn counts_zeros_and_ones() {
    let counts = BitCounts::count(&trace(&["000", "001", "011", "111"]), 3);
    assert_eq!((counts.zeros(0), counts.ones(0)), (3, 1));
    assert_eq!((counts.zeros(1), counts.ones(1)), (2, 2));
    assert_eq!((counts.zeros(2), counts.ones(2)), (1, 3));
}

#[test]
fn quality_rewards_balanced_bits() {
    let quality = QualityVector::compute(&trace(&["000", "001", "011", "111"]), 3);
    assert_eq!(quality.scores(), &[1.0 / 3.0, 1.0, 1.0 / 3.0]);
}

#[test]
fn constant_bits_have_no_quality() {
    let quality = QualityVector::compute(&trace(&["10", "10", "10"]), 2);
    assert_eq!(quality.scores(), &[0.0, 0.0]);
}

#[test]
fn empty_trace_scores_zero() {
    let empty = Trace::default();
    let quality = QualityVector::compute(&empty, 4);
    assert_eq!(quality.scores(), &[0.0; 4]);
    let correlation = CorrelationMatrix::compute(&empty, 4);
    for i in 0..4 {
        for j in 0..4 {
            assert_eq!(correlation.get(i, j), 0.0);
        }
    }
}

#[test]
fn correlation_counts_agreements() {
    let correlation = CorrelationMatrix::compute(&trace(&["000", "001", "011", "111"]), 3);
    // 0 and 1 agree three times out of four
    assert_eq!(correlation.get(0, 1), 1.0 / 3.0);
    assert_eq!(correlation.get(1, 2), 1.0 / 3.0);
    // 0 and 2 agree exactly half the time
    assert_eq!(correlation.get(0, 2), 1.0);
}

#[test]
fn copied_bits_are_fully_correlated() {
    // Bit 1 always equals bit 0 and bit 2 is always its complement
    let correlation = CorrelationMatrix::compute(&trace(&["110", "001", "110", "001", "110"]), 3);
    assert_eq!(correlation.get(0, 1), 0.0);
    assert_eq!(correlation.get(0, 2), 0.0);
    assert_eq!(correlation.get(1, 2), 0.0);
}

#[test]
fn correlation_is_symmetric_with_zero_diagonal() {
    let correlation = CorrelationMatrix::compute(&trace(&["0110", "1010", "1111", "0001", "1000"]), 4);
    assert_eq!(correlation.size(), 4);
    for i in 0..4 {
        assert_eq!(correlation.get(i, i), 0.0);
        for j in 0..4 {
            assert_eq!(correlation.get(i, j), correlation.get(j, i));
        }
    }
}

#[test]
fn statistics_cover_every_address_bit() {
    let geometry = Geometry::new(4, 4, 2, 1);
    let statistics = BitStatistics::from_trace(&trace(&["0000", "0101", "1010"]), &geometry.layout().unwrap()).unwrap();
    assert_eq!(statistics.counts.len(), 4);
    assert_eq!(statistics.quality.len(), 4);
    assert_eq!(statistics.correlation.size(), 4);
}
