use std::io::Write;
use crate::config::{Geometry, IndexPolicyConfig};
use crate::error::Error;
use crate::io::{load_geometry, load_trace};
use crate::report::Report;
use crate::trace::Trace;
use crate::util::strided_trace;

#[test]
fn writes_the_log() {
    let geometry = Geometry::new(4, 1, 2, 1);
    let mut trace = Trace::from_records(["0000", "1000", "0000"], 4).unwrap();
    trace.set_benchmark(".benchmark thrash");
    let run = Report::generate(&geometry, &trace, &IndexPolicyConfig::Noio).unwrap();
    assert_eq!(run.report.total_misses(), 3);
    let mut out = Vec::new();
    run.report.write_log(&mut out).unwrap();
    let expected = "\
Address bits: 4
Block size: 1
Cache sets: 2
Associativity: 1

Offset bit count: 0
Indexing bit count: 1
Indexing bits:

.benchmark thrash
0000 miss
1000 miss
0000 miss
.end

Total cache miss count: 3
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn lists_the_chosen_bits() {
    let geometry = Geometry::new(4, 4, 4, 1);
    let trace = Trace::from_records(["0000", "0001", "0010", "0011", "0000", "0001", "0010", "0011"], 4).unwrap();
    let run = Report::generate(&geometry, &trace, &IndexPolicyConfig::Noio).unwrap();
    assert_eq!(run.report.indexing_bits, vec![2, 3]);
    // Every address has its own set but the same tag, so the second pass hits
    assert_eq!(run.report.total_misses(), 4);
    let mut out = Vec::new();
    run.report.write_log(&mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("Indexing bits: 2 3\n"));
}

#[test]
fn demo_inputs_pick_bits_one_and_three() {
    let geometry = Geometry::from_org_str(include_str!("../../../demos/cache.org")).unwrap();
    let trace = Trace::from_reader(include_str!("../../../demos/reference.lst").as_bytes(), 8).unwrap();
    let run = Report::generate(&geometry, &trace, &IndexPolicyConfig::Noio).unwrap();
    assert_eq!(run.report.indexing_bits, vec![1, 3]);
    assert_eq!(run.report.benchmark.as_deref(), Some(".benchmark testcase1"));
    assert_eq!(run.report.result.accesses.len(), 10);
}

#[test]
fn conventional_policy_for_comparison() {
    let geometry = Geometry::new(4, 4, 4, 1);
    let trace = Trace::from_records(["0000", "0001", "0010", "0011", "0000", "0001", "0010", "0011"], 4).unwrap();
    let run = Report::generate(&geometry, &trace, &IndexPolicyConfig::Conventional).unwrap();
    assert_eq!(run.report.indexing_bits, vec![0, 1]);
    // All eight references fall in one block
    assert_eq!(run.report.total_misses(), 1);
}

#[test]
fn reports_geometry_errors_before_simulating() {
    let geometry = Geometry::new(4, 3, 2, 1);
    let trace = Trace::from_records(["0000"], 4).unwrap();
    assert!(Report::generate(&geometry, &trace, &IndexPolicyConfig::Noio).is_err());
}

#[test]
fn narrow_references_are_malformed() {
    let geometry = Geometry::new(4, 1, 1, 1);
    let trace = Trace::from_records(["000", "101"], 3).unwrap();
    let err = Report::generate(&geometry, &trace, &IndexPolicyConfig::Noio).unwrap_err();
    assert!(matches!(err, Error::MalformedAddress { ref address, .. } if address == "000"));
    let err = Report::generate(&geometry, &trace, &IndexPolicyConfig::Conventional).unwrap_err();
    assert!(matches!(err, Error::MalformedAddress { .. }));
}

#[test]
fn serialises_to_json() {
    let geometry = Geometry::new(12, 4, 4, 2);
    let trace = strided_trace(12, 0x100, 4, 16, 2);
    let run = Report::generate(&geometry, &trace, &IndexPolicyConfig::Noio).unwrap();
    let json = serde_json::to_string(&run.report).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, run.report);
    assert_eq!(parsed.result.accesses.len(), 32);
}

#[test]
fn loads_files_from_disk() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(config, "Address_bits 4\nBlock_size 1\nCache_sets 2\nAssociativity 1\n").unwrap();
    let mut references = tempfile::NamedTempFile::new().unwrap();
    write!(references, ".benchmark files\n0000\n1000\n0000\n.end\n").unwrap();
    let geometry = load_geometry(config.path()).unwrap();
    assert_eq!(geometry, Geometry::new(4, 1, 2, 1));
    let trace = load_trace(references.path(), &geometry).unwrap();
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.benchmark(), Some(".benchmark files"));
}

#[test]
fn loads_json_geometry() {
    let mut config = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(config, r#"{{"address_bits": 8, "block_size": 2, "cache_sets": 4, "associativity": 4}}"#).unwrap();
    assert_eq!(load_geometry(config.path()).unwrap(), Geometry::new(8, 2, 4, 4));
}

#[test]
fn loads_an_empty_trace_file() {
    let references = tempfile::NamedTempFile::new().unwrap();
    let trace = load_trace(references.path(), &Geometry::new(4, 1, 1, 1)).unwrap();
    assert!(trace.is_empty());
}
