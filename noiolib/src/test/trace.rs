use std::io::Cursor;
use crate::error::Error;
use crate::trace::Trace;

fn parse(text: &str, address_bits: usize) -> crate::Result<Trace> {
    Trace::from_reader(Cursor::new(text), address_bits)
}

#[test]
fn reads_header_references_and_sentinel() {
    let trace = parse(".benchmark testcase1\n0000\n1000\n0000\n.end\n", 4).unwrap();
    assert_eq!(trace.benchmark(), Some(".benchmark testcase1"));
    let records: Vec<&str> = trace.iter().map(|a| a.as_str()).collect();
    assert_eq!(records, vec!["0000", "1000", "0000"]);
}

#[test]
fn header_is_optional() {
    let trace = parse("01\n10\n.\n", 2).unwrap();
    assert_eq!(trace.benchmark(), None);
    assert_eq!(trace.len(), 2);
}

#[test]
fn records_may_share_a_line() {
    let trace = parse("\n.benchmark mixed\n  0101 1100\t0011\n\n1111 .end 0000\n", 4).unwrap();
    assert_eq!(trace.len(), 4);
    assert_eq!(trace.addresses()[3].as_str(), "1111");
}

#[test]
fn ignores_everything_after_the_sentinel() {
    let trace = parse("0000\n.end\n1111\nnot an address\n", 4).unwrap();
    assert_eq!(trace.len(), 1);
}

#[test]
fn accepts_a_missing_sentinel() {
    let trace = parse(".benchmark unterminated\n0000\n0001", 4).unwrap();
    assert_eq!(trace.len(), 2);
}

#[test]
fn empty_input_is_an_empty_trace() {
    let trace = parse("", 4).unwrap();
    assert!(trace.is_empty());
    assert_eq!(trace.benchmark(), None);
}

#[test]
fn malformed_records_abort() {
    assert!(matches!(parse("0000\n000\n.end\n", 4), Err(Error::MalformedAddress { .. })));
    assert!(matches!(parse("0000\n00x0\n.end\n", 4), Err(Error::MalformedAddress { .. })));
}

#[test]
fn from_records_validates_every_record() {
    assert!(Trace::from_records(["0101", "1111"], 4).is_ok());
    assert!(matches!(Trace::from_records(["0101", "11111"], 4), Err(Error::MalformedAddress { .. })));
}
