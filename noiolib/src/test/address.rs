use crate::address::Address;
use crate::error::Error;

#[test]
fn rejects_wrong_width() {
    let err = Address::parse("01010", 4).unwrap_err();
    assert!(matches!(err, Error::MalformedAddress { ref address, .. } if address == "01010"));
    assert!(matches!(Address::parse("", 4), Err(Error::MalformedAddress { .. })));
}

#[test]
fn rejects_non_binary_digits() {
    assert!(matches!(Address::parse("0120", 4), Err(Error::MalformedAddress { .. })));
    assert!(matches!(Address::parse("01 0", 4), Err(Error::MalformedAddress { .. })));
}

#[test]
fn bits_of_reads_in_listed_order() {
    let address = Address::parse("10110", 5).unwrap();
    assert_eq!(address.bits_of(&[0, 1, 2]), 0b101);
    assert_eq!(address.bits_of(&[2, 1, 0]), 0b101);
    assert_eq!(address.bits_of(&[3, 4]), 0b10);
    assert_eq!(address.bits_of(&[4, 3]), 0b01);
    assert_eq!(address.bits_of(&[0, 1, 2, 3, 4]), 0b10110);
}

#[test]
fn bits_of_is_pure() {
    let address = Address::parse("0110", 4).unwrap();
    let pattern = [1, 3];
    assert_eq!(address.bits_of(&pattern), address.bits_of(&pattern));
}

#[test]
fn tag_is_the_high_order_slice() {
    let address = Address::parse("11010010", 8).unwrap();
    assert_eq!(address.tag_of(8), 0b11010010);
    assert_eq!(address.tag_of(4), 0b1101);
    assert_eq!(address.tag_of(1), 1);
    assert_eq!(address.tag_of(0), 0);
}

#[test]
fn full_width_tag() {
    let text = "1".repeat(64);
    let address = Address::parse(&text, 64).unwrap();
    assert_eq!(address.tag_of(64), u64::MAX);
}

#[test]
fn from_value_round_trips_through_tag() {
    let address = Address::from_value(0xA5, 8);
    assert_eq!(address.as_str(), "10100101");
    assert_eq!(address.tag_of(8), 0xA5);
    assert_eq!(Address::from_value(0xFF, 4).as_str(), "1111");
    assert_eq!(Address::from_value(1, 70).tag_of(64), 0);
}
