use std::fmt;
use crate::error::{Error, Result};

/// A single memory reference, kept as its binary digits rather than a parsed integer
///
/// Position 0 is the most significant bit as written in the trace, position `len() - 1` the
/// least significant. Construction validates the width and the alphabet, so every other method can
/// index freely
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    text: String,
}

impl Address {
    /// Parses a binary string of exactly `address_bits` characters
    ///
    /// # Arguments
    ///
    /// * `input`: The record as it appears in the trace
    /// * `address_bits`: The configured address width
    ///
    /// returns: Result<Address, Error>
    ///
    /// # Examples
    ///
    /// ```
    /// use noiolib::address::Address;
    /// assert!(Address::parse("0101", 4).is_ok());
    /// assert!(Address::parse("010", 4).is_err());
    /// assert!(Address::parse("01a1", 4).is_err());
    /// ```
    pub fn parse(input: &str, address_bits: usize) -> Result<Self> {
        if input.len() != address_bits {
            return Err(Error::MalformedAddress {
                address: input.to_string(),
                reason: format!("expected {address_bits} bits, found {}", input.len()),
            });
        }
        if let Some(c) = input.chars().find(|c| *c != '0' && *c != '1') {
            return Err(Error::MalformedAddress {
                address: input.to_string(),
                reason: format!("{c:?} is not a binary digit"),
            });
        }
        Ok(Self { text: input.to_string() })
    }

    /// Formats the low `address_bits` bits of `value` as an address, zero padding above bit 63
    ///
    /// # Examples
    ///
    /// ```
    /// use noiolib::address::Address;
    /// assert_eq!(Address::from_value(0b101, 6).as_str(), "000101");
    /// ```
    pub fn from_value(value: u64, address_bits: usize) -> Self {
        let text = (0..address_bits)
            .rev()
            .map(|bit| if bit < 64 && (value >> bit) & 1 == 1 { '1' } else { '0' })
            .collect();
        Self { text }
    }

    /// The number of bits in this address
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the bit at `position` is set
    #[inline]
    pub fn bit(&self, position: usize) -> bool {
        self.text.as_bytes()[position] == b'1'
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Reads the bits at `positions` in the given order and packs them into an integer, the first
    /// listed position landing in the highest output bit
    ///
    /// This is how a set index is computed from an indexing pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use noiolib::address::Address;
    /// let address = Address::parse("1010", 4).unwrap();
    /// assert_eq!(address.bits_of(&[0, 2]), 0b11);
    /// assert_eq!(address.bits_of(&[1, 0]), 0b01);
    /// assert_eq!(address.bits_of(&[]), 0);
    /// ```
    #[inline]
    pub fn bits_of(&self, positions: &[usize]) -> u64 {
        let bytes = self.text.as_bytes();
        let mut res: u64 = 0;
        for &position in positions {
            res = (res << 1) | (bytes[position] - b'0') as u64;
        }
        res
    }

    /// The integer value of the first `tag_bits` characters
    ///
    /// Always the naive high-order slice, independent of whatever indexing pattern is in use.
    /// A zero width tag is 0
    ///
    /// # Examples
    ///
    /// ```
    /// use noiolib::address::Address;
    /// let address = Address::parse("1101", 4).unwrap();
    /// assert_eq!(address.tag_of(3), 0b110);
    /// assert_eq!(address.tag_of(0), 0);
    /// ```
    #[inline]
    pub fn tag_of(&self, tag_bits: usize) -> u64 {
        self.text.as_bytes()[..tag_bits]
            .iter()
            .fold(0u64, |res, b| (res << 1) | (b - b'0') as u64)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
