use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::error::{Error, Result};

/// The cache geometry, as read from a configuration file
///
/// Deserialising does not validate anything, call [`Geometry::layout`] to check the values and
/// derive the bit counts used by the rest of the pipeline
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Geometry {
    #[serde(alias = "Address_bits")]
    pub address_bits: u64,
    /// Block size in bytes, must be a power of two
    #[serde(alias = "Block_size")]
    pub block_size: u64,
    /// Number of sets, must be a power of two
    #[serde(alias = "Cache_sets")]
    pub cache_sets: u64,
    #[serde(alias = "Associativity")]
    pub associativity: u64,
}

/// Bit counts derived from a valid [`Geometry`]
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Layout {
    pub address_bits: usize,
    pub offset_bits: usize,
    pub set_index_bits: usize,
    pub tag_bits: usize,
    /// The number of positions scored by the statistics, every address bit is a candidate
    pub com_bits: usize,
}

impl Geometry {
    pub fn new(address_bits: u64, block_size: u64, cache_sets: u64, associativity: u64) -> Self {
        Self {
            address_bits,
            block_size,
            cache_sets,
            associativity,
        }
    }

    /// Validates the geometry and derives its layout
    ///
    /// Addresses are limited to 64 bits so that a tag always fits in a `u64`
    ///
    /// returns: Result<Layout, Error>
    pub fn layout(&self) -> Result<Layout> {
        if self.address_bits == 0 || self.address_bits > u64::BITS as u64 {
            return Err(Error::InvalidGeometry(format!("address width must be between 1 and 64 bits, got {}", self.address_bits)));
        }
        if !self.block_size.is_power_of_two() {
            return Err(Error::InvalidGeometry(format!("block size must be a power of two, got {}", self.block_size)));
        }
        if !self.cache_sets.is_power_of_two() {
            return Err(Error::InvalidGeometry(format!("cache set count must be a power of two, got {}", self.cache_sets)));
        }
        if self.associativity == 0 {
            return Err(Error::InvalidGeometry("associativity must be at least 1".to_string()));
        }
        let address_bits = self.address_bits as usize;
        let offset_bits = self.block_size.trailing_zeros() as usize;
        let set_index_bits = self.cache_sets.trailing_zeros() as usize;
        if offset_bits > address_bits {
            return Err(Error::InvalidGeometry(format!(
                "{offset_bits} offset bits don't fit in a {address_bits} bit address"
            )));
        }
        let tag_bits = address_bits - offset_bits;
        Ok(Layout {
            address_bits,
            offset_bits,
            set_index_bits,
            tag_bits,
            com_bits: tag_bits + offset_bits,
        })
    }

    /// Parses the plain text `cache.org` format, a `name value` pair per entry
    ///
    /// Names are matched case-insensitively and an optional colon after the name is accepted
    ///
    /// # Examples
    ///
    /// ```
    /// use noiolib::config::Geometry;
    /// let geometry = Geometry::from_org_str("Address_bits 8\nBlock_size 4\nCache_sets 8\nAssociativity 2\n").unwrap();
    /// assert_eq!(geometry, Geometry::new(8, 4, 8, 2));
    /// ```
    pub fn from_org_str(input: &str) -> Result<Self> {
        let entry_pattern = Regex::new(r"(?P<name>[A-Za-z_]+)\s*:?\s*(?P<value>[0-9]+)")
            .map_err(|e| Error::Config(e.to_string()))?;
        let mut address_bits = None;
        let mut block_size = None;
        let mut cache_sets = None;
        let mut associativity = None;
        for captures in entry_pattern.captures_iter(input) {
            let name = captures["name"].to_ascii_lowercase().replace('_', "");
            let value: u64 = captures["value"]
                .parse()
                .map_err(|e| Error::Config(format!("bad value for {}: {e}", &captures["name"])))?;
            let slot = match name.as_str() {
                "addressbits" => &mut address_bits,
                "blocksize" => &mut block_size,
                "cachesets" => &mut cache_sets,
                "associativity" => &mut associativity,
                _ => {
                    warn!(entry = &captures["name"], "Ignoring unknown configuration entry");
                    continue;
                }
            };
            if slot.replace(value).is_some() {
                return Err(Error::Config(format!("{} is given more than once", &captures["name"])));
            }
        }
        let require = |value: Option<u64>, name: &str| value.ok_or_else(|| Error::Config(format!("missing {name}")));
        Ok(Self {
            address_bits: require(address_bits, "Address_bits")?,
            block_size: require(block_size, "Block_size")?,
            cache_sets: require(cache_sets, "Cache_sets")?,
            associativity: require(associativity, "Associativity")?,
        })
    }

    /// Parses the JSON form of the configuration
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Which index function drives the simulation. Defaults to near-optimal index ordering
#[derive(Debug, Copy, Clone, Default, Deserialize, Serialize, Eq, PartialEq, clap::ValueEnum)]
pub enum IndexPolicyConfig {
    /// Greedy statistical selection of the index bits
    #[default]
    #[serde(alias = "noio")]
    Noio,
    /// The classical contiguous index field just above the block offset
    #[serde(alias = "conventional")]
    Conventional,
}
