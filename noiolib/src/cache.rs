use tracing::trace;
use crate::address::Address;
use crate::config::Layout;
use crate::error::{Error, Result};
use crate::replacement_policies::{Block, ReplacementPolicy};
use crate::selector::IndexingPattern;

/// A set-associative cache whose set index comes from an arbitrary indexing pattern, parameterised
/// by a replacement policy
///
/// Every block lives in one flat vector, set `s` occupying the `associativity` slots starting at
/// `s * associativity`. Blocks have no relationship to each other beyond their slot, so nothing
/// more elaborate is needed
#[derive(Debug)]
pub struct Cache<R: ReplacementPolicy> {
    pattern: IndexingPattern,
    tag_bits: usize,
    address_bits: usize,
    associativity: usize,
    set_count: usize,
    blocks: Vec<Block>,
    replacement_policy: R,
}

impl<R: ReplacementPolicy> Cache<R> {
    /// Creates an empty cache
    ///
    /// Fails if the pattern references a position outside the address, or could produce a set
    /// index beyond the last set
    ///
    /// # Arguments
    ///
    /// * `layout`: The derived layout of the geometry
    /// * `set_count`: The number of sets
    /// * `associativity`: Blocks per set
    /// * `pattern`: The index function
    /// * `policy`: The replacement policy
    ///
    /// returns: Result<Cache<R>, Error>
    pub fn new(layout: &Layout, set_count: u64, associativity: u64, pattern: IndexingPattern, policy: R) -> Result<Self> {
        if let Some(position) = pattern.positions().iter().find(|p| **p >= layout.address_bits) {
            return Err(Error::InvalidGeometry(format!(
                "index bit {position} is outside a {} bit address",
                layout.address_bits
            )));
        }
        if pattern.reachable_sets() > set_count as u128 {
            return Err(Error::InvalidGeometry(format!(
                "{} index bits address {} sets but only {set_count} are configured",
                pattern.len(),
                pattern.reachable_sets()
            )));
        }
        let blocks = set_count
            .checked_mul(associativity)
            .and_then(|b| usize::try_from(b).ok())
            .ok_or_else(|| Error::InvalidGeometry(format!("{set_count} sets of {associativity} blocks is too large")))?;
        Ok(Self {
            pattern,
            tag_bits: layout.tag_bits,
            address_bits: layout.address_bits,
            associativity: associativity as usize,
            set_count: set_count as usize,
            blocks: vec![Block::default(); blocks],
            replacement_policy: policy,
        })
    }

    /// Converts an address into its set and tag
    #[inline]
    pub fn address_to_set_and_tag(&self, address: &Address) -> (usize, u64) {
        (self.pattern.set_index(address) as usize, address.tag_of(self.tag_bits))
    }

    /// Reads the block for an address, returning true on a hit and false on a miss
    ///
    /// On both hits and misses the replacement policy sees every slot of the set, and a miss
    /// installs the block
    pub fn read_and_update_line(&mut self, address: &Address) -> Result<bool> {
        if address.len() != self.address_bits {
            return Err(Error::MalformedAddress {
                address: address.to_string(),
                reason: format!("expected {} bits, found {}", self.address_bits, address.len()),
            });
        }
        let (set, tag) = self.address_to_set_and_tag(address);
        let lower_bound = set * self.associativity;
        let slots = &mut self.blocks[lower_bound..lower_bound + self.associativity];
        self.replacement_policy.begin_access();
        let mut hit = false;
        // Every slot is visited even after a hit, the others still age
        for (slot, block) in slots.iter_mut().enumerate() {
            if block.holds(tag) {
                hit = true;
                self.replacement_policy.update_on_hit(block);
            } else {
                self.replacement_policy.update_on_pass(slot, block);
            }
        }
        if !hit {
            let slot = self.replacement_policy.replace(slots, tag);
            trace!(set, slot, tag, "Installed block");
        }
        Ok(hit)
    }

    /// The blocks of one set, in slot order
    pub fn set(&self, set: usize) -> &[Block] {
        let lower_bound = set * self.associativity;
        &self.blocks[lower_bound..lower_bound + self.associativity]
    }

    pub fn set_count(&self) -> usize {
        self.set_count
    }

    pub fn pattern(&self) -> &IndexingPattern {
        &self.pattern
    }

    /// Gets the number of slots which have never been filled. Useful for analysing how well the
    /// index function spreads the trace
    pub fn get_uninitialised_line_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.valid).count()
    }
}
