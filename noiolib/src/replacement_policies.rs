/// A single cache slot
///
/// An empty slot has no tag and is invalid. `age` counts accesses to the set since the block was
/// last used, 0 being the most recently used
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Block {
    pub tag: Option<u64>,
    pub valid: bool,
    pub age: u64,
}

impl Block {
    /// Whether this block holds `tag`
    #[inline]
    pub fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == Some(tag)
    }
}

/// A generic trait for replacement policies. Can be used to parameterise a Cache.
///
/// The cache drives a policy through one access at a time: `begin_access`, then one call per slot
/// of the set in slot order, then `replace` if nothing hit
pub trait ReplacementPolicy {
    /// Resets any per-access state. A default which does nothing is provided
    fn begin_access(&mut self) {}

    /// Updates a block which has just been hit
    fn update_on_hit(&mut self, block: &mut Block);

    /// Updates a block which was scanned but didn't hit
    ///
    /// # Arguments
    ///
    /// * `slot`: The position of the block in its set
    /// * `block`: The block
    ///
    /// returns: ()
    fn update_on_pass(&mut self, slot: usize, block: &mut Block);

    /// Installs `tag` into the set after a miss, returning the slot used
    ///
    /// # Arguments
    ///
    /// * `set`: Every slot of the set that missed
    /// * `tag`: The tag to install
    ///
    /// returns: usize
    fn replace(&mut self, set: &mut [Block], tag: u64) -> usize;
}

/// An approximation of LRU using a per block age counter
///
/// Every block that isn't hit ages by one on each access to its set, a hit block drops back to
/// age 0. The victim is the first block with the greatest age seen during the scan. Rather than
/// starting at 0, the new block inherits the victim's age unless that age has reached the
/// saturation limit
///
/// Only the single oldest candidate is tracked, so this costs one pass over the set per access
#[derive(Debug, Clone)]
pub struct RecencyCounter {
    saturation: u64,
    // Slot and pre-increment age of the oldest block seen in the current access
    candidate: Option<(usize, u64)>,
}

impl RecencyCounter {
    /// Creates the policy. Inherited ages at or above `saturation` are reset to 0
    pub fn new(saturation: u64) -> Self {
        Self {
            saturation,
            candidate: None,
        }
    }
}

impl ReplacementPolicy for RecencyCounter {
    fn begin_access(&mut self) {
        self.candidate = None;
    }

    fn update_on_hit(&mut self, block: &mut Block) {
        block.age = 0;
    }

    fn update_on_pass(&mut self, slot: usize, block: &mut Block) {
        if self.candidate.map_or(true, |(_, age)| block.age > age) {
            self.candidate = Some((slot, block.age));
        }
        block.age += 1;
    }

    fn replace(&mut self, set: &mut [Block], tag: u64) -> usize {
        let (slot, age) = self.candidate.take().unwrap_or((0, 0));
        let age = if age >= self.saturation { 0 } else { age };
        set[slot] = Block {
            tag: Some(tag),
            valid: true,
            age,
        };
        slot
    }
}
