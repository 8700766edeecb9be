use crate::address::Address;
use crate::trace::Trace;

/// A deterministic pseudo-random trace, for tests and benchmarks
pub fn random_trace(address_bits: usize, length: usize, seed: u64) -> Trace {
    // xorshift64, the seed must not be zero
    let mut state = seed.max(1);
    let addresses = (0..length)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            Address::from_value(state, address_bits)
        })
        .collect();
    Trace::new(addresses)
}

/// Walks `count` elements `stride` apart starting at `base`, `passes` times over
///
/// Models a loop over an array, which has plenty of reuse but only a few varying bits
pub fn strided_trace(address_bits: usize, base: u64, stride: u64, count: u64, passes: usize) -> Trace {
    let addresses = (0..passes)
        .flat_map(|_| (0..count).map(move |i| base.wrapping_add(i.wrapping_mul(stride))))
        .map(|value| Address::from_value(value, address_bits))
        .collect();
    Trace::new(addresses)
}
