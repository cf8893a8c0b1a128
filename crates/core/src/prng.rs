//! Deterministic Xorshift64 generator used to draw initial grids.
//!
//! The same seed yields the same sequence on every platform: the core update is
//! pure integer arithmetic. Each [`Engine`](crate::engine::Engine) owns its own
//! generator, so independent runs never share a stream.

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A seed of 0 is a fixed point of xorshift and is replaced with a non-zero
/// fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Draws a seed from process entropy. Runs seeded this way are not reproducible.
    pub fn entropy_seed() -> u64 {
        rand::random::<u64>()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform `f64` in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform `usize` in `[0, max)` by modulo reduction.
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0.
    pub fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }

    /// Uniform discrete state in `[0, num_states)`.
    ///
    /// # Panics
    ///
    /// Panics if `num_states` is 0.
    pub fn next_state(&mut self, num_states: u8) -> u8 {
        (self.next_u64() % u64::from(num_states)) as u8
    }
}
