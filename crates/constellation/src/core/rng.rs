//! Injectable randomness for particle placement and shooting-star spawns.

/// A source of uniform random numbers.
///
/// Everything random in the field goes through this trait so tests can
/// supply a fixed seed (or a scripted sequence) and assert exact trajectories.
pub trait RandomSource {
    /// Uniform sample in [0, 1).
    fn next_f32(&mut self) -> f32;

    /// Uniform sample in [min, max).
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Returns true with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for Rng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit an f32 mantissa exactly, so the result stays below 1.0.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}
