use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// RTP timestamp source of one gateway instance.
/// Every timestamp is a fresh random base plus the media clock elapsed since construction.
pub struct RtpClock {
    start: Instant,
    rng: StdRng,
    clock_rate: u32,
}

impl RtpClock {
    pub fn new(clock_rate: u32) -> Self {
        Self::with_seed(clock_rate, rand::random())
    }

    /// Deterministic jitter sequence, for tests
    pub fn with_seed(clock_rate: u32, seed: u64) -> Self {
        RtpClock {
            start: Instant::now(),
            rng: StdRng::seed_from_u64(seed),
            clock_rate,
        }
    }

    pub fn clock_rate(&self) -> u32 {
        self.clock_rate
    }

    /// Timestamp for a packet sent now
    pub fn timestamp(&mut self) -> u32 {
        let elapsed = self.start.elapsed();
        self.timestamp_at(elapsed)
    }

    /// Timestamp for a packet sent `elapsed` after construction
    pub fn timestamp_at(&mut self, elapsed: Duration) -> u32 {
        // Elapsed time in 100 ns ticks
        let ticks = (elapsed.as_nanos() / 100) as u64;
        let media = ticks.wrapping_mul(self.clock_rate as u64) / 1_000_000;
        let jitter: u32 = self.rng.random();
        jitter.wrapping_add(media as u32)
    }
}
