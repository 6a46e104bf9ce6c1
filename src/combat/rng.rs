//! Fast PRNG for combat simulation. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

use std::time::{SystemTime, UNIX_EPOCH};

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

/// Source of d6 outcomes for the combat engine. Production rolls come from
/// [`Rng`]; tests script exact sequences with [`ScriptedDice`].
pub trait DieRoller {
    /// Returns a roll in `[1, 6]`.
    fn roll(&mut self) -> u32;
}

impl DieRoller for Rng {
    #[inline]
    fn roll(&mut self) -> u32 {
        (self.next_u64() % 6) as u32 + 1
    }
}

/// Replays a fixed sequence of rolls, cycling when exhausted. Test-only in
/// spirit but kept public so integration tests can script exact combats.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    /// Rolls outside `[1, 6]` are clamped at use, not rejected here.
    pub fn new(rolls: Vec<u32>) -> Self {
        Self { rolls, cursor: 0 }
    }
}

impl DieRoller for ScriptedDice {
    fn roll(&mut self) -> u32 {
        if self.rolls.is_empty() {
            return 1;
        }
        let value = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        value.clamp(1, 6)
    }
}

/// Seed for interactive runs when the caller supplies none. OS entropy via
/// getrandom, falling back to the clock if the entropy source fails.
pub fn entropy_seed() -> u64 {
    let mut bytes = [0u8; 8];
    if getrandom::getrandom(&mut bytes).is_ok() {
        return u64::from_le_bytes(bytes);
    }
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_nanos() as u64,
        Err(_) => 0x5eed_5eed_5eed_5eed,
    }
}
