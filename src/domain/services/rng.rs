//! Seeded run RNG
//!
//! A run's seed is a SHA-256 digest of its identity (dungeon seed, run id,
//! start time). The generator is a ChaCha stream keyed by that digest, so two
//! generators built from the same seed yield the same infinite sequence.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Dice;

/// 256-bit seed derived from a run's identity
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunSeed([u8; 32]);

impl RunSeed {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for RunSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunSeed({})", self.to_hex())
    }
}

impl fmt::Display for RunSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RunSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RunSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&encoded, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// Derive the seed for a run
///
/// Each field is length-prefixed before hashing so that shifting characters
/// between `dungeon_seed` and `run_id` cannot produce the same digest.
pub fn generate_seed(dungeon_seed: &str, run_id: &str, start_time: i64) -> RunSeed {
    let mut hasher = Sha256::new();
    for field in [dungeon_seed, run_id] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.update(start_time.to_be_bytes());
    RunSeed(hasher.finalize().into())
}

/// The run's random number generator
///
/// Owned by exactly one run; never reseeded after creation.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: RunSeed,
    draws: u64,
}

impl GameRng {
    pub fn new(seed: RunSeed) -> Self {
        Self {
            rng: ChaCha8Rng::from_seed(seed.0),
            seed,
            draws: 0,
        }
    }

    pub fn seed(&self) -> RunSeed {
        self.seed
    }

    /// Number of uniform draws consumed so far
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl Dice for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen::<f64>()
    }
}
