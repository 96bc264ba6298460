//! Synthetic identifier generation for anonymous functions and index
//! placeholders

use std::collections::hash_map::RandomState;
use std::collections::HashSet;
use std::hash::{BuildHasher, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::trace;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of synthesized function names
pub const FUNCTION_NAME_LEN: usize = 20;

/// Length of synthesized index placeholders
pub const PLACEHOLDER_LEN: usize = 5;

/// Colliding random draws tolerated before names grow by one letter
const MAX_DRAWS_PER_LENGTH: u32 = 64;

/// How synthetic names are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// Pseudo-random letters; `None` seeds from process entropy
    Random {
        /// Fixed seed for reproducible output
        seed: Option<u64>,
    },
    /// Counter spelled in the same letter alphabet
    Sequential,
}

impl Default for NameStrategy {
    fn default() -> Self {
        NameStrategy::Random { seed: None }
    }
}

/// Hands out names that are valid identifiers and never repeat within one
/// generator
#[derive(Debug)]
pub struct NameGenerator {
    strategy: NameStrategy,
    state: u64,
    issued: HashSet<String>,
}

impl NameGenerator {
    /// Create a generator
    pub fn new(strategy: NameStrategy) -> Self {
        let state = match strategy {
            NameStrategy::Random { seed: Some(seed) } => seed,
            NameStrategy::Random { seed: None } => entropy_seed(),
            NameStrategy::Sequential => 0,
        };
        Self {
            strategy,
            state,
            issued: HashSet::new(),
        }
    }

    /// Name for an anonymous function
    pub fn function_name(&mut self) -> String {
        self.fresh(FUNCTION_NAME_LEN)
    }

    /// Placeholder standing in for an index expression
    pub fn placeholder(&mut self) -> String {
        self.fresh(PLACEHOLDER_LEN)
    }

    /// Number of names handed out so far
    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    /// A name of at least `len` letters not issued before. Random draws
    /// that keep colliding move on to longer names, and sequential names
    /// grow past `len` once the counter needs more letters, so the space
    /// never runs out.
    fn fresh(&mut self, len: usize) -> String {
        let mut len = len;
        let mut attempts = 0u32;
        loop {
            let candidate = match self.strategy {
                NameStrategy::Random { .. } => self.random(len),
                NameStrategy::Sequential => self.sequential(len),
            };
            if self.issued.insert(candidate.clone()) {
                trace!(name = %candidate, "synthesized name");
                return candidate;
            }
            attempts += 1;
            if attempts % MAX_DRAWS_PER_LENGTH == 0 {
                len += 1;
            }
        }
    }

    fn random(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| {
                let index = (self.next_u64() % ALPHABET.len() as u64) as usize;
                char::from(ALPHABET[index])
            })
            .collect()
    }

    fn sequential(&mut self, len: usize) -> String {
        let mut value = self.state;
        self.state += 1;

        let base = ALPHABET.len() as u64;
        let mut letters = Vec::with_capacity(len);
        while value > 0 || letters.len() < len {
            letters.push(ALPHABET[(value % base) as usize]);
            value /= base;
        }
        letters.into_iter().rev().map(char::from).collect()
    }

    // splitmix64
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new(NameStrategy::default())
    }
}

fn entropy_seed() -> u64 {
    let mut hasher = RandomState::new().build_hasher();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    hasher.write_u64(nanos);
    hasher.finish()
}
