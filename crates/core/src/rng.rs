//! RNG module - piece generation
//!
//! Two randomizers share one deterministic LCG:
//!
//! - **Classic**: memoryless draw over 8 buckets with a single reroll when the
//!   draw lands on the spare bucket or repeats the previous piece. The reroll
//!   is used even if it repeats, so back-to-back duplicates stay possible.
//! - **Bag**: each bag holds one of each piece, shuffled, and is consumed from
//!   the end before a fresh bag is shuffled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// 32-bit linear congruential generator (Numerical Recipes parameters)
///
/// Fully determined by its state, so a seed replays the same piece sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Seed the generator; 0 is remapped to 1
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// Step the LCG and return the raw state
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        self.state
    }

    /// Uniform-ish value in `0..max`, taken from the upper 16 bits
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max
    }

    /// In-place Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for hi in (1..items.len()).rev() {
            let pick = self.next_range(hi as u32 + 1) as usize;
            items.swap(hi, pick);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Which randomizer a game uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Randomizer {
    /// Memoryless with one reroll against immediate repeats
    #[default]
    Classic,
    /// Shuffled bag of seven
    Bag,
}

#[derive(Debug, Clone)]
enum Policy {
    Classic { last: Option<PieceKind> },
    Bag { bag: [PieceKind; 7], remaining: usize },
}

/// Piece generator for one game
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    policy: Policy,
    rng: SimpleRng,
}

impl PieceGenerator {
    /// Create a generator with the given policy and seed
    pub fn new(randomizer: Randomizer, seed: u32) -> Self {
        let policy = match randomizer {
            Randomizer::Classic => Policy::Classic { last: None },
            // Starts empty so the first draw shuffles.
            Randomizer::Bag => Policy::Bag {
                bag: PieceKind::ALL,
                remaining: 0,
            },
        };
        Self {
            policy,
            rng: SimpleRng::new(seed),
        }
    }

    /// Draw the next piece
    pub fn next_piece(&mut self) -> PieceKind {
        match &mut self.policy {
            Policy::Classic { last } => {
                let first = self.rng.next_range(8) as usize;
                let kind = match PieceKind::from_index(first) {
                    Some(kind) if Some(kind) != *last => kind,
                    // Spare bucket or repeat: one reroll over the seven kinds, taken as-is.
                    _ => PieceKind::ALL[self.rng.next_range(7) as usize],
                };
                *last = Some(kind);
                kind
            }
            Policy::Bag { bag, remaining } => {
                if *remaining == 0 {
                    *bag = PieceKind::ALL;
                    self.rng.shuffle(bag);
                    *remaining = bag.len();
                }
                *remaining -= 1;
                bag[*remaining]
            }
        }
    }

    /// RNG state, used to seed the generator of the following game
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }

    /// Pieces left in the current bag (always 0 for the classic policy)
    pub fn bag_remaining(&self) -> usize {
        match self.policy {
            Policy::Classic { .. } => 0,
            Policy::Bag { remaining, .. } => remaining,
        }
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(Randomizer::default(), 1)
    }
}
