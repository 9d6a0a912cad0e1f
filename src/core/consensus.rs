//! Chain replacement policy
//!
//! A candidate chain displaces the held chain when it is strictly longer.
//! Two equally long valid chains are settled by a fair coin flip, so a
//! set of nodes holding different equal-length chains converges on one of
//! them instead of each refusing the other's chain forever.

use rand::Rng;
use std::cmp::Ordering;

/// Source of the tie-break decision between two equal-length chains
pub trait TieBreak {
    /// Returns true when the candidate chain should win the tie
    fn prefer_candidate(&mut self) -> bool;
}

/// Fair coin backed by the thread-local RNG
#[derive(Debug, Default)]
pub struct CoinFlip;

impl TieBreak for CoinFlip {
    fn prefer_candidate(&mut self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Fixed-outcome tie-break for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub bool);

impl TieBreak for Fixed {
    fn prefer_candidate(&mut self) -> bool {
        self.0
    }
}

/// Tie-break driven by an arbitrary RNG, seedable in tests
#[derive(Debug)]
pub struct RngTieBreak<R: Rng>(pub R);

impl<R: Rng> TieBreak for RngTieBreak<R> {
    fn prefer_candidate(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }
}

/// Longest-chain rule with a coin flip on equal lengths
pub fn should_adopt(held_len: usize, candidate_len: usize, tie: &mut dyn TieBreak) -> bool {
    match candidate_len.cmp(&held_len) {
        Ordering::Greater => true,
        Ordering::Equal => tie.prefer_candidate(),
        Ordering::Less => false,
    }
}
