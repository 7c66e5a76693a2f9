//! Fallback vocabulary for the analysis demo.

use crate::prng::Prng;

/// Candidate words substituted when the decode provider is unavailable.
pub const CANDIDATE_WORDS: [&str; 5] = [
    "CONSCIOUSNESS",
    "AWARENESS",
    "THOUGHT",
    "MIND",
    "INTELLIGENCE",
];

/// Word presented when the analysis attempt itself faults.
pub const FAULT_WORD: &str = "ERROR";

/// Uniform draw from the candidate set.
pub fn random_candidate(prng: &mut Prng) -> &'static str {
    CANDIDATE_WORDS[prng.gen_range_usize(0, CANDIDATE_WORDS.len())]
}

/// Whether `word` is a member of the fallback candidate set.
pub fn is_candidate(word: &str) -> bool {
    CANDIDATE_WORDS.iter().any(|w| *w == word)
}
