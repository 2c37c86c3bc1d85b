//! Word pool for test mode, which exercises filtering and export without a
//! device attached.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Mix of everyday words (removed by the frequency filter) and rarer ones.
pub const SAMPLE_POOL: &[&str] = &[
    "the", "and", "people", "because", "house", "water", "about", "through",
    "ephemeral", "quixotic", "sonder", "petrichor", "zephyr", "lugubrious",
    "susurrus", "halcyon", "obfuscate", "perspicacious", "recalcitrant",
    "mellifluous", "ineffable", "sesquipedalian", "defenestrate", "vellichor",
    "crepuscular", "apricity", "limerence", "phosphene", "syzygy", "tenebrous",
];

/// Exactly `min(count, pool.len())` distinct words drawn at random from `pool`.
pub fn sample_words<T, R>(pool: &[T], count: usize, rng: &mut R) -> Vec<String>
where
    T: AsRef<str>,
    R: Rng + ?Sized,
{
    pool.choose_multiple(rng, count)
        .map(|w| w.as_ref().to_string())
        .collect()
}
