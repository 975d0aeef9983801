use std::collections::{BTreeSet, HashMap};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Draws `n` distinct indices from `0..size` in ascending order.
///
/// Sparse draws use rejection sampling into a growing set. Once `n` passes
/// half the range, a partial Fisher-Yates shuffle is used instead so the
/// number of draws stays at exactly `n`.
///
/// Callers must ensure `n <= size`.
pub fn draw_distinct_indices<R: Rng + ?Sized>(rng: &mut R, n: u64, size: u64) -> Vec<u64> {
    debug_assert!(n <= size);

    if n > size / 2 {
        partial_shuffle(rng, n, size)
    } else {
        rejection_sample(rng, n, size)
    }
}

fn rejection_sample<R: Rng + ?Sized>(rng: &mut R, n: u64, size: u64) -> Vec<u64> {
    let mut picks = BTreeSet::new();
    let mut draws: u64 = 0;

    while (picks.len() as u64) < n {
        picks.insert(rng.random_range(0..size));
        draws += 1;
    }

    debug!(n, size, draws, "rejection sampling finished");

    picks.into_iter().collect()
}

fn partial_shuffle<R: Rng + ?Sized>(rng: &mut R, n: u64, size: u64) -> Vec<u64> {
    // Only positions that were swapped are stored; every other position holds its own index.
    let mut displaced: HashMap<u64, u64> = HashMap::new();
    let mut picks = Vec::new();

    for i in 0..n {
        let j = rng.random_range(i..size);
        let at_i = displaced.get(&i).copied().unwrap_or(i);
        let at_j = displaced.get(&j).copied().unwrap_or(j);

        displaced.insert(j, at_i);
        picks.push(at_j);
    }

    debug!(n, size, displaced = displaced.len(), "partial shuffle finished");

    picks.sort_unstable();
    picks
}
