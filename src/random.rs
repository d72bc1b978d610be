//! Seedable random source helpers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The random stream threaded through every colony phase.
pub type ColonyRng = StdRng;

/// Creates a deterministic RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> ColonyRng {
    StdRng::seed_from_u64(seed)
}

/// Draws `count` distinct indices from `0..n`.
///
/// Uses a partial Fisher-Yates shuffle, so the result order is itself
/// random.
///
/// # Panics
/// Panics if `count > n`.
pub fn sample_distinct<R: Rng>(n: usize, count: usize, rng: &mut R) -> Vec<usize> {
    assert!(
        count <= n,
        "cannot draw {count} distinct indices from {n} candidates"
    );
    let mut pool: Vec<usize> = (0..n).collect();

    for i in 0..count {
        let j = rng.random_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        for _ in 0..32 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn test_sample_distinct() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let picked = sample_distinct(5, 4, &mut rng);
            assert_eq!(picked.len(), 4);
            assert!(picked.iter().all(|&i| i < 5));
            let mut sorted = picked.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 4, "indices must be distinct: {picked:?}");
        }
    }

    #[test]
    #[should_panic(expected = "cannot draw")]
    fn test_sample_distinct_too_many() {
        let mut rng = create_rng(1);
        sample_distinct(3, 4, &mut rng);
    }
}
