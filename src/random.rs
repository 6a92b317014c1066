//! Random number generation and random-site sampling.
//!
//! Provides seeded RNG construction, Fisher-Yates shuffle, and the two
//! site samplers used by Monte Carlo trials.
//!
//! # Reproducibility
//!
//! There is no global generator. Every caller owns an explicit RNG, and
//! [`create_rng`] with a fixed seed gives the same sequence on the same
//! platform.

use rand::Rng;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use u_percolation::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Derives the seed of one trial from a run seed.
///
/// Each trial gets its own stream, so results do not depend on the order
/// or the thread in which trials execute.
pub fn trial_seed(seed: u64, trial: u64) -> u64 {
    // SplitMix64 finalizer over the combined input.
    let mut z = seed ^ trial.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Picks a uniformly random site `(row, col)` of an n×n grid, 1-indexed.
///
/// Samples with replacement: the same site may come up again.
///
/// # Panics
/// Panics if `n == 0`.
///
/// # Examples
/// ```
/// use u_percolation::random::{create_rng, random_site};
/// let mut rng = create_rng(7);
/// let (row, col) = random_site(4, &mut rng);
/// assert!((1..=4).contains(&row) && (1..=4).contains(&col));
/// ```
pub fn random_site<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let row = rng.random_range(1..=n);
    let col = rng.random_range(1..=n);
    (row, col)
}

/// Fisher-Yates (Durstenfeld) in-place shuffle.
///
/// Produces a uniformly random permutation: each of the n! permutations
/// is equally likely.
///
/// Reference: Knuth (1997), *TAOCP* Vol. 2, §3.4.2, Algorithm P.
///
/// # Complexity
/// Time: O(n), Space: O(1) (in-place)
pub fn shuffle<T, R: Rng>(slice: &mut [T], rng: &mut R) {
    let n = slice.len();
    if n <= 1 {
        return;
    }
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// Returns every site of an n×n grid, 1-indexed, in uniformly random order.
///
/// Samples without replacement: opening sites in this order never
/// revisits an open site.
///
/// # Complexity
/// Time: O(n²), Space: O(n²)
///
/// # Examples
/// ```
/// use u_percolation::random::{create_rng, shuffled_sites};
/// let mut rng = create_rng(42);
/// let sites = shuffled_sites(3, &mut rng);
/// assert_eq!(sites.len(), 9);
/// ```
pub fn shuffled_sites<R: Rng>(n: usize, rng: &mut R) -> Vec<(usize, usize)> {
    let mut sites: Vec<(usize, usize)> = (1..=n)
        .flat_map(|row| (1..=n).map(move |col| (row, col)))
        .collect();
    shuffle(&mut sites, rng);
    sites
}

// ============================================================================
// Tests
// ============================================================================
