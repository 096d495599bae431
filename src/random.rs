//! Seeded pseudo-random draws
//!
//! Every random choice in a prompt evaluation flows through [`seeded_random`],
//! keyed by a string seed derived from the prompt index and the position of
//! the expression inside the template. Same seed, same draw, on every platform.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lowest fresh prompt index (inclusive)
const INDEX_FLOOR: u64 = 100_000_000;

/// Highest fresh prompt index (exclusive)
const INDEX_CEIL: u64 = 900_000_000;

/// FNV-1a 64-bit hash of the seed string.
///
/// Stable by construction, unlike the std hasher whose output is only
/// guaranteed within one process.
fn fnv1a(seed: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in seed.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Deterministic draw in `[0, 1)` keyed by a string seed.
pub fn seeded_random(seed: &str) -> f64 {
    let mut rng = StdRng::seed_from_u64(fnv1a(seed));
    rng.gen::<f64>()
}

/// Seeded uniform pick of an index into a slice of `len` elements.
///
/// Returns `None` for an empty slice.
pub fn seeded_pick(seed: &str, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((seeded_random(seed) * len as f64).floor() as usize)
}

/// Draw a fresh prompt index, rounded down to a multiple of `align`.
///
/// Ordered decks pass their size as `align` so that `index % size` starts
/// at line zero and cycles through the deck in document order.
pub fn fresh_index(align: u64) -> u64 {
    let r = rand::thread_rng().gen_range(INDEX_FLOOR..INDEX_CEIL);
    r - (r % align.max(1))
}

/// Allocate the next prompt index: fresh when there is no current one,
/// otherwise the successor.
pub fn update_index(current: Option<u64>, align: u64) -> u64 {
    match current {
        None => fresh_index(align),
        Some(index) => index + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_random_is_deterministic() {
        assert_eq!(seeded_random("abc-0"), seeded_random("abc-0"));
    }

    #[test]
    fn seeded_random_in_unit_interval() {
        for seed in ["", "x", "123456789-0", "123456789-1"] {
            let r = seeded_random(seed);
            assert!((0.0..1.0).contains(&r), "{seed} drew {r}");
        }
    }

    #[test]
    fn position_seeds_differ() {
        // Derived seeds "{seed}-{i}" must never collide across positions.
        let draws: Vec<f64> = (0..8).map(|i| seeded_random(&format!("777-{i}"))).collect();
        for i in 0..draws.len() {
            for j in (i + 1)..draws.len() {
                assert_ne!(draws[i], draws[j]);
            }
        }
    }

    #[test]
    fn seeded_pick_bounds() {
        assert_eq!(seeded_pick("s", 0), None);
        for len in [1usize, 2, 7, 100] {
            let idx = seeded_pick("s", len).unwrap();
            assert!(idx < len);
        }
    }

    #[test]
    fn fresh_index_range_and_alignment() {
        for _ in 0..50 {
            let idx = fresh_index(7);
            assert!((100_000_000..900_000_000).contains(&idx));
            assert_eq!(idx % 7, 0);
        }
    }

    #[test]
    fn update_index_increments() {
        assert_eq!(update_index(Some(41), 1), 42);
        assert_eq!(update_index(Some(41), 10), 42);
    }
}
