//! Length buckets and seeded sampling with replacement.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// One side of a length threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bucket {
    AtMost(f64),
    Above(f64),
}

impl Bucket {
    /// The two buckets around `threshold`. Every length lands in exactly one.
    pub fn split(threshold: f64) -> [Bucket; 2] {
        [Bucket::AtMost(threshold), Bucket::Above(threshold)]
    }

    pub fn contains(&self, len: f64) -> bool {
        match *self {
            Bucket::AtMost(t) => len <= t,
            Bucket::Above(t) => len > t,
        }
    }

    pub fn threshold(&self) -> f64 {
        match *self {
            Bucket::AtMost(t) | Bucket::Above(t) => t,
        }
    }
}

/// Draw `n` items uniformly with replacement. Returns nothing for empty input.
pub fn sample_with<T: Clone, R: Rng>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }

    (0..n)
        .map(|_| items[rng.gen_range(0..items.len())].clone())
        .collect()
}

/// Sample `n` of the records matching `predicate`, seeded so that identical
/// inputs always give identical output.
pub fn sample_bucket<T: Clone>(
    records: &[T],
    predicate: impl Fn(&T) -> bool,
    n: usize,
    seed: u64,
) -> Vec<T> {
    let matching = records
        .iter()
        .filter(|r| predicate(r))
        .cloned()
        .collect::<Vec<_>>();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    sample_with(&matching, n, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_partition_lengths() {
        let [low, high] = Bucket::split(150.0);
        for len in [0.0, 1.0, 149.9, 150.0, 150.1, 151.0, 1e6] {
            assert!(low.contains(len) ^ high.contains(len), "len {len}");
        }
        assert!(low.contains(150.0));
        assert!(high.contains(151.0));
        assert_eq!(high.threshold(), 150.0);
    }

    #[test]
    fn sampling_is_reproducible() {
        let records: Vec<usize> = (0..50).collect();
        let a = sample_bucket(&records, |&r| r % 2 == 0, 1000, 42);
        let b = sample_bucket(&records, |&r| r % 2 == 0, 1000, 42);
        assert_eq!(a.len(), 1000);
        assert_eq!(a, b);
        assert!(a.iter().all(|r| r % 2 == 0));

        let c = sample_bucket(&records, |&r| r % 2 == 0, 1000, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn sampling_draws_with_replacement() {
        let records = vec!["only"];
        let s = sample_bucket(&records, |_| true, 5, 1);
        assert_eq!(s, vec!["only"; 5]);
    }

    #[test]
    fn empty_bucket_gives_nothing() {
        let records = vec![1, 2, 3];
        assert!(sample_bucket(&records, |&r| r > 10, 100, 42).is_empty());
    }
}
