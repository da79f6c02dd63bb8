use std::slice::Chunks;

use rand::{Rng, seq::SliceRandom};

/// An ordering of the sample indices `[0, n)`, reshuffled once per epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// Creates the identity permutation over `n` samples.
    pub fn new(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Reorders the indices uniformly at random (Fisher–Yates).
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.indices.shuffle(rng);
    }

    /// Splits the current ordering into contiguous batches of `batch_size`.
    ///
    /// There are `⌈n / batch_size⌉` batches; only the last one may be shorter.
    ///
    /// # Panics
    /// If `batch_size` is zero.
    pub fn batches(&self, batch_size: usize) -> Chunks<'_, usize> {
        self.indices.chunks(batch_size)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn new_is_the_identity() {
        let perm = Permutation::new(4);
        assert_eq!(perm.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(perm.len(), 4);
        assert!(!perm.is_empty());
        assert!(Permutation::new(0).is_empty());
    }

    #[test]
    fn shuffle_keeps_every_index_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut perm = Permutation::new(100);

        for _ in 0..10 {
            perm.shuffle(&mut rng);

            let mut sorted = perm.as_slice().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..100).collect::<Vec<_>>());
        }
    }

    #[test]
    fn shuffle_with_same_seed_is_reproducible() {
        let mut a = Permutation::new(50);
        let mut b = Permutation::new(50);

        a.shuffle(&mut StdRng::seed_from_u64(11));
        b.shuffle(&mut StdRng::seed_from_u64(11));

        assert_eq!(a, b);
    }

    #[test]
    fn batches_of_five_by_two() {
        let mut perm = Permutation::new(5);
        perm.shuffle(&mut StdRng::seed_from_u64(1));

        let batches: Vec<_> = perm.batches(2).collect();
        let sizes: Vec<_> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, [2, 2, 1]);

        let mut seen: Vec<_> = batches.concat();
        seen.sort_unstable();
        assert_eq!(seen, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn exact_division_has_no_empty_tail() {
        let perm = Permutation::new(6);
        let sizes: Vec<_> = perm.batches(3).map(|b| b.len()).collect();
        assert_eq!(sizes, [3, 3]);
    }

    #[test]
    fn oversized_batch_takes_everything() {
        let perm = Permutation::new(5);
        let batches: Vec<_> = perm.batches(32).collect();
        assert_eq!(batches, [&[0, 1, 2, 3, 4][..]]);
    }
}
