//! Seeded train/test partitioning of row indices

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SpamError};

/// Train/test partition of dataset row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    /// Pick the elements of `items` belonging to each partition
    pub fn apply<'a, T>(&self, items: &'a [T]) -> (Vec<&'a T>, Vec<&'a T>) {
        let train = self.train.iter().map(|&i| &items[i]).collect();
        let test = self.test.iter().map(|&i| &items[i]).collect();
        (train, test)
    }
}

/// Shuffle `0..n` with a ChaCha8 RNG seeded from `seed` and hold out
/// `ceil(n * test_size)` rows for testing.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(SpamError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(SpamError::InvalidParameter(format!(
            "cannot split {} samples with test_size {}",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}
