//! Random index draws
//!
//! Every function takes the generator explicitly; there is no shared or
//! global random state anywhere in the engine.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{ResampleError, Result};

/// Draw `k` indices from `0..population`.
///
/// Without replacement the result has no duplicates and requires
/// `k <= population`. Indices come back in draw order, not sorted.
pub fn sample_indices<R: Rng + ?Sized>(
    population: usize,
    k: usize,
    replace: bool,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if replace {
        if population == 0 && k > 0 {
            return Err(ResampleError::invalid(
                "population",
                format!("must be positive to draw {k} indices with replacement"),
            ));
        }
        return Ok((0..k).map(|_| rng.random_range(0..population)).collect());
    }

    if k > population {
        return Err(ResampleError::invalid(
            "k",
            format!(
                "must be less than or equal to the population size when sampling without replacement ({k} > {population})"
            ),
        ));
    }
    Ok(rand::seq::index::sample(rng, population, k).into_vec())
}

/// Shuffle `items` in place
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Random permutation of `0..n`
pub fn permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order
}
