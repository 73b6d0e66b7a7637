// 🎲 Row sampling
// Positions only; callers materialize rows with Table::take_rows

use crate::error::{DriftError, DriftResult};
use rand::seq::index;
use rand::Rng;

/// `n` positions drawn uniformly from `0..population`, duplicates allowed
pub fn sample_with_replacement<R: Rng + ?Sized>(
    population: usize,
    n: usize,
    rng: &mut R,
) -> DriftResult<Vec<usize>> {
    if population == 0 && n > 0 {
        return Err(DriftError::Sampling {
            requested: n,
            available: 0,
        });
    }
    Ok((0..n).map(|_| rng.gen_range(0..population)).collect())
}

/// `n` distinct positions from `0..population`
pub fn sample_without_replacement<R: Rng + ?Sized>(
    population: usize,
    n: usize,
    rng: &mut R,
) -> DriftResult<Vec<usize>> {
    if n > population {
        return Err(DriftError::Sampling {
            requested: n,
            available: population,
        });
    }
    Ok(index::sample(rng, population, n).into_vec())
}

/// Subset size for a fractional draw, rounding half to even
pub fn fraction_count(fraction: f64, population: usize) -> usize {
    (fraction * population as f64).round_ties_even().max(0.0) as usize
}
