//! Random seeding order.

use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly random permutation of `entrants` drawn from `rng`.
pub fn shuffle_entrants<T: Clone, R: Rng + ?Sized>(entrants: &[T], rng: &mut R) -> Vec<T> {
    let mut out = entrants.to_vec();
    out.shuffle(rng);
    out
}
